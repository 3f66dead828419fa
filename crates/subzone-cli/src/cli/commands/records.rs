//! `subzone records` - List DNS records in the zone.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use subzone::DnsRecord;
use tabled::{settings::Style, Table, Tabled};

use super::Context;
use crate::cli::args::RecordsArgs;
use crate::output::{print_csv, print_structured, OutputFormat};

#[derive(Tabled, Serialize)]
struct RecordRow {
    #[tabled(rename = "Type")]
    #[serde(rename = "type")]
    record_type: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Content")]
    content: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Comment")]
    comment: String,
}

impl From<&DnsRecord> for RecordRow {
    fn from(record: &DnsRecord) -> Self {
        Self {
            record_type: record.record_type.clone(),
            name: record.name.clone(),
            content: record.content.clone(),
            id: record.id.clone(),
            comment: record.comment.clone().unwrap_or_default(),
        }
    }
}

pub async fn execute(ctx: Context, args: RecordsArgs) -> Result<()> {
    let client = ctx.client()?;

    let mut request = client.records().list();
    if args.ns {
        request = request.record_type(subzone::NS_RECORD_TYPE);
    }
    let records: Vec<DnsRecord> = request
        .send()
        .await?
        .into_iter()
        .filter(|r| args.name.as_deref().map_or(true, |name| r.is_at_or_below(name)))
        .collect();

    if print_structured(ctx.output_format, &records)? {
        return Ok(());
    }

    let rows: Vec<RecordRow> = records.iter().map(RecordRow::from).collect();
    match ctx.output_format {
        OutputFormat::Csv => print_csv(&rows)?,
        _ => {
            if rows.is_empty() {
                println!("No matching records.");
                return Ok(());
            }
            println!("{}", Table::new(&rows).with(Style::rounded()));
            println!();
            println!("{} {}", "Total:".bold(), rows.len());
        }
    }

    Ok(())
}
