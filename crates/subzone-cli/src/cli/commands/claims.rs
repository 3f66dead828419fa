//! `subzone claims` - Every owner record in the claim file.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use subzone::{ClaimStore, OwnerRecord};
use tabled::{settings::Style, Table, Tabled};

use super::Context;
use crate::output::{print_csv, print_structured, OutputFormat};

#[derive(Tabled, Serialize)]
struct ClaimRow {
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Subdomain")]
    subdomain: String,
    #[tabled(rename = "Nameservers")]
    nameservers: String,
}

impl From<&OwnerRecord> for ClaimRow {
    fn from(record: &OwnerRecord) -> Self {
        Self {
            owner: record.owner.clone(),
            subdomain: record.subdomain.clone().unwrap_or_default(),
            nameservers: record.nameservers.values().join(" "),
        }
    }
}

pub async fn execute(ctx: Context) -> Result<()> {
    let store = ctx.store().await?;
    let records = store.list().await?;

    if print_structured(ctx.output_format, &records)? {
        return Ok(());
    }

    let rows: Vec<ClaimRow> = records.iter().map(ClaimRow::from).collect();
    match ctx.output_format {
        OutputFormat::Csv => print_csv(&rows)?,
        _ => {
            if rows.is_empty() {
                println!("No claims yet.");
                return Ok(());
            }
            let active = records.iter().filter(|r| r.subdomain.is_some()).count();
            println!("{}", Table::new(&rows).with(Style::rounded()));
            println!();
            println!("{} {} active, {} owners", "Claims:".bold(), active, rows.len());
        }
    }

    Ok(())
}
