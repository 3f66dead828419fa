//! `subzone show` - The owner's claim and nameservers.
//!
//! Reads the claim file only; no API token is needed.

use anyhow::Result;
use colored::Colorize;
use subzone::{ClaimStore, OwnerRecord};

use super::Context;
use crate::output::{print_csv, print_structured, OutputFormat};

pub async fn execute(ctx: Context) -> Result<()> {
    let owner = ctx.require_owner()?;
    let store = ctx.store().await?;
    let record = store
        .get(owner)
        .await?
        .unwrap_or_else(|| OwnerRecord::new(owner));

    if print_structured(ctx.output_format, &record)? {
        return Ok(());
    }

    match ctx.output_format {
        OutputFormat::Csv => print_csv(record.nameservers.iter())?,
        _ => {
            println!("{} {}", "Owner:".bold(), record.owner.cyan());
            let Some(label) = &record.subdomain else {
                println!("  No registered subdomain.");
                return Ok(());
            };

            println!("  {} {}", "Subdomain:".bold(), label.green());
            if record.nameservers.is_empty() {
                println!("  {} (none)", "Nameservers:".bold());
            } else {
                println!("  {}", "Nameservers:".bold());
                for entry in &record.nameservers {
                    println!("    {} {}", entry.value, entry.id.dimmed());
                }
            }
        }
    }

    Ok(())
}
