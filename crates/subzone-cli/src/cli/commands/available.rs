//! `subzone available` - Check whether a label can be registered.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use subzone::Availability;
use subzone_core::validate::{normalize_label, validate_label};

use super::Context;
use crate::cli::args::AvailableArgs;
use crate::output::{print_csv, print_structured, OutputFormat};

#[derive(Serialize)]
struct AvailabilityRow {
    label: String,
    name: String,
    available: bool,
    status: Availability,
}

pub async fn execute(ctx: Context, args: AvailableArgs) -> Result<()> {
    let label = normalize_label(&args.label);

    // Malformed labels never need the network
    if let Err(e) = validate_label(&label) {
        anyhow::bail!(
            "{e}\n\n\
             A label is 3-63 characters of letters, digits and '-', \
             a single level (no dots), not all digits, \
             and may not start or end with '-' or contain '--'."
        );
    }

    let registry = ctx.registry().await?;
    let status = registry.availability(&label).await;
    let row = AvailabilityRow {
        name: registry.domain().record_name(&label),
        label,
        available: status.is_available(),
        status,
    };

    if print_structured(ctx.output_format, &row)? {
        return Ok(());
    }

    match ctx.output_format {
        OutputFormat::Csv => print_csv([&row])?,
        _ => {
            if row.available {
                println!("{} {} is available", "✓".green().bold(), row.name.cyan());
                println!();
                println!("Register it with: {} register {}", "subzone".cyan(), row.label);
            } else {
                println!(
                    "{} {} is not available ({})",
                    "✗".red().bold(),
                    row.name.cyan(),
                    row.status
                );
            }
        }
    }

    Ok(())
}
