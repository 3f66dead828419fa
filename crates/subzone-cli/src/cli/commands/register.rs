//! `subzone register` - Claim a label for the owner.

use anyhow::Result;
use colored::Colorize;
use subzone_core::validate::{normalize_label, validate_label};

use super::Context;
use crate::cli::args::RegisterArgs;
use crate::output::{print_csv, print_structured, OutputFormat};

pub async fn execute(ctx: Context, args: RegisterArgs) -> Result<()> {
    let owner = ctx.require_owner()?;
    validate_label(&normalize_label(&args.label))?;

    let registry = ctx.registry().await?;
    let claim = registry.register(owner, &args.label).await?;

    if print_structured(ctx.output_format, &claim)? {
        return Ok(());
    }

    match ctx.output_format {
        OutputFormat::Csv => print_csv([&claim])?,
        _ => {
            println!(
                "{} {} registered to {}",
                "Success:".green().bold(),
                registry.domain().record_name(&claim.label).cyan(),
                claim.owner
            );
            println!();
            println!(
                "Delegate it with: {} nameservers <NS>...",
                "subzone".cyan()
            );
        }
    }

    Ok(())
}
