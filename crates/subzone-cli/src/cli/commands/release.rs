//! `subzone release` - Give the owner's label back.

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use subzone::SubzoneError;

use super::Context;
use crate::cli::args::ReleaseArgs;
use crate::output::{print_csv, print_structured, OutputFormat};

pub async fn execute(ctx: Context, args: ReleaseArgs) -> Result<()> {
    let owner = ctx.require_owner()?;

    let registry = ctx.registry().await?;
    let Some(label) = registry.owner(owner).await?.and_then(|r| r.subdomain) else {
        anyhow::bail!("{owner} has no registered subdomain");
    };
    let name = registry.domain().record_name(&label);

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Release {name} and delete its NS records?"))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let report = match registry.release(owner).await {
        Ok(report) => report,
        Err(SubzoneError::PartialRelease { label, orphaned }) => {
            eprintln!(
                "{} released {} but these NS records could not be deleted: {}",
                "Warning:".yellow().bold(),
                label,
                orphaned.join(", ")
            );
            anyhow::bail!("delete the records above in the Cloudflare dashboard");
        }
        Err(e) => return Err(e.into()),
    };

    if print_structured(ctx.output_format, &report)? {
        return Ok(());
    }

    match ctx.output_format {
        OutputFormat::Csv => print_csv(report.deleted.iter())?,
        _ => {
            println!("{} {} released", "Success:".green().bold(), name.cyan());
            for entry in &report.deleted {
                println!("  deleted {} {}", entry.value, entry.id.dimmed());
            }
        }
    }

    Ok(())
}
