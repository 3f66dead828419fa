//! `subzone zone` - Zone and service domain details.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use subzone::ServiceDomain;

use super::Context;
use crate::output::{print_csv, print_structured, OutputFormat};

#[derive(Serialize)]
struct ZoneInfo {
    id: String,
    name: String,
    status: Option<String>,
    paused: bool,
    service_domain: String,
}

pub async fn execute(ctx: Context) -> Result<()> {
    let client = ctx.client()?;
    let zone = client.zone().get().await?;
    let domain = ServiceDomain::new(&zone.name, ctx.registry.prefix.as_deref())?;

    let info = ZoneInfo {
        id: zone.id,
        name: zone.name,
        status: zone.status,
        paused: zone.paused,
        service_domain: domain.name().to_string(),
    };

    if print_structured(ctx.output_format, &info)? {
        return Ok(());
    }

    match ctx.output_format {
        OutputFormat::Csv => print_csv([&info])?,
        _ => {
            println!("{} {}", "Zone:".bold(), info.name.cyan().bold());
            println!();
            println!("  {} {}", "ID:".bold(), info.id);
            println!(
                "  {} {}",
                "Status:".bold(),
                info.status.as_deref().unwrap_or("unknown")
            );
            if info.paused {
                println!("  {} {}", "Paused:".bold(), "yes".yellow());
            }
            println!("  {} {}", "Service domain:".bold(), info.service_domain.green());
            println!();
            println!(
                "Labels are registered as {}",
                format!("<label>.{}", info.service_domain).cyan()
            );
        }
    }

    Ok(())
}
