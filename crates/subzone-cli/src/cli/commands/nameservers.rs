//! `subzone nameservers` - Point the owner's label at a set of nameservers.

use anyhow::Result;
use colored::Colorize;
use subzone::{NameserverEntry, ReconcileOutcome, MAX_NAMESERVERS};
use subzone_core::validate::{normalize_nameserver, validate_nameserver};
use tabled::{settings::Style, Table, Tabled};

use super::Context;
use crate::cli::args::NameserversArgs;
use crate::output::{print_csv, print_structured, OutputFormat};

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Nameserver")]
    value: String,
    #[tabled(rename = "Record ID")]
    id: String,
    #[tabled(rename = "Change")]
    change: String,
}

pub async fn execute(ctx: Context, args: NameserversArgs) -> Result<()> {
    let owner = ctx.require_owner()?;

    if args.nameservers.is_empty() && !args.clear {
        anyhow::bail!("No nameservers given. Pass --clear to remove all of them.");
    }
    if args.nameservers.len() > MAX_NAMESERVERS {
        anyhow::bail!(
            "{} nameservers given, at most {MAX_NAMESERVERS} are allowed",
            args.nameservers.len()
        );
    }
    for value in &args.nameservers {
        validate_nameserver(&normalize_nameserver(value))?;
    }

    let registry = ctx.registry().await?;
    let outcome = registry.update_nameservers(owner, &args.nameservers).await?;

    if !print_structured(ctx.output_format, &outcome)? {
        match ctx.output_format {
            OutputFormat::Csv => print_csv(outcome.set.iter())?,
            _ => print_pretty(&outcome),
        }
    }

    let failures = outcome.report.failures.len();
    if failures > 0 {
        anyhow::bail!("{failures} provider call(s) failed; the nameservers above are what is live");
    }

    Ok(())
}

fn print_pretty(outcome: &ReconcileOutcome) {
    let report = &outcome.report;
    let change = |entry: &NameserverEntry| {
        if report.created.contains(entry) {
            "created".green().to_string()
        } else if report.updated.contains(entry) {
            "updated".yellow().to_string()
        } else {
            "unchanged".dimmed().to_string()
        }
    };

    if outcome.set.is_empty() {
        println!("{}", "No nameservers delegated.".bold());
    } else {
        let rows: Vec<EntryRow> = outcome
            .set
            .iter()
            .map(|entry| EntryRow {
                value: entry.value.clone(),
                id: entry.id.clone(),
                change: change(entry),
            })
            .collect();
        println!("{}", Table::new(rows).with(Style::rounded()));
    }

    if !report.deleted.is_empty() {
        println!();
        println!("{}", "Removed:".bold());
        for entry in &report.deleted {
            println!("  {} {}", entry.value.red(), entry.id.dimmed());
        }
    }

    if !report.failures.is_empty() {
        println!();
        println!("{}", "Failures:".red().bold());
        for failure in &report.failures {
            println!(
                "  {:?} {} {}: {}",
                failure.operation,
                failure.value.as_deref().unwrap_or("-"),
                failure.id.as_deref().unwrap_or(""),
                failure.error
            );
        }
    }
}
