//! `subzone config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::{print_structured, OutputFormat};

pub async fn execute(ctx: Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(&ctx),
        ConfigCommands::Set { key, value } => set_config(&key, &value),
        ConfigCommands::Path => show_path(),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let mut config = Config::load()?;
    config.api_token = config.api_token.as_deref().map(mask);

    if print_structured(ctx.output_format, &config)? {
        return Ok(());
    }

    let unset = || "(not set)".dimmed().to_string();
    let show = |value: Option<String>| value.unwrap_or_else(unset);

    println!("{}", "Current Configuration:".bold());
    println!();
    println!("  {} {}", "api_token:".bold(), show(config.api_token));
    println!("  {} {}", "zone_id:".bold(), show(config.zone_id));
    println!("  {} {}", "owner:".bold(), show(config.owner));
    println!(
        "  {} {}",
        "store_path:".bold(),
        show(config.store_path.map(|p| p.display().to_string()))
    );
    println!("  {} {}", "api_base_url:".bold(), show(config.api_base_url));
    println!(
        "  {} {}",
        "output_format:".bold(),
        config.output_format.unwrap_or(OutputFormat::Pretty)
    );
    println!("  {} {}", "prefix:".bold(), show(config.registry.prefix));
    println!(
        "  {} {}s",
        "refresh_interval_secs:".bold(),
        config.registry.refresh_interval_secs
    );
    println!(
        "  {} {}s",
        "call_timeout_secs:".bold(),
        config.registry.call_timeout_secs
    );
    println!("  {} {}", "record_ttl:".bold(), config.registry.record_ttl);
    println!(
        "  {} {}",
        "annotate_records:".bold(),
        config.registry.annotate_records
    );

    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    if value.is_empty() {
        println!("{} {} unset.", "Success:".green().bold(), key);
    } else {
        println!("{} {} set.", "Success:".green().bold(), key);
    }

    Ok(())
}

fn show_path() -> Result<()> {
    let path = Config::path()?;
    println!("{}", path.display());
    Ok(())
}

fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask("abcdefghijkl"), "abcd...ijkl");
        assert_eq!(mask("short"), "****");
    }
}
