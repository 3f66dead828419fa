//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;

use crate::config::Config;
use crate::output::OutputFormat;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    crate::telemetry::init(cli.verbose)?;
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration
    let config = Config::load()?;

    // Flags and environment win over the config file
    let output_format = cli
        .output
        .or(config.output_format)
        .unwrap_or(OutputFormat::Pretty);

    let store_path = match cli.store.or_else(|| config.store_path.clone()) {
        Some(path) => path,
        None => Config::default_store_path()?,
    };

    let mut registry = config.registry.clone();
    if cli.prefix.is_some() {
        registry.prefix = cli.prefix;
    }

    // Create context for commands
    let ctx = commands::Context {
        api_token: cli.api_token.or_else(|| config.api_token.clone()),
        zone_id: cli.zone_id.or_else(|| config.zone_id.clone()),
        owner: cli.owner.or_else(|| config.owner.clone()),
        api_base_url: config.api_base_url.clone(),
        store_path,
        registry,
        output_format,
        verbose: cli.verbose,
    };

    // Dispatch to appropriate command
    match cli.command {
        Commands::Zone => commands::zone::execute(ctx).await,
        Commands::Records(args) => commands::records::execute(ctx, args).await,
        Commands::Available(args) => commands::available::execute(ctx, args).await,
        Commands::Register(args) => commands::register::execute(ctx, args).await,
        Commands::Nameservers(args) => commands::nameservers::execute(ctx, args).await,
        Commands::Release(args) => commands::release::execute(ctx, args).await,
        Commands::Show => commands::show::execute(ctx).await,
        Commands::Claims => commands::claims::execute(ctx).await,
        Commands::Config(args) => commands::config::execute(ctx, args).await,
    }
}
