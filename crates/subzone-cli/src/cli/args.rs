//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Claim a subdomain and delegate it to your own nameservers
///
/// Labels are registered under the service domain of a Cloudflare zone
/// (optionally below a prefix such as `dev`). Each owner may hold one label
/// and point it at up to six nameservers.
#[derive(Parser, Debug)]
#[command(name = "subzone")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Cloudflare API token (or set CLOUDFLARE_API_TOKEN env var)
    #[arg(short = 't', long, env = "CLOUDFLARE_API_TOKEN", global = true, hide_env_values = true)]
    pub api_token: Option<String>,

    /// Cloudflare zone id (or set CLOUDFLARE_ZONE_ID env var)
    #[arg(short = 'z', long, env = "CLOUDFLARE_ZONE_ID", global = true)]
    pub zone_id: Option<String>,

    /// Prefix between labels and the zone apex (e.g. `dev`)
    #[arg(long, env = "SUBZONE_PREFIX", global = true)]
    pub prefix: Option<String>,

    /// Claim file location
    #[arg(long, env = "SUBZONE_STORE", global = true)]
    pub store: Option<PathBuf>,

    /// Owner identity claims are made for
    #[arg(long, env = "SUBZONE_OWNER", global = true)]
    pub owner: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the Cloudflare zone and service domain
    Zone,

    /// List DNS records in the zone
    Records(RecordsArgs),

    /// Check whether a label can be registered
    Available(AvailableArgs),

    /// Register a label for the owner
    Register(RegisterArgs),

    /// Set the owner's nameservers
    Nameservers(NameserversArgs),

    /// Delete the owner's NS records and give the label back
    Release(ReleaseArgs),

    /// Show the owner's claim and nameservers
    Show,

    /// List every owner record
    Claims,

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// Records command
// ============================================================================

#[derive(Args, Debug)]
pub struct RecordsArgs {
    /// Only show NS records
    #[arg(long)]
    pub ns: bool,

    /// Only show records at or below this name
    #[arg(long)]
    pub name: Option<String>,
}

// ============================================================================
// Claim commands
// ============================================================================

#[derive(Args, Debug)]
pub struct AvailableArgs {
    /// Label to check (e.g. `alice` for alice.<service domain>)
    pub label: String,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Label to register
    pub label: String,
}

#[derive(Args, Debug)]
pub struct NameserversArgs {
    /// Nameserver host names (at most six)
    pub nameservers: Vec<String>,

    /// Remove every nameserver (required when none are given)
    #[arg(long, conflicts_with = "nameservers")]
    pub clear: bool,
}

#[derive(Args, Debug)]
pub struct ReleaseArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Key to set (e.g., zone_id, prefix, output_format)
        key: String,

        /// Value to set (empty to unset)
        value: String,
    },

    /// Show config file path
    Path,
}
