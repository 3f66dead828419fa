//! # subzone-cli
//!
//! Command-line interface for the subzone registry.
//!
//! ## Features
//!
//! - **Zone inspection**: show the Cloudflare zone and its DNS records
//! - **Claims**: check availability, register and release a label
//! - **Delegation**: point a claimed label at your own nameservers
//! - **Multiple output formats**: Pretty tables, JSON, CSV, YAML

pub mod cli;
pub mod config;
pub mod output;
pub mod telemetry;

pub use cli::run;
