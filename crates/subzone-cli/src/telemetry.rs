//! Log output.
//!
//! Logs go to stderr so they never mix with command output. `RUST_LOG`
//! overrides the default level.

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `verbose` lowers the default level to debug.
pub fn init(verbose: bool) -> Result<()> {
    let default_level = if verbose { "subzone=debug,info" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose),
        )
        .try_init()?;

    Ok(())
}
