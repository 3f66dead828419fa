//! subzone - claim a subdomain and delegate it to your own nameservers.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    subzone_cli::run().await
}
