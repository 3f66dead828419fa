//! Command implementations.

pub mod available;
pub mod claims;
pub mod config;
pub mod nameservers;
pub mod records;
pub mod register;
pub mod release;
pub mod show;
pub mod zone;

use anyhow::{Context as _, Result};
use std::path::PathBuf;
use std::sync::Arc;
use subzone::{CloudflareClient, JsonClaimStore, Registry, RegistryConfig};

use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Cloudflare API token
    pub api_token: Option<String>,

    /// Cloudflare zone id
    pub zone_id: Option<String>,

    /// Owner identity
    pub owner: Option<String>,

    /// Cloudflare API base URL override
    pub api_base_url: Option<String>,

    /// Claim file location
    pub store_path: PathBuf,

    /// Registry settings
    pub registry: RegistryConfig,

    /// Output format
    pub output_format: OutputFormat,

    /// Verbose output
    pub verbose: bool,
}

impl Context {
    /// Get the API token, returning an error if not set.
    pub fn require_api_token(&self) -> Result<&str> {
        self.api_token.as_deref().filter(|t| !t.is_empty()).ok_or_else(|| {
            anyhow::anyhow!(
                "Cloudflare API token required.\n\n\
                 Set it with one of:\n  \
                 1. --api-token <TOKEN>\n  \
                 2. CLOUDFLARE_API_TOKEN environment variable\n  \
                 3. subzone config set api_token <TOKEN>\n\n\
                 The token needs Zone:Read and DNS:Edit on the zone."
            )
        })
    }

    /// Get the zone id, returning an error if not set.
    pub fn require_zone_id(&self) -> Result<&str> {
        self.zone_id.as_deref().filter(|z| !z.is_empty()).ok_or_else(|| {
            anyhow::anyhow!(
                "Cloudflare zone id required.\n\n\
                 Set it with one of:\n  \
                 1. --zone-id <ID>\n  \
                 2. CLOUDFLARE_ZONE_ID environment variable\n  \
                 3. subzone config set zone_id <ID>"
            )
        })
    }

    /// Get the owner identity, returning an error if not set.
    pub fn require_owner(&self) -> Result<&str> {
        self.owner.as_deref().filter(|o| !o.is_empty()).ok_or_else(|| {
            anyhow::anyhow!(
                "Owner required.\n\n\
                 Set it with one of:\n  \
                 1. --owner <ID>\n  \
                 2. SUBZONE_OWNER environment variable\n  \
                 3. subzone config set owner <ID>"
            )
        })
    }

    /// Create a Cloudflare client for the configured zone.
    pub fn client(&self) -> Result<CloudflareClient> {
        self.registry.validate()?;
        let mut builder =
            CloudflareClient::builder(self.require_api_token()?, self.require_zone_id()?)
                .timeout(self.registry.call_timeout());
        if let Some(url) = &self.api_base_url {
            builder = builder.base_url(url);
        }
        Ok(builder.build()?)
    }

    /// Open the claim file.
    pub async fn store(&self) -> Result<JsonClaimStore> {
        JsonClaimStore::open(&self.store_path)
            .await
            .with_context(|| format!("failed to open claim store {}", self.store_path.display()))
    }

    /// Connect a registry over the Cloudflare zone and the claim file.
    pub async fn registry(&self) -> Result<Registry> {
        let client = self.client()?;
        let store = self.store().await?;
        let registry = Registry::connect(Arc::new(client), Arc::new(store), &self.registry).await?;
        Ok(registry)
    }
}
