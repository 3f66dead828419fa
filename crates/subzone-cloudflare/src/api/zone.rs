//! Zone endpoints.

use crate::CloudflareClient;
use serde::{Deserialize, Serialize};
use subzone_core::Result;

/// Zone details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    /// Zone id
    pub id: String,

    /// Zone apex name (e.g. `example.com`)
    pub name: String,

    /// Activation status (`active`, `pending`, ...)
    #[serde(default)]
    pub status: Option<String>,

    /// Whether the zone is paused
    #[serde(default)]
    pub paused: bool,
}

/// Zone endpoints
pub struct ZoneApi<'a> {
    client: &'a CloudflareClient,
}

impl<'a> ZoneApi<'a> {
    pub(crate) fn new(client: &'a CloudflareClient) -> Self {
        Self { client }
    }

    /// Get details of the configured zone
    pub async fn get(&self) -> Result<Zone> {
        self.client.get::<Zone>("", &[]).await?.into_result()
    }

    /// Get the zone apex name, lower-cased
    pub async fn name(&self) -> Result<String> {
        Ok(self.get().await?.name.to_ascii_lowercase())
    }
}
