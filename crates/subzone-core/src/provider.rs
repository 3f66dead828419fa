//! The narrow interface the registry needs from a DNS provider.

use async_trait::async_trait;

use crate::{DnsRecord, RecordRequest, Result};

/// DNS provider operations on a single zone
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Name of the managed zone (e.g. `example.com`)
    async fn zone_name(&self) -> Result<String>;

    /// Every record currently served for the zone
    async fn list_records(&self) -> Result<Vec<DnsRecord>>;

    /// Create a record, returning its provider id
    async fn create_record(&self, record: &RecordRequest) -> Result<String>;

    /// Overwrite the record `id`; `Ok(false)` means the provider refused
    async fn update_record(&self, id: &str, record: &RecordRequest) -> Result<bool>;

    /// Delete the record `id`; `Ok(false)` means the provider refused
    async fn delete_record(&self, id: &str) -> Result<bool>;
}
