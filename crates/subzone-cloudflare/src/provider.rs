//! [`DnsProvider`] implementation backed by the Cloudflare API.

use crate::CloudflareClient;
use async_trait::async_trait;
use subzone_core::{DnsProvider, DnsRecord, RecordRequest, Result, SubzoneError};
use tracing::instrument;

/// Map a `success: false` envelope to `Ok(false)`, keeping real failures as errors
fn accepted<T>(result: Result<T>) -> Result<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(SubzoneError::Rejected(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl DnsProvider for CloudflareClient {
    #[instrument(skip(self), fields(provider = "cloudflare"))]
    async fn zone_name(&self) -> Result<String> {
        self.zone().name().await
    }

    #[instrument(skip(self), fields(provider = "cloudflare"))]
    async fn list_records(&self) -> Result<Vec<DnsRecord>> {
        self.records().list().send().await
    }

    #[instrument(skip(self, record), fields(provider = "cloudflare", name = %record.name, content = %record.content))]
    async fn create_record(&self, record: &RecordRequest) -> Result<String> {
        Ok(self.records().create(record).await?.id)
    }

    #[instrument(skip(self, record), fields(provider = "cloudflare", name = %record.name, content = %record.content))]
    async fn update_record(&self, id: &str, record: &RecordRequest) -> Result<bool> {
        accepted(self.records().update(id, record).await)
    }

    #[instrument(skip(self), fields(provider = "cloudflare"))]
    async fn delete_record(&self, id: &str) -> Result<bool> {
        accepted(self.records().delete(id).await)
    }
}
