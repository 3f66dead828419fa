//! DNS record endpoints.

use super::ResultInfo;
use crate::CloudflareClient;
use serde::Deserialize;
use subzone_core::{DnsRecord, RecordRequest, Result};
use tracing::debug;

/// Default page size for record listings
const DEFAULT_PER_PAGE: u32 = 100;

/// Upper bound on pages fetched by one listing
const MAX_PAGES: u32 = 500;

#[derive(Debug, Deserialize)]
struct DeletedRecord {
    id: String,
}

/// DNS record endpoints
pub struct RecordsApi<'a> {
    client: &'a CloudflareClient,
}

impl<'a> RecordsApi<'a> {
    pub(crate) fn new(client: &'a CloudflareClient) -> Self {
        Self { client }
    }

    /// List records in the zone (all pages)
    #[must_use]
    pub fn list(&self) -> ListRecordsBuilder<'a> {
        ListRecordsBuilder::new(self.client)
    }

    /// Create a record
    pub async fn create(&self, record: &RecordRequest) -> Result<DnsRecord> {
        self.client
            .post::<DnsRecord, _>("/dns_records", record)
            .await?
            .into_result()
    }

    /// Overwrite a record
    pub async fn update(&self, id: &str, record: &RecordRequest) -> Result<DnsRecord> {
        self.client
            .put::<DnsRecord, _>(&format!("/dns_records/{id}"), record)
            .await?
            .into_result()
    }

    /// Delete a record, returning the deleted id
    pub async fn delete(&self, id: &str) -> Result<String> {
        let deleted: DeletedRecord = self
            .client
            .delete(&format!("/dns_records/{id}"))
            .await?
            .into_result()?;
        Ok(deleted.id)
    }
}

/// Builder for record listings
pub struct ListRecordsBuilder<'a> {
    client: &'a CloudflareClient,
    record_type: Option<String>,
    name: Option<String>,
    per_page: u32,
}

impl<'a> ListRecordsBuilder<'a> {
    fn new(client: &'a CloudflareClient) -> Self {
        Self {
            client,
            record_type: None,
            name: None,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Filter by record type (NS, A, CNAME, ...)
    #[must_use]
    pub fn record_type(mut self, rtype: impl Into<String>) -> Self {
        self.record_type = Some(rtype.into());
        self
    }

    /// Filter by exact record name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the page size
    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Execute the request, following pagination until the last page
    pub async fn send(self) -> Result<Vec<DnsRecord>> {
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let (batch, info) = self.fetch_page(page).await?;
            let fetched = batch.len();
            records.extend(batch);

            let total_pages = info.map_or(page, |i| i.total_pages);
            debug!(page, total_pages, fetched, "fetched DNS record page");

            if page >= total_pages || fetched == 0 || page >= MAX_PAGES {
                break;
            }
            page += 1;
        }

        Ok(records)
    }

    async fn fetch_page(&self, page: u32) -> Result<(Vec<DnsRecord>, Option<ResultInfo>)> {
        let page_str = page.to_string();
        let per_page_str = self.per_page.to_string();

        let mut params = vec![("page", page_str.as_str()), ("per_page", per_page_str.as_str())];
        if let Some(ref rtype) = self.record_type {
            params.push(("type", rtype.as_str()));
        }
        if let Some(ref name) = self.name {
            params.push(("name", name.as_str()));
        }

        let envelope = self.client.get::<Vec<DnsRecord>>("/dns_records", &params).await?;
        let info = envelope.result_info;
        Ok((envelope.into_result()?, info))
    }
}
