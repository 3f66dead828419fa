//! Nameserver reconciliation.
//!
//! Turns a desired list of nameserver hosts into the smallest set of provider
//! calls against the subdomain's existing NS records:
//!
//! 1. entries whose value is still wanted are kept untouched;
//! 2. new values first reuse surplus records through an *update*, and only
//!    when the surplus pool is empty are new records *created*;
//! 3. whatever surplus is left over is *deleted*, concurrently.
//!
//! # Surplus policy
//!
//! The surplus pool is consumed LIFO: the last surplus entry (in current-set
//! order) is reused first. Any order is correct since surplus entries are
//! interchangeable; LIFO is fixed so results are deterministic.
//!
//! # Failures
//!
//! Provider failures are per entry and never abort the pass. A value whose
//! create or update failed is left out of the returned set, and the record
//! behind a failed update is retired along with the rest of the surplus. A
//! failed delete leaves an orphaned record at the provider. Every failure is
//! listed in the [`ReconcileReport`].

use futures_util::future::join_all;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use subzone_core::{
    DnsProvider, NameserverEntry, NameserverSet, RecordRequest, Result, SubzoneError,
};
use tracing::{debug, info, warn};

use crate::domain::ServiceDomain;

/// Provider operation issued during reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// New record
    Create,
    /// Existing record rewritten with a new value
    Update,
    /// Record removed
    Delete,
}

/// A provider call that did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileFailure {
    /// What was attempted
    pub operation: Operation,
    /// Record id, for update and delete
    pub id: Option<String>,
    /// Nameserver value involved
    pub value: Option<String>,
    /// Error text
    pub error: String,
}

/// What a reconciliation pass did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Entries kept without a provider call
    pub unchanged: Vec<NameserverEntry>,
    /// Entries created (with their new ids)
    pub created: Vec<NameserverEntry>,
    /// Entries whose record was reused (id kept, new value)
    pub updated: Vec<NameserverEntry>,
    /// Entries whose record was deleted
    pub deleted: Vec<NameserverEntry>,
    /// Entries dropped from the current set because an earlier entry had the same value
    pub duplicates: Vec<NameserverEntry>,
    /// Failed provider calls
    pub failures: Vec<ReconcileFailure>,
}

impl ReconcileReport {
    /// Total number of provider calls issued
    #[must_use]
    pub fn provider_calls(&self) -> usize {
        self.created.len() + self.updated.len() + self.deleted.len() + self.failures.len()
    }

    /// True when every provider call succeeded
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Ids of records whose delete failed and that remain live at the provider
    #[must_use]
    pub fn orphaned(&self) -> Vec<&str> {
        self.failures
            .iter()
            .filter(|f| f.operation == Operation::Delete)
            .filter_map(|f| f.id.as_deref())
            .collect()
    }

    fn fail(
        &mut self,
        operation: Operation,
        id: Option<&str>,
        value: Option<&str>,
        error: &SubzoneError,
    ) {
        warn!(?operation, id, value, %error, "nameserver provider call failed");
        self.failures.push(ReconcileFailure {
            operation,
            id: id.map(String::from),
            value: value.map(String::from),
            error: error.to_string(),
        });
    }
}

/// New authoritative set plus diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileOutcome {
    /// Authoritative nameserver set to persist
    pub set: NameserverSet,
    /// What happened along the way
    pub report: ReconcileReport,
}

/// Applies desired nameserver lists to the provider
pub struct Reconciler {
    provider: Arc<dyn DnsProvider>,
    domain: ServiceDomain,
    call_timeout: Duration,
    record_ttl: u32,
    annotate: bool,
}

impl Reconciler {
    /// Create a reconciler writing records under `domain`
    #[must_use]
    pub fn new(provider: Arc<dyn DnsProvider>, domain: ServiceDomain) -> Self {
        Self {
            provider,
            domain,
            call_timeout: Duration::from_secs(30),
            record_ttl: subzone_core::DEFAULT_RECORD_TTL,
            annotate: true,
        }
    }

    /// Set the per-call timeout
    #[must_use]
    pub const fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Set the TTL of written records
    #[must_use]
    pub const fn record_ttl(mut self, ttl: u32) -> Self {
        self.record_ttl = ttl;
        self
    }

    /// Whether created records carry a `subzone: <label>` comment
    #[must_use]
    pub const fn annotate(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }

    /// Converge `current` towards `desired` for `label`.
    ///
    /// The caller is responsible for validating `desired` and keeping it at
    /// most [`MAX_NAMESERVERS`](subzone_core::MAX_NAMESERVERS) long.
    pub async fn reconcile(
        &self,
        desired: &[String],
        current: &NameserverSet,
        label: &str,
    ) -> ReconcileOutcome {
        let mut report = ReconcileReport::default();

        let unique = current.dedup_by_value();
        report.duplicates = current
            .iter()
            .enumerate()
            .filter(|(i, e)| current.iter().take(*i).any(|prev| prev.value == e.value))
            .map(|(_, e)| e.clone())
            .collect();

        let mut wanted: Vec<&str> = Vec::with_capacity(desired.len());
        for value in desired {
            if !wanted.contains(&value.as_str()) {
                wanted.push(value);
            }
        }

        let mut kept: NameserverSet = unique
            .iter()
            .filter(|e| wanted.contains(&e.value.as_str()))
            .cloned()
            .collect();
        report.unchanged = kept.iter().cloned().collect();

        let to_add: Vec<&str> = wanted
            .iter()
            .copied()
            .filter(|v| !unique.contains_value(v))
            .collect();

        let mut surplus: Vec<NameserverEntry> = unique
            .iter()
            .filter(|e| !wanted.contains(&e.value.as_str()))
            .cloned()
            .collect();

        debug!(
            label,
            kept = kept.len(),
            to_add = to_add.len(),
            surplus = surplus.len(),
            "reconciling nameservers"
        );

        let mut retire = Vec::new();

        for value in to_add {
            let request = self.request(label, value);
            if let Some(reused) = surplus.pop() {
                let result = self
                    .bounded(self.provider.update_record(&reused.id, &request))
                    .await;
                match result {
                    Ok(true) => {
                        info!(label, id = %reused.id, from = %reused.value, to = value, "reused NS record");
                        let entry = NameserverEntry::new(reused.id, value);
                        report.updated.push(entry.clone());
                        kept.push(entry);
                    }
                    Ok(false) => {
                        let err = SubzoneError::Rejected("update refused".into());
                        report.fail(Operation::Update, Some(&reused.id), Some(value), &err);
                        retire.push(reused);
                    }
                    Err(err) => {
                        report.fail(Operation::Update, Some(&reused.id), Some(value), &err);
                        retire.push(reused);
                    }
                }
            } else {
                let result = self.bounded(self.provider.create_record(&request)).await;
                match result {
                    Ok(id) => {
                        info!(label, id = %id, value, "created NS record");
                        let entry = NameserverEntry::new(id, value);
                        report.created.push(entry.clone());
                        kept.push(entry);
                    }
                    Err(err) => report.fail(Operation::Create, None, Some(value), &err),
                }
            }
        }

        retire.append(&mut surplus);
        self.delete_entries(retire, &mut report).await;

        ReconcileOutcome { set: kept, report }
    }

    /// Delete every entry of `set`, concurrently.
    pub async fn delete_all(&self, set: &NameserverSet) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let mut entries: Vec<NameserverEntry> = Vec::with_capacity(set.len());
        for entry in set {
            if !entries.iter().any(|e| e.id == entry.id) {
                entries.push(entry.clone());
            }
        }
        self.delete_entries(entries, &mut report).await;
        report
    }

    async fn delete_entries(&self, entries: Vec<NameserverEntry>, report: &mut ReconcileReport) {
        if entries.is_empty() {
            return;
        }

        let results = join_all(
            entries
                .iter()
                .map(|e| self.bounded(self.provider.delete_record(&e.id))),
        )
        .await;

        for (entry, result) in entries.into_iter().zip(results) {
            match result {
                Ok(true) => {
                    info!(id = %entry.id, value = %entry.value, "deleted NS record");
                    report.deleted.push(entry);
                }
                Ok(false) => {
                    let err = SubzoneError::Rejected("delete refused".into());
                    report.fail(Operation::Delete, Some(&entry.id), Some(&entry.value), &err);
                }
                Err(err) => {
                    report.fail(Operation::Delete, Some(&entry.id), Some(&entry.value), &err);
                }
            }
        }
    }

    fn request(&self, label: &str, value: &str) -> RecordRequest {
        let request = RecordRequest::ns(self.domain.record_name(label), value).ttl(self.record_ttl);
        if self.annotate {
            request.comment(format!("subzone: {label}"))
        } else {
            request
        }
    }

    /// Run a provider call under the per-call timeout
    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .map_err(|_| SubzoneError::Timeout(self.call_timeout))?
    }
}
