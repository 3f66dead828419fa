//! Periodically refreshed snapshot of the provider's DNS records.
//!
//! Readers always get the last good snapshot without touching the network.
//! A refresh replaces the snapshot wholesale; a failed refresh keeps the old
//! one.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use subzone_core::{DnsProvider, DnsRecord, Result};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Shortest period accepted by [`RecordCache::spawn_refresher`]
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Point-in-time copy of the zone's records
#[derive(Debug, Clone, Default)]
pub struct RecordSnapshot {
    records: Vec<DnsRecord>,
    fetched_at: Option<DateTime<Utc>>,
}

impl RecordSnapshot {
    /// Snapshot of `records` taken now
    #[must_use]
    pub fn new(records: Vec<DnsRecord>) -> Self {
        Self {
            records,
            fetched_at: Some(Utc::now()),
        }
    }

    /// All records
    #[must_use]
    pub fn records(&self) -> &[DnsRecord] {
        &self.records
    }

    /// When the snapshot was fetched; `None` before the first refresh
    #[must_use]
    pub const fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the snapshot holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records named `name` or below it
    pub fn at_or_below<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DnsRecord> + 'a {
        self.records.iter().filter(move |r| r.is_at_or_below(name))
    }
}

/// Owner of the current [`RecordSnapshot`]
pub struct RecordCache {
    provider: Arc<dyn DnsProvider>,
    snapshot: RwLock<Arc<RecordSnapshot>>,
    refresh_lock: Mutex<()>,
    // Set by `refresh_now`, cleared when a fetch starts.
    stale: AtomicBool,
}

impl RecordCache {
    /// Create an empty cache; nothing is fetched until a refresh
    #[must_use]
    pub fn new(provider: Arc<dyn DnsProvider>) -> Self {
        Self {
            provider,
            snapshot: RwLock::new(Arc::new(RecordSnapshot::default())),
            refresh_lock: Mutex::new(()),
            stale: AtomicBool::new(false),
        }
    }

    /// Current snapshot. Never blocks on the network.
    #[must_use]
    pub fn current(&self) -> Arc<RecordSnapshot> {
        Arc::clone(&self.snapshot.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Fetch all records and replace the snapshot.
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn refresh(&self) -> Result<usize> {
        let _guard = self.refresh_lock.lock().await;
        self.fetch().await
    }

    /// Start a refresh in the background. Errors are logged.
    ///
    /// If a refresh is already running, another one follows it, since the
    /// running one may have listed records before the caller's change.
    /// Requests queued behind the same running refresh share one follow-up.
    pub fn refresh_now(self: &Arc<Self>) {
        self.stale.store(true, Ordering::Release);

        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let _guard = cache.refresh_lock.lock().await;
            if !cache.stale.load(Ordering::Acquire) {
                debug!("record cache already refreshed");
                return;
            }
            if let Err(e) = cache.fetch().await {
                warn!(error = %e, "record cache refresh failed, keeping last snapshot");
            }
        });
    }

    /// Refresh once immediately and then every `interval` until aborted.
    ///
    /// `interval` is raised to [`MIN_REFRESH_INTERVAL`] if shorter.
    pub fn spawn_refresher(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        let interval = interval.max(MIN_REFRESH_INTERVAL);
        info!(interval_secs = interval.as_secs(), "starting record cache refresher");

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = cache.refresh().await {
                    warn!(error = %e, "record cache refresh failed, keeping last snapshot");
                }
            }
        })
    }

    // Caller holds `refresh_lock`.
    async fn fetch(&self) -> Result<usize> {
        self.stale.store(false, Ordering::Release);

        let records = self.provider.list_records().await?;
        let count = records.len();
        self.replace(RecordSnapshot::new(records));

        debug!(records = count, "record cache refreshed");
        Ok(count)
    }

    fn replace(&self, snapshot: RecordSnapshot) {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(snapshot);
    }
}
