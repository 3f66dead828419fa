//! The caller-facing registry.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError};
use std::time::Duration;
use subzone_core::validate::{
    normalize_label, normalize_nameserver, validate_label, validate_nameserver,
};
use subzone_core::{
    DnsProvider, NameserverEntry, OwnerRecord, Result, SubdomainClaim, SubzoneError,
    MAX_NAMESERVERS,
};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::availability::{Availability, AvailabilityChecker};
use crate::cache::RecordCache;
use crate::config::RegistryConfig;
use crate::domain::ServiceDomain;
use crate::reconcile::{ReconcileOutcome, Reconciler};
use crate::store::ClaimStore;

/// Result of a clean release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseReport {
    /// The claim that was released
    pub claim: SubdomainClaim,
    /// NS records removed at the provider
    pub deleted: Vec<NameserverEntry>,
}

/// One async mutex per owner, created on demand
#[derive(Default)]
struct OwnerLocks(std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>);

impl OwnerLocks {
    async fn acquire(&self, owner: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.0.lock().unwrap_or_else(PoisonError::into_inner);
            // Entries nobody holds or waits on are dropped.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(owner.to_string()).or_default())
        };
        lock.lock_owned().await
    }
}

/// Subdomain registry over a DNS provider and a claim store.
///
/// Claims are created through [`register`](Self::register), delegated with
/// [`update_nameservers`](Self::update_nameservers) and given back with
/// [`release`](Self::release). Nameserver changes and releases for the same
/// owner never run concurrently.
pub struct Registry {
    store: Arc<dyn ClaimStore>,
    cache: Arc<RecordCache>,
    domain: ServiceDomain,
    availability: AvailabilityChecker,
    reconciler: Reconciler,
    refresh_interval: Duration,
    locks: OwnerLocks,
}

impl Registry {
    /// Assemble a registry for a known service domain. No I/O happens here.
    ///
    /// # Errors
    ///
    /// [`SubzoneError::Config`] if `config` has a zero interval.
    pub fn new(
        provider: Arc<dyn DnsProvider>,
        store: Arc<dyn ClaimStore>,
        domain: ServiceDomain,
        config: &RegistryConfig,
    ) -> Result<Self> {
        config.validate()?;

        let cache = Arc::new(RecordCache::new(Arc::clone(&provider)));
        let availability =
            AvailabilityChecker::new(Arc::clone(&cache), Arc::clone(&store), domain.clone());
        let reconciler = Reconciler::new(provider, domain.clone())
            .call_timeout(config.call_timeout())
            .record_ttl(config.record_ttl)
            .annotate(config.annotate_records);

        Ok(Self {
            store,
            cache,
            domain,
            availability,
            reconciler,
            refresh_interval: config.refresh_interval(),
            locks: OwnerLocks::default(),
        })
    }

    /// Resolve the service domain from the provider and load the first
    /// snapshot.
    ///
    /// A failed initial snapshot is logged; the registry starts with an empty
    /// one and the refresher catches up.
    pub async fn connect(
        provider: Arc<dyn DnsProvider>,
        store: Arc<dyn ClaimStore>,
        config: &RegistryConfig,
    ) -> Result<Self> {
        config.validate()?;
        let domain = ServiceDomain::resolve(provider.as_ref(), config.prefix.as_deref()).await?;
        info!(domain = %domain, "registry connected");

        let registry = Self::new(provider, store, domain, config)?;
        if let Err(e) = registry.cache.refresh().await {
            warn!(error = %e, "initial record snapshot failed");
        }
        Ok(registry)
    }

    /// Service domain labels are registered under
    #[must_use]
    pub const fn domain(&self) -> &ServiceDomain {
        &self.domain
    }

    /// Record cache backing availability checks
    #[must_use]
    pub const fn cache(&self) -> &Arc<RecordCache> {
        &self.cache
    }

    /// Reconciler used for nameserver changes
    #[must_use]
    pub const fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Start the periodic snapshot refresh
    pub fn spawn_refresher(&self) -> JoinHandle<()> {
        self.cache.spawn_refresher(self.refresh_interval)
    }

    /// True when `label` can be registered
    pub async fn check_availability(&self, label: &str) -> bool {
        self.availability(label).await.is_available()
    }

    /// Availability of `label` with the reason
    pub async fn availability(&self, label: &str) -> Availability {
        self.availability.check(&normalize_label(label)).await
    }

    /// Claim `label` for `owner`.
    #[instrument(skip(self), fields(domain = %self.domain))]
    pub async fn register(&self, owner: &str, label: &str) -> Result<SubdomainClaim> {
        let label = normalize_label(label);
        validate_label(&label)?;

        if let Some(held) = self.store.get(owner).await?.and_then(|r| r.subdomain) {
            return Err(SubzoneError::AlreadyClaimed { label: held });
        }

        match self.availability.check(&label).await {
            Availability::Available => {}
            Availability::Invalid => return Err(SubzoneError::InvalidLabel(label)),
            reason => {
                info!(label = %label, %reason, "label not available");
                return Err(SubzoneError::LabelUnavailable(label));
            }
        }

        let claim = self.store.claim(owner, &label).await?;
        info!(label = %claim.label, "subdomain registered");
        Ok(claim)
    }

    /// Make the owner's NS records match `desired`.
    ///
    /// Every value is validated and the count capped before any provider
    /// call. The returned set is what was persisted.
    #[instrument(skip(self, desired), fields(domain = %self.domain, count = desired.len()))]
    pub async fn update_nameservers(
        &self,
        owner: &str,
        desired: &[String],
    ) -> Result<ReconcileOutcome> {
        if desired.len() > MAX_NAMESERVERS {
            return Err(SubzoneError::TooManyNameservers {
                count: desired.len(),
                max: MAX_NAMESERVERS,
            });
        }
        let desired: Vec<String> = desired.iter().map(|v| normalize_nameserver(v)).collect();
        for value in &desired {
            validate_nameserver(value)?;
        }

        let _guard = self.locks.acquire(owner).await;

        let record = self.store.get(owner).await?;
        let Some((label, current)) =
            record.and_then(|r| r.subdomain.map(|label| (label, r.nameservers)))
        else {
            return Err(SubzoneError::NoClaim(owner.to_string()));
        };

        let outcome = self.reconciler.reconcile(&desired, &current, &label).await;
        if outcome.report.provider_calls() > 0 {
            self.cache.refresh_now();
        }

        self.store.set_nameservers(owner, &outcome.set).await?;
        info!(
            label = %label,
            nameservers = outcome.set.len(),
            failures = outcome.report.failures.len(),
            "nameservers updated"
        );
        Ok(outcome)
    }

    /// Delete the owner's NS records and give the label back.
    ///
    /// The claim is released even when some deletes fail; the leftover record
    /// ids are then returned in [`SubzoneError::PartialRelease`].
    #[instrument(skip(self), fields(domain = %self.domain))]
    pub async fn release(&self, owner: &str) -> Result<ReleaseReport> {
        let _guard = self.locks.acquire(owner).await;

        let record = self.store.get(owner).await?;
        let Some((claim, nameservers)) =
            record.and_then(|r| r.claim().map(|claim| (claim, r.nameservers)))
        else {
            return Err(SubzoneError::NoClaim(owner.to_string()));
        };

        let report = self.reconciler.delete_all(&nameservers).await;
        if report.provider_calls() > 0 {
            self.cache.refresh_now();
        }

        self.store.release(owner).await?;

        let orphaned: Vec<String> = report.orphaned().into_iter().map(String::from).collect();
        if !orphaned.is_empty() {
            warn!(label = %claim.label, ?orphaned, "released with orphaned NS records");
            return Err(SubzoneError::PartialRelease {
                label: claim.label,
                orphaned,
            });
        }

        info!(label = %claim.label, deleted = report.deleted.len(), "subdomain released");
        Ok(ReleaseReport {
            claim,
            deleted: report.deleted,
        })
    }

    /// The owner's persisted record
    pub async fn owner(&self, owner: &str) -> Result<Option<OwnerRecord>> {
        self.store.get(owner).await
    }

    /// Every owner record
    pub async fn claims(&self) -> Result<Vec<OwnerRecord>> {
        self.store.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryClaimStore;
    use crate::testing::{ns_record, Call, FakeProvider};
    use async_trait::async_trait;
    use subzone_core::NameserverSet;

    const ALICE: &str = "alice@example.com";

    fn registry_with(provider: &Arc<FakeProvider>, store: Arc<dyn ClaimStore>) -> Registry {
        let domain = ServiceDomain::new("example.com", Some("dev")).unwrap();
        Registry::new(
            Arc::clone(provider) as Arc<dyn DnsProvider>,
            store,
            domain,
            &RegistryConfig::default(),
        )
        .unwrap()
    }

    fn registry(provider: &Arc<FakeProvider>) -> Registry {
        registry_with(provider, Arc::new(MemoryClaimStore::new()))
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[tokio::test]
    async fn test_connect_resolves_domain_and_snapshot() {
        let provider = Arc::new(FakeProvider::with_records(vec![ns_record(
            "r1",
            "bob.dev.example.com",
            "ns1.b.net",
        )]));
        let config = RegistryConfig {
            prefix: Some("dev".into()),
            ..Default::default()
        };
        let registry = Registry::connect(
            Arc::clone(&provider) as Arc<dyn DnsProvider>,
            Arc::new(MemoryClaimStore::new()),
            &config,
        )
        .await
        .unwrap();

        assert_eq!(registry.domain().name(), "dev.example.com");
        assert_eq!(registry.cache().current().len(), 1);
        assert!(!registry.check_availability("bob").await);
        assert!(registry.check_availability("alice").await);
    }

    #[tokio::test]
    async fn test_register_flow() {
        let provider = Arc::new(FakeProvider::new());
        let registry = registry(&provider);

        let claim = registry.register(ALICE, " Alice ").await.unwrap();
        assert_eq!(claim.label, "alice");
        assert!(!registry.check_availability("alice").await);
        assert_eq!(registry.availability("alice").await, Availability::Claimed);

        let err = registry.register(ALICE, "second").await.unwrap_err();
        assert!(matches!(err, SubzoneError::AlreadyClaimed { label } if label == "alice"));

        let err = registry.register("bob@example.com", "alice").await.unwrap_err();
        assert!(matches!(err, SubzoneError::LabelUnavailable(_)));

        assert!(provider.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_and_taken_labels() {
        let provider = Arc::new(FakeProvider::with_records(vec![ns_record(
            "r1",
            "www.bob.dev.example.com",
            "ns1.b.net",
        )]));
        let registry = registry(&provider);
        registry.cache().refresh().await.unwrap();

        let err = registry.register(ALICE, "sub.example").await.unwrap_err();
        assert!(matches!(err, SubzoneError::InvalidLabel(_)));

        let err = registry.register(ALICE, "bob").await.unwrap_err();
        assert!(matches!(err, SubzoneError::LabelUnavailable(_)));

        assert!(registry.owner(ALICE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_nameservers() {
        let provider = Arc::new(FakeProvider::new());
        let registry = registry(&provider);
        registry.register(ALICE, "alice").await.unwrap();

        let outcome = registry
            .update_nameservers(ALICE, &strings(&["NS1.Example.com.", "ns2.example.com"]))
            .await
            .unwrap();
        assert_eq!(outcome.set.values(), vec!["ns1.example.com", "ns2.example.com"]);
        assert_eq!(outcome.report.created.len(), 2);

        let stored = registry.owner(ALICE).await.unwrap().unwrap();
        assert_eq!(stored.nameservers, outcome.set);

        provider.clear_calls();
        let outcome = registry
            .update_nameservers(ALICE, &strings(&["ns2.example.com", "ns3.example.com"]))
            .await
            .unwrap();
        assert_eq!(
            provider.mutations(),
            vec![Call::Update {
                id: "101".into(),
                content: "ns3.example.com".into()
            }]
        );
        assert_eq!(outcome.set.values(), vec!["ns2.example.com", "ns3.example.com"]);
    }

    #[tokio::test]
    async fn test_update_nameservers_validates_before_provider() {
        let provider = Arc::new(FakeProvider::new());
        let registry = registry(&provider);
        registry.register(ALICE, "alice").await.unwrap();

        let seven: Vec<String> = (1..=7).map(|i| format!("ns{i}.example.com")).collect();
        let err = registry.update_nameservers(ALICE, &seven).await.unwrap_err();
        assert!(matches!(err, SubzoneError::TooManyNameservers { count: 7, max: 6 }));

        let err = registry
            .update_nameservers(ALICE, &strings(&["ns1.example.com", "localhost"]))
            .await
            .unwrap_err();
        assert!(matches!(err, SubzoneError::InvalidNameserver(v) if v == "localhost"));

        assert!(provider.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_update_nameservers_without_claim() {
        let provider = Arc::new(FakeProvider::new());
        let registry = registry(&provider);

        let err = registry
            .update_nameservers(ALICE, &strings(&["ns1.example.com"]))
            .await
            .unwrap_err();
        assert!(matches!(err, SubzoneError::NoClaim(_)));
    }

    #[tokio::test]
    async fn test_release_deletes_records() {
        let provider = Arc::new(FakeProvider::new());
        let registry = registry(&provider);
        registry.register(ALICE, "alice").await.unwrap();
        registry
            .update_nameservers(ALICE, &strings(&["ns1.example.com", "ns2.example.com"]))
            .await
            .unwrap();

        let report = registry.release(ALICE).await.unwrap();
        assert_eq!(report.claim.label, "alice");
        assert_eq!(report.deleted.len(), 2);
        assert!(provider.records.lock().unwrap().is_empty());

        let record = registry.owner(ALICE).await.unwrap().unwrap();
        assert!(record.subdomain.is_none());
        assert!(record.nameservers.is_empty());

        let err = registry.release(ALICE).await.unwrap_err();
        assert!(matches!(err, SubzoneError::NoClaim(_)));
    }

    #[tokio::test]
    async fn test_cache_refreshed_after_provider_changes() {
        let provider = Arc::new(FakeProvider::new());
        let registry = registry(&provider);
        registry.register(ALICE, "alice").await.unwrap();

        provider.clear_calls();
        registry
            .update_nameservers(ALICE, &strings(&["ns1.example.com"]))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(provider.calls().last(), Some(&Call::List));
        assert_eq!(
            registry.cache().current().at_or_below("alice.dev.example.com").count(),
            1
        );

        provider.clear_calls();
        registry.release(ALICE).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(provider.calls().last(), Some(&Call::List));
        assert!(registry.cache().current().is_empty());
    }

    #[tokio::test]
    async fn test_no_refresh_without_provider_calls() {
        let provider = Arc::new(FakeProvider::new());
        let registry = registry(&provider);
        registry.register(ALICE, "alice").await.unwrap();
        registry
            .update_nameservers(ALICE, &strings(&["ns1.example.com"]))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        provider.clear_calls();
        let outcome = registry
            .update_nameservers(ALICE, &strings(&["ns1.example.com"]))
            .await
            .unwrap();
        assert_eq!(outcome.report.provider_calls(), 0);

        registry.register("bob@example.com", "bob").await.unwrap();
        registry.release("bob@example.com").await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_zero_intervals_rejected() {
        let provider = Arc::new(FakeProvider::new());
        let config = RegistryConfig {
            refresh_interval_secs: 0,
            ..Default::default()
        };
        let err = Registry::connect(
            Arc::clone(&provider) as Arc<dyn DnsProvider>,
            Arc::new(MemoryClaimStore::new()),
            &config,
        )
        .await
        .err()
        .unwrap();
        assert!(matches!(err, SubzoneError::Config(_)));
        assert!(provider.calls().is_empty());

        let config = RegistryConfig {
            call_timeout_secs: 0,
            ..Default::default()
        };
        let domain = ServiceDomain::new("example.com", None).unwrap();
        let result = Registry::new(
            Arc::clone(&provider) as Arc<dyn DnsProvider>,
            Arc::new(MemoryClaimStore::new()),
            domain,
            &config,
        );
        assert!(matches!(result, Err(SubzoneError::Config(_))));
    }

    #[tokio::test]
    async fn test_partial_release_still_unsets_claim() {
        let provider = Arc::new(FakeProvider::new());
        let registry = registry(&provider);
        registry.register(ALICE, "alice").await.unwrap();
        registry
            .update_nameservers(ALICE, &strings(&["ns1.example.com", "ns2.example.com"]))
            .await
            .unwrap();
        provider.fail_delete.lock().unwrap().insert("102".into());

        let err = registry.release(ALICE).await.unwrap_err();
        match err {
            SubzoneError::PartialRelease { label, orphaned } => {
                assert_eq!(label, "alice");
                assert_eq!(orphaned, vec!["102".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }

        let record = registry.owner(ALICE).await.unwrap().unwrap();
        assert!(record.subdomain.is_none());
    }

    /// Store whose writes after claiming always fail
    struct ReadOnlyStore(MemoryClaimStore);

    #[async_trait]
    impl ClaimStore for ReadOnlyStore {
        async fn get(&self, owner: &str) -> Result<Option<OwnerRecord>> {
            self.0.get(owner).await
        }

        async fn find_by_label(&self, label: &str) -> Result<Option<SubdomainClaim>> {
            self.0.find_by_label(label).await
        }

        async fn claim(&self, owner: &str, label: &str) -> Result<SubdomainClaim> {
            self.0.claim(owner, label).await
        }

        async fn set_nameservers(&self, _: &str, _: &NameserverSet) -> Result<()> {
            Err(SubzoneError::Persistence("read-only".into()))
        }

        async fn release(&self, _: &str) -> Result<OwnerRecord> {
            Err(SubzoneError::Persistence("read-only".into()))
        }

        async fn list(&self) -> Result<Vec<OwnerRecord>> {
            self.0.list().await
        }
    }

    #[tokio::test]
    async fn test_persistence_failure_is_reported() {
        let provider = Arc::new(FakeProvider::new());
        let registry = registry_with(&provider, Arc::new(ReadOnlyStore(MemoryClaimStore::new())));
        registry.register(ALICE, "alice").await.unwrap();

        let err = registry
            .update_nameservers(ALICE, &strings(&["ns1.example.com"]))
            .await
            .unwrap_err();
        assert!(matches!(err, SubzoneError::Persistence(_)));
        assert_eq!(provider.mutations().len(), 1);
    }

    #[tokio::test]
    async fn test_updates_for_one_owner_are_serialized() {
        let provider = Arc::new(FakeProvider::new());
        *provider.delay.lock().unwrap() = Some(Duration::from_millis(20));
        let registry = Arc::new(registry(&provider));
        registry.register(ALICE, "alice").await.unwrap();

        let first = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                registry
                    .update_nameservers(ALICE, &strings(&["ns1.example.com", "ns2.example.com"]))
                    .await
            })
        };
        let second = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                registry
                    .update_nameservers(ALICE, &strings(&["ns3.example.com"]))
                    .await
            })
        };
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        let stored = registry.owner(ALICE).await.unwrap().unwrap().nameservers;
        let mut live: Vec<String> = provider
            .records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.id.clone())
            .collect();
        let mut stored_ids: Vec<String> = stored.ids().into_iter().map(String::from).collect();
        stored_ids.sort();
        live.sort();
        assert_eq!(stored_ids, live);
        assert!(stored.len() <= 2);
    }

    #[tokio::test]
    async fn test_claims_lists_owners() {
        let provider = Arc::new(FakeProvider::new());
        let registry = registry(&provider);
        registry.register(ALICE, "alice").await.unwrap();
        registry.register("bob@example.com", "bob").await.unwrap();

        let claims = registry.claims().await.unwrap();
        let labels: Vec<_> = claims.iter().filter_map(|r| r.subdomain.as_deref()).collect();
        assert_eq!(labels, vec!["alice", "bob"]);
    }
}
