//! Claim storage.
//!
//! Two implementations of [`ClaimStore`] are provided: [`MemoryClaimStore`]
//! for tests and embedding, and [`JsonClaimStore`] which keeps every owner
//! record in one JSON file rewritten atomically on each change.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use subzone_core::{
    NameserverSet, OwnerRecord, Result, SubdomainClaim, SubzoneError, MAX_NAMESERVERS,
};
use tokio::sync::RwLock;
use tracing::debug;

/// Persistent owner/claim state
#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Record of `owner`, if one exists
    async fn get(&self, owner: &str) -> Result<Option<OwnerRecord>>;

    /// Owner currently holding `label`
    async fn find_by_label(&self, label: &str) -> Result<Option<SubdomainClaim>>;

    /// Atomically assign `label` to `owner`.
    ///
    /// Fails with `AlreadyClaimed` if the owner holds a label and with
    /// `LabelUnavailable` if another owner holds this one.
    async fn claim(&self, owner: &str, label: &str) -> Result<SubdomainClaim>;

    /// Replace the owner's nameserver set. The owner must hold a claim.
    async fn set_nameservers(&self, owner: &str, nameservers: &NameserverSet) -> Result<()>;

    /// Unset the owner's claim and nameservers, returning the record as it was
    /// before.
    async fn release(&self, owner: &str) -> Result<OwnerRecord>;

    /// All owner records, ordered by owner
    async fn list(&self) -> Result<Vec<OwnerRecord>>;
}

/// Owner records keyed by owner, with the rules shared by all stores
#[derive(Debug, Clone, Default)]
struct Records(BTreeMap<String, OwnerRecord>);

impl Records {
    fn get(&self, owner: &str) -> Option<OwnerRecord> {
        self.0.get(owner).cloned()
    }

    fn find_by_label(&self, label: &str) -> Option<SubdomainClaim> {
        self.0
            .values()
            .find(|r| r.subdomain.as_deref() == Some(label))
            .and_then(OwnerRecord::claim)
    }

    fn claim(&mut self, owner: &str, label: &str) -> Result<SubdomainClaim> {
        if let Some(held) = self.0.get(owner).and_then(|r| r.subdomain.clone()) {
            return Err(SubzoneError::AlreadyClaimed { label: held });
        }
        if self.find_by_label(label).is_some() {
            return Err(SubzoneError::LabelUnavailable(label.to_string()));
        }

        let record = self
            .0
            .entry(owner.to_string())
            .or_insert_with(|| OwnerRecord::new(owner));
        record.subdomain = Some(label.to_string());
        record.nameservers = NameserverSet::default();

        Ok(SubdomainClaim {
            owner: owner.to_string(),
            label: label.to_string(),
        })
    }

    fn set_nameservers(&mut self, owner: &str, nameservers: &NameserverSet) -> Result<()> {
        if nameservers.exceeds_limit() {
            return Err(SubzoneError::TooManyNameservers {
                count: nameservers.len(),
                max: MAX_NAMESERVERS,
            });
        }
        match self.0.get_mut(owner) {
            Some(record) if record.subdomain.is_some() => {
                record.nameservers = nameservers.clone();
                Ok(())
            }
            _ => Err(SubzoneError::NoClaim(owner.to_string())),
        }
    }

    fn release(&mut self, owner: &str) -> Result<OwnerRecord> {
        match self.0.get_mut(owner) {
            Some(record) if record.subdomain.is_some() => {
                let previous = record.clone();
                record.subdomain = None;
                record.nameservers = NameserverSet::default();
                Ok(previous)
            }
            _ => Err(SubzoneError::NoClaim(owner.to_string())),
        }
    }

    fn list(&self) -> Vec<OwnerRecord> {
        self.0.values().cloned().collect()
    }
}

/// In-memory [`ClaimStore`]
#[derive(Debug, Default)]
pub struct MemoryClaimStore {
    records: RwLock<Records>,
}

impl MemoryClaimStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClaimStore for MemoryClaimStore {
    async fn get(&self, owner: &str) -> Result<Option<OwnerRecord>> {
        Ok(self.records.read().await.get(owner))
    }

    async fn find_by_label(&self, label: &str) -> Result<Option<SubdomainClaim>> {
        Ok(self.records.read().await.find_by_label(label))
    }

    async fn claim(&self, owner: &str, label: &str) -> Result<SubdomainClaim> {
        self.records.write().await.claim(owner, label)
    }

    async fn set_nameservers(&self, owner: &str, nameservers: &NameserverSet) -> Result<()> {
        self.records.write().await.set_nameservers(owner, nameservers)
    }

    async fn release(&self, owner: &str) -> Result<OwnerRecord> {
        self.records.write().await.release(owner)
    }

    async fn list(&self) -> Result<Vec<OwnerRecord>> {
        Ok(self.records.read().await.list())
    }
}

/// [`ClaimStore`] backed by a JSON file.
///
/// The file holds an array of owner records. Every change is written to a
/// sibling temporary file which then replaces the original, and the in-memory
/// state only advances once the write succeeded.
#[derive(Debug)]
pub struct JsonClaimStore {
    path: PathBuf,
    records: RwLock<Records>,
}

impl JsonClaimStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Records::default(),
            Ok(bytes) => {
                let list: Vec<OwnerRecord> = serde_json::from_slice(&bytes).map_err(|e| {
                    SubzoneError::Persistence(format!("{}: {e}", path.display()))
                })?;
                Records(list.into_iter().map(|r| (r.owner.clone(), r)).collect())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Records::default(),
            Err(e) => {
                return Err(SubzoneError::Persistence(format!(
                    "{}: {e}",
                    path.display()
                )))
            }
        };

        debug!(path = %path.display(), owners = records.0.len(), "opened claim store");
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    /// Location of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the records, persist it, then publish it.
    async fn mutate<T>(&self, change: impl FnOnce(&mut Records) -> Result<T>) -> Result<T> {
        let mut records = self.records.write().await;
        let mut next = records.clone();
        let value = change(&mut next)?;
        self.persist(&next).await?;
        *records = next;
        Ok(value)
    }

    async fn persist(&self, records: &Records) -> Result<()> {
        let json = serde_json::to_vec_pretty(&records.list())?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| self.io_error(&e))?;
        }
        tokio::fs::write(&tmp, json).await.map_err(|e| self.io_error(&e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(&e))?;

        debug!(path = %self.path.display(), owners = records.0.len(), "claim store written");
        Ok(())
    }

    fn io_error(&self, e: &std::io::Error) -> SubzoneError {
        SubzoneError::Persistence(format!("{}: {e}", self.path.display()))
    }
}

#[async_trait]
impl ClaimStore for JsonClaimStore {
    async fn get(&self, owner: &str) -> Result<Option<OwnerRecord>> {
        Ok(self.records.read().await.get(owner))
    }

    async fn find_by_label(&self, label: &str) -> Result<Option<SubdomainClaim>> {
        Ok(self.records.read().await.find_by_label(label))
    }

    async fn claim(&self, owner: &str, label: &str) -> Result<SubdomainClaim> {
        self.mutate(|r| r.claim(owner, label)).await
    }

    async fn set_nameservers(&self, owner: &str, nameservers: &NameserverSet) -> Result<()> {
        self.mutate(|r| r.set_nameservers(owner, nameservers)).await
    }

    async fn release(&self, owner: &str) -> Result<OwnerRecord> {
        self.mutate(|r| r.release(owner)).await
    }

    async fn list(&self) -> Result<Vec<OwnerRecord>> {
        Ok(self.records.read().await.list())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use subzone_core::NameserverEntry;

    fn ns(values: &[(&str, &str)]) -> NameserverSet {
        values
            .iter()
            .map(|(id, v)| NameserverEntry::new(*id, *v))
            .collect()
    }

    #[tokio::test]
    async fn test_claim_rules() {
        let store = MemoryClaimStore::new();

        let claim = store.claim("alice@example.com", "alice").await.unwrap();
        assert_eq!(claim.label, "alice");

        let err = store.claim("alice@example.com", "other").await.unwrap_err();
        assert!(matches!(err, SubzoneError::AlreadyClaimed { label } if label == "alice"));

        let err = store.claim("bob@example.com", "alice").await.unwrap_err();
        assert!(matches!(err, SubzoneError::LabelUnavailable(_)));

        let found = store.find_by_label("alice").await.unwrap().unwrap();
        assert_eq!(found.owner, "alice@example.com");
    }

    #[tokio::test]
    async fn test_concurrent_claims_have_one_winner() {
        let store = Arc::new(MemoryClaimStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.claim(&format!("user{i}"), "shared").await })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_set_nameservers_requires_claim_and_cap() {
        let store = MemoryClaimStore::new();
        let err = store
            .set_nameservers("alice@example.com", &ns(&[("1", "ns1.a.net")]))
            .await
            .unwrap_err();
        assert!(matches!(err, SubzoneError::NoClaim(_)));

        store.claim("alice@example.com", "alice").await.unwrap();
        let seven: Vec<(String, String)> = (0..7)
            .map(|i| (i.to_string(), format!("ns{i}.a.net")))
            .collect();
        let seven: NameserverSet = seven
            .iter()
            .map(|(id, v)| NameserverEntry::new(id.as_str(), v.as_str()))
            .collect();
        let err = store
            .set_nameservers("alice@example.com", &seven)
            .await
            .unwrap_err();
        assert!(matches!(err, SubzoneError::TooManyNameservers { count: 7, max: 6 }));

        let set = ns(&[("1", "ns1.a.net")]);
        store.set_nameservers("alice@example.com", &set).await.unwrap();
        let record = store.get("alice@example.com").await.unwrap().unwrap();
        assert_eq!(record.nameservers, set);
    }

    #[tokio::test]
    async fn test_release_returns_previous_and_frees_label() {
        let store = MemoryClaimStore::new();
        store.claim("alice@example.com", "alice").await.unwrap();
        store
            .set_nameservers("alice@example.com", &ns(&[("1", "ns1.a.net")]))
            .await
            .unwrap();

        let previous = store.release("alice@example.com").await.unwrap();
        assert_eq!(previous.subdomain.as_deref(), Some("alice"));
        assert_eq!(previous.nameservers.len(), 1);

        let record = store.get("alice@example.com").await.unwrap().unwrap();
        assert!(record.subdomain.is_none());
        assert!(record.nameservers.is_empty());
        assert!(store.find_by_label("alice").await.unwrap().is_none());

        let err = store.release("alice@example.com").await.unwrap_err();
        assert!(matches!(err, SubzoneError::NoClaim(_)));

        // The label can be claimed again by someone else.
        store.claim("bob@example.com", "alice").await.unwrap();
    }

    #[tokio::test]
    async fn test_json_store_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claims.json");

        {
            let store = JsonClaimStore::open(&path).await.unwrap();
            assert!(store.list().await.unwrap().is_empty());
            store.claim("alice@example.com", "alice").await.unwrap();
            store
                .set_nameservers("alice@example.com", &ns(&[("7", "ns1.a.net")]))
                .await
                .unwrap();
            store.claim("bob@example.com", "bob").await.unwrap();
            store.release("bob@example.com").await.unwrap();
        }

        let store = JsonClaimStore::open(&path).await.unwrap();
        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].subdomain.as_deref(), Some("alice"));
        assert_eq!(records[0].nameservers.ids(), vec!["7"]);
        assert!(records[1].subdomain.is_none());

        // Released owners are stored without a subdomain field.
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains(r#""subdomain": """#));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_json_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claims.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonClaimStore::open(&path).await.unwrap_err();
        assert!(matches!(err, SubzoneError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the rename fail.
        let path = dir.path().join("claims.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();

        let store = JsonClaimStore {
            path: path.clone(),
            records: RwLock::new(Records::default()),
        };
        let err = store.claim("alice@example.com", "alice").await.unwrap_err();
        assert!(matches!(err, SubzoneError::Persistence(_)));
        assert!(store.get("alice@example.com").await.unwrap().is_none());
    }
}
