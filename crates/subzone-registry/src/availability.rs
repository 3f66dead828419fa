//! Label availability.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use subzone_core::validate::is_acceptable_label;
use tracing::{debug, warn};

use crate::cache::RecordCache;
use crate::domain::ServiceDomain;
use crate::store::ClaimStore;

/// Why a label is or is not available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Free to claim
    Available,
    /// Rejected by the label rules
    Invalid,
    /// The provider already has records at or below the label
    ProviderRecordExists,
    /// Another owner holds the label
    Claimed,
    /// The claim store could not be consulted
    Unknown,
}

impl Availability {
    /// Only [`Availability::Available`] counts as available
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Available => "available",
            Self::Invalid => "invalid label",
            Self::ProviderRecordExists => "records already exist",
            Self::Claimed => "already claimed",
            Self::Unknown => "unknown",
        })
    }
}

/// Decides whether a label can be claimed.
///
/// Checks run cheapest first: label rules, then the cached provider records,
/// then the claim store. Anything short of a clean pass is "not available".
pub struct AvailabilityChecker {
    cache: Arc<RecordCache>,
    store: Arc<dyn ClaimStore>,
    domain: ServiceDomain,
}

impl AvailabilityChecker {
    /// Create a checker over the given snapshot owner and claim store
    #[must_use]
    pub fn new(cache: Arc<RecordCache>, store: Arc<dyn ClaimStore>, domain: ServiceDomain) -> Self {
        Self {
            cache,
            store,
            domain,
        }
    }

    /// Availability of `label` with the reason
    pub async fn check(&self, label: &str) -> Availability {
        if !is_acceptable_label(label) {
            return Availability::Invalid;
        }

        let fqdn = self.domain.record_name(label);
        let snapshot = self.cache.current();
        let taken = snapshot
            .records()
            .iter()
            .any(|r| r.name.eq_ignore_ascii_case(label) || r.is_at_or_below(&fqdn));
        if taken {
            debug!(label, "label has provider records");
            return Availability::ProviderRecordExists;
        }

        match self.store.find_by_label(&label.to_ascii_lowercase()).await {
            Ok(Some(_)) => Availability::Claimed,
            Ok(None) => Availability::Available,
            Err(e) => {
                warn!(label, error = %e, "claim lookup failed, treating label as unavailable");
                Availability::Unknown
            }
        }
    }

    /// True only when `label` is free to claim
    pub async fn is_available(&self, label: &str) -> bool {
        self.check(label).await.is_available()
    }
}
