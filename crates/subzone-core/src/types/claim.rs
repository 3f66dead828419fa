use serde::{Deserialize, Serialize};

use super::NameserverSet;

/// Association between one owner and one claimed label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdomainClaim {
    /// Owner identity (e.g. the authenticated e-mail address)
    pub owner: String,

    /// Claimed label
    pub label: String,
}

/// Persisted per-owner state
///
/// A released owner has `subdomain: None` and an empty nameserver list; the
/// field is omitted from the serialized form rather than stored as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRecord {
    /// Owner identity
    pub owner: String,

    /// Claimed label, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,

    /// Delegation records of the claimed label
    #[serde(default, skip_serializing_if = "NameserverSet::is_empty")]
    pub nameservers: NameserverSet,
}

impl OwnerRecord {
    /// Create a record with no claim
    #[must_use]
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            ..Default::default()
        }
    }

    /// The owner's claim, if one is held
    #[must_use]
    pub fn claim(&self) -> Option<SubdomainClaim> {
        self.subdomain.as_ref().map(|label| SubdomainClaim {
            owner: self.owner.clone(),
            label: label.clone(),
        })
    }
}
