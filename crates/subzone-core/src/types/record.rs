use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record type used for subdomain delegation
pub const NS_RECORD_TYPE: &str = "NS";

/// Default TTL for delegation records (seconds)
pub const DEFAULT_RECORD_TTL: u32 = 3600;

/// DNS record as served by the provider for the managed zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned record id
    pub id: String,

    /// Fully qualified record name
    pub name: String,

    /// Record type (A, AAAA, CNAME, NS, TXT, ...)
    #[serde(rename = "type")]
    pub record_type: String,

    /// Record content (address, target host, text)
    #[serde(default)]
    pub content: String,

    /// Free-form comment attached to the record
    #[serde(default)]
    pub comment: Option<String>,

    /// Provider tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Creation timestamp
    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,

    /// Last modification timestamp
    #[serde(default)]
    pub modified_on: Option<DateTime<Utc>>,
}

impl DnsRecord {
    /// Returns true if this is an NS record
    #[must_use]
    pub fn is_ns(&self) -> bool {
        self.record_type.eq_ignore_ascii_case(NS_RECORD_TYPE)
    }

    /// Returns true if the record is named `name` or sits below it.
    ///
    /// Comparison ignores ASCII case and a trailing root dot.
    #[must_use]
    pub fn is_at_or_below(&self, name: &str) -> bool {
        let own = trim_root(&self.name);
        let name = trim_root(name);
        if own.eq_ignore_ascii_case(name) {
            return true;
        }
        let (own, name) = (own.as_bytes(), name.as_bytes());
        own.len() > name.len() + 1
            && own[own.len() - name.len()..].eq_ignore_ascii_case(name)
            && own[own.len() - name.len() - 1] == b'.'
    }
}

fn trim_root(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Create/update payload for a provider record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordRequest {
    /// Record type, always `NS` for delegations
    #[serde(rename = "type")]
    pub record_type: String,

    /// Fully qualified record name
    pub name: String,

    /// Record content (the nameserver host)
    pub content: String,

    /// Time to live in seconds
    pub ttl: u32,

    /// Optional comment, only sent when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl RecordRequest {
    /// Build an NS record request with the default TTL
    #[must_use]
    pub fn ns(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            record_type: NS_RECORD_TYPE.to_string(),
            name: name.into(),
            content: content.into(),
            ttl: DEFAULT_RECORD_TTL,
            comment: None,
        }
    }

    /// Set the TTL
    #[must_use]
    pub const fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Attach a comment
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}
