use serde::{Deserialize, Serialize};

/// Maximum number of nameservers a subdomain may delegate to
pub const MAX_NAMESERVERS: usize = 6;

/// One delegation record owned by a subdomain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameserverEntry {
    /// Provider record id, needed to update or delete this exact record
    pub id: String,

    /// Nameserver host name
    pub value: String,
}

impl NameserverEntry {
    /// Create a new entry
    #[must_use]
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// Ordered nameserver entries of one subdomain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameserverSet(Vec<NameserverEntry>);

impl NameserverSet {
    /// Create an empty set
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the set holds more than [`MAX_NAMESERVERS`] entries
    #[must_use]
    pub fn exceeds_limit(&self) -> bool {
        self.0.len() > MAX_NAMESERVERS
    }

    /// Iterate over entries in order
    pub fn iter(&self) -> std::slice::Iter<'_, NameserverEntry> {
        self.0.iter()
    }

    /// Nameserver values in order
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.value.as_str()).collect()
    }

    /// Provider ids in order
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.id.as_str()).collect()
    }

    /// Returns true if some entry has this value
    #[must_use]
    pub fn contains_value(&self, value: &str) -> bool {
        self.0.iter().any(|e| e.value == value)
    }

    /// Append an entry
    pub fn push(&mut self, entry: NameserverEntry) {
        self.0.push(entry);
    }

    /// Copy of the set with duplicate values removed, first occurrence kept
    #[must_use]
    pub fn dedup_by_value(&self) -> Self {
        let mut unique = Self::new();
        for entry in &self.0 {
            if !unique.contains_value(&entry.value) {
                unique.push(entry.clone());
            }
        }
        unique
    }

    /// Borrow the entries
    #[must_use]
    pub fn as_slice(&self) -> &[NameserverEntry] {
        &self.0
    }

    /// Consume into the underlying vector
    #[must_use]
    pub fn into_vec(self) -> Vec<NameserverEntry> {
        self.0
    }
}

impl From<Vec<NameserverEntry>> for NameserverSet {
    fn from(entries: Vec<NameserverEntry>) -> Self {
        Self(entries)
    }
}

impl FromIterator<NameserverEntry> for NameserverSet {
    fn from_iter<I: IntoIterator<Item = NameserverEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for NameserverSet {
    type Item = NameserverEntry;
    type IntoIter = std::vec::IntoIter<NameserverEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a NameserverSet {
    type Item = &'a NameserverEntry;
    type IntoIter = std::slice::Iter<'a, NameserverEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
