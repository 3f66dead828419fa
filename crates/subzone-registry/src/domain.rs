//! The service domain users register labels under.

use std::fmt;
use subzone_core::{DnsProvider, Result, SubzoneError};

/// `prefix.zone`, or the bare zone when no prefix is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDomain {
    zone: String,
    name: String,
}

impl ServiceDomain {
    /// Build the service domain from a zone apex and an optional prefix.
    pub fn new(zone: &str, prefix: Option<&str>) -> Result<Self> {
        let zone = clean(zone);
        if zone.is_empty() || zone.split('.').any(str::is_empty) {
            return Err(SubzoneError::Config(format!("invalid zone name {zone:?}")));
        }

        let name = match prefix.map(clean).filter(|p| !p.is_empty()) {
            Some(prefix) if prefix.split('.').any(str::is_empty) => {
                return Err(SubzoneError::Config(format!("invalid prefix {prefix:?}")));
            }
            Some(prefix) => format!("{prefix}.{zone}"),
            None => zone.clone(),
        };

        Ok(Self { zone, name })
    }

    /// Ask the provider for the zone name and build the service domain.
    pub async fn resolve(provider: &dyn DnsProvider, prefix: Option<&str>) -> Result<Self> {
        let zone = provider.zone_name().await?;
        Self::new(&zone, prefix)
    }

    /// Zone apex (e.g. `example.com`)
    #[must_use]
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Full service domain (e.g. `dev.example.com`)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully qualified record name for a label
    #[must_use]
    pub fn record_name(&self, label: &str) -> String {
        format!("{label}.{}", self.name)
    }
}

impl fmt::Display for ServiceDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn clean(s: &str) -> String {
    s.trim().trim_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_prefix() {
        let domain = ServiceDomain::new("Example.com.", Some("dev")).unwrap();
        assert_eq!(domain.zone(), "example.com");
        assert_eq!(domain.name(), "dev.example.com");
        assert_eq!(domain.record_name("alice"), "alice.dev.example.com");
    }

    #[test]
    fn test_without_prefix() {
        let domain = ServiceDomain::new("example.com", Some("")).unwrap();
        assert_eq!(domain.to_string(), "example.com");
        assert_eq!(domain.record_name("alice"), "alice.example.com");
    }

    #[test]
    fn test_rejects_empty_labels() {
        assert!(ServiceDomain::new("", None).is_err());
        assert!(ServiceDomain::new("example..com", None).is_err());
        assert!(ServiceDomain::new("example.com", Some("a..b")).is_err());
    }
}
