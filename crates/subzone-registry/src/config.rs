//! Registry configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use subzone_core::{Result, SubzoneError, DEFAULT_RECORD_TTL};

/// Settings for a [`Registry`](crate::Registry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Prefix placed between user labels and the zone apex
    /// (`dev` gives `alice.dev.example.com`).
    #[serde(default)]
    pub prefix: Option<String>,

    /// How often the record cache is refreshed (seconds).
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Upper bound on a single provider call (seconds).
    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,

    /// TTL of created NS records (seconds).
    #[serde(default = "default_record_ttl")]
    pub record_ttl: u32,

    /// Attach a `subzone: <label>` comment to created records.
    #[serde(default = "default_true")]
    pub annotate_records: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            prefix: None,
            refresh_interval_secs: default_refresh_interval(),
            call_timeout_secs: default_call_timeout(),
            record_ttl: default_record_ttl(),
            annotate_records: true,
        }
    }
}

impl RegistryConfig {
    /// Cache refresh interval
    #[must_use]
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Per-call provider timeout
    #[must_use]
    pub const fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Check that the durations are usable.
    ///
    /// # Errors
    ///
    /// [`SubzoneError::Config`] if either interval is zero.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_secs == 0 {
            return Err(SubzoneError::Config(
                "refresh_interval_secs must be at least 1".into(),
            ));
        }
        if self.call_timeout_secs == 0 {
            return Err(SubzoneError::Config(
                "call_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// Default value functions for serde.
const fn default_refresh_interval() -> u64 {
    120
}

const fn default_call_timeout() -> u64 {
    30
}

const fn default_record_ttl() -> u32 {
    DEFAULT_RECORD_TTL
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert_eq!(config.refresh_interval(), Duration::from_secs(120));
        assert_eq!(config.call_timeout(), Duration::from_secs(30));
        assert_eq!(config.record_ttl, 3600);
        assert!(config.prefix.is_none());
        assert!(config.annotate_records);
    }

    #[test]
    fn test_zero_durations_rejected() {
        assert!(RegistryConfig::default().validate().is_ok());

        let config: RegistryConfig =
            serde_json::from_str(r#"{"refresh_interval_secs": 0}"#).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, SubzoneError::Config(ref m) if m.contains("refresh_interval_secs")));

        let config = RegistryConfig {
            call_timeout_secs: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, SubzoneError::Config(ref m) if m.contains("call_timeout_secs")));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: RegistryConfig = serde_json::from_str(r#"{"prefix": "dev"}"#).unwrap();
        assert_eq!(config.prefix.as_deref(), Some("dev"));
        assert_eq!(config.refresh_interval_secs, 120);
        assert!(config.annotate_records);
    }
}
