//! Configuration management.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use subzone::RegistryConfig;

use crate::output::OutputFormat;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "SUBZONE_CONFIG";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Cloudflare API token.
    pub api_token: Option<String>,

    /// Cloudflare zone id.
    pub zone_id: Option<String>,

    /// Owner identity used when `--owner` is not given.
    pub owner: Option<String>,

    /// Claim file location.
    pub store_path: Option<PathBuf>,

    /// Cloudflare API base URL override.
    pub api_base_url: Option<String>,

    /// Default output format.
    pub output_format: Option<OutputFormat>,

    /// Registry settings (prefix, refresh and timeouts, record TTL).
    #[serde(default)]
    pub registry: RegistryConfig,
}

impl Config {
    /// Get the config file path.
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Default claim file location.
    pub fn default_store_path() -> Result<PathBuf> {
        Ok(project_dirs()?.data_dir().join("claims.json"))
    }

    /// Load configuration from file.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Set a key from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let optional = || (!value.is_empty()).then(|| value.to_string());
        match key {
            "api_token" | "token" => self.api_token = optional(),
            "zone_id" | "zone" => self.zone_id = optional(),
            "owner" => self.owner = optional(),
            "store_path" | "store" => self.store_path = optional().map(PathBuf::from),
            "api_base_url" => self.api_base_url = optional(),
            "output_format" | "output" => self.output_format = Some(value.parse()?),
            "prefix" => self.registry.prefix = optional(),
            "refresh_interval_secs" => self.registry.refresh_interval_secs = seconds(key, value)?,
            "call_timeout_secs" => self.registry.call_timeout_secs = seconds(key, value)?,
            "record_ttl" => self.registry.record_ttl = value.parse()?,
            "annotate_records" => self.registry.annotate_records = value.parse()?,
            _ => anyhow::bail!(
                "Unknown config key: {key}\n\n\
                 Available keys:\n  \
                 api_token             - Cloudflare API token\n  \
                 zone_id               - Cloudflare zone id\n  \
                 owner                 - Default owner identity\n  \
                 store_path            - Claim file location\n  \
                 api_base_url          - Cloudflare API base URL\n  \
                 output_format         - Default output format (pretty/json/csv/yaml)\n  \
                 prefix                - Service domain prefix (e.g. dev)\n  \
                 refresh_interval_secs - Record cache refresh interval\n  \
                 call_timeout_secs     - Per-call provider timeout\n  \
                 record_ttl            - TTL of created NS records\n  \
                 annotate_records      - Comment created records (true/false)"
            ),
        }
        Ok(())
    }
}

/// A whole number of seconds, at least 1.
fn seconds(key: &str, value: &str) -> Result<u64> {
    match value.parse()? {
        0 => anyhow::bail!("{key} must be at least 1 second"),
        secs => Ok(secs),
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "subzone", "subzone")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seconds_rejected() {
        let mut config = Config::default();
        let err = config.set("refresh_interval_secs", "0").unwrap_err();
        assert!(err.to_string().contains("at least 1"));
        assert!(config.set("call_timeout_secs", "0").is_err());

        config.set("refresh_interval_secs", "15").unwrap();
        assert_eq!(config.registry.refresh_interval_secs, 15);
        assert_eq!(config.registry.call_timeout_secs, 30);
    }

    #[test]
    fn test_set_known_keys() {
        let mut config = Config::default();
        config.set("zone_id", "abc123").unwrap();
        config.set("prefix", "dev").unwrap();
        config.set("record_ttl", "600").unwrap();
        config.set("output", "json").unwrap();

        assert_eq!(config.zone_id.as_deref(), Some("abc123"));
        assert_eq!(config.registry.prefix.as_deref(), Some("dev"));
        assert_eq!(config.registry.record_ttl, 600);
        assert_eq!(config.output_format, Some(OutputFormat::Json));

        config.set("prefix", "").unwrap();
        assert!(config.registry.prefix.is_none());
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set("nope", "1").is_err());
        assert!(config.set("record_ttl", "soon").is_err());
    }

    #[test]
    fn test_toml_roundtrip_keeps_registry_defaults() {
        let config: Config = toml::from_str("zone_id = \"z\"\n[registry]\nprefix = \"dev\"\n").unwrap();
        assert_eq!(config.registry.refresh_interval_secs, 120);
        assert_eq!(config.registry.prefix.as_deref(), Some("dev"));

        let text = toml::to_string_pretty(&config).unwrap();
        let again: Config = toml::from_str(&text).unwrap();
        assert_eq!(again.registry, config.registry);
    }
}
