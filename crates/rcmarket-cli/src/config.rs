//! CLI configuration types

use rcmarket_core::REFERENCE_TOTAL_SUPPLY;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment prefix for overrides, e.g. `RCMARKET__TOKEN__TOTAL_SUPPLY`
pub const ENV_PREFIX: &str = "RCMARKET";

/// Complete CLI configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Market state storage
    #[serde(default)]
    pub store: StoreConfig,

    /// Token supply fed to the phantom RC print rate
    #[serde(default)]
    pub token: TokenConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Layer the optional file at `path` and `RCMARKET__*` variables over the defaults
    pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

/// Storage settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Data directory
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Zone owning the market objects
    #[serde(default = "default_zone")]
    pub zone: String,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_zone() -> String {
    "resources".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            zone: default_zone(),
        }
    }
}

/// Token settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Total token supply in base units
    #[serde(default = "default_total_supply")]
    pub total_supply: u64,
}

fn default_total_supply() -> u64 {
    REFERENCE_TOTAL_SUPPLY
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            total_supply: default_total_supply(),
        }
    }
}

/// Logging configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of text
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.store.data_dir, "./data");
        assert_eq!(config.store.zone, "resources");
        assert_eq!(config.token.total_supply, REFERENCE_TOTAL_SUPPLY);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rcmarket.toml");
        std::fs::write(&path, "[token]\ntotal_supply = 42\n\n[logging]\njson = true\n").unwrap();

        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.token.total_supply, 42);
        assert!(config.logging.json);
        assert_eq!(config.store.zone, "resources");
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.store.data_dir, "./data");
    }

    #[test]
    fn test_round_trips_through_toml() {
        let text = toml::to_string_pretty(&CliConfig::default()).unwrap();
        let parsed: CliConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.token.total_supply, REFERENCE_TOTAL_SUPPLY);
    }
}
