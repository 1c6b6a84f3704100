//! Configuration management for Inspecta

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::store::{StoreSettings, DEFAULT_KEY, DEFAULT_LEGACY_KEYS};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which storage medium holds the envelope
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    File,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageKind,
    pub data_dir: PathBuf,
    /// Key of the current envelope
    pub key: String,
    /// Keys from earlier formats, migrated then removed
    pub legacy_keys: Vec<String>,
    /// Total bytes the medium accepts, `None` for unlimited
    pub quota_bytes: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProductsConfig {
    pub key: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EventsConfig {
    pub capacity: usize,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub products: ProductsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (e.g. INSPECTA_SERVER__PORT=9000)
            .add_source(
                Environment::with_prefix("INSPECTA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Override data directory from INSPECTA_DATA_DIR if present
            .set_override_option("storage.data_dir", env::var("INSPECTA_DATA_DIR").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl From<&StorageConfig> for StoreSettings {
    fn from(config: &StorageConfig) -> Self {
        Self {
            key: config.key.clone(),
            legacy_keys: config.legacy_keys.clone(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageKind::File,
            data_dir: PathBuf::from("data"),
            key: DEFAULT_KEY.to_string(),
            legacy_keys: DEFAULT_LEGACY_KEYS.iter().map(|k| k.to_string()).collect(),
            quota_bytes: Some(5 * 1024 * 1024),
        }
    }
}

impl Default for ProductsConfig {
    fn default() -> Self {
        Self {
            key: crate::catalog::DEFAULT_KEY.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            capacity: crate::events::DEFAULT_CAPACITY,
        }
    }
}
