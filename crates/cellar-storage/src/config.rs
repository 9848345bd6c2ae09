//! Storage configuration loading

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Storage configuration
///
/// The `provider` field selects the backend for the whole process at
/// startup; see [`crate::backend::create_backend`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub local: LocalStorageConfig,
    #[serde(default)]
    pub azure: AzureStorageConfig,
}

/// Local storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Flat directory every backend uses for locally resident copies
    #[serde(default = "default_local_path")]
    pub path: String,
}

/// Azure blob storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AzureStorageConfig {
    /// Blob service endpoint, e.g. `https://<account>.blob.core.windows.net`
    pub endpoint: Option<String>,
    /// Primary container name
    pub container: Option<String>,
    /// Container used by pipeline workflows
    pub pipeline_container: Option<String>,
    /// Shared access key; when absent the ambient credential chain
    /// (environment, managed identity) is used instead
    pub access_key: Option<String>,
    /// Allow plain-HTTP endpoints (Azurite, local development)
    #[serde(default)]
    pub allow_http: bool,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            path: default_local_path(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_local_path() -> String {
    "./data/uploads".to_string()
}

impl StorageConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: StorageConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            local: LocalStorageConfig::default(),
            azure: AzureStorageConfig::default(),
        }
    }
}
