//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use freshmart_commerce::config::{CartConfig, CheckoutConfig};
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where session storage areas live.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Product catalog source.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Cart store settings.
    #[serde(default)]
    pub cart: CartConfig,

    /// Checkout settings.
    #[serde(default)]
    pub checkout: CheckoutConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }
}

/// Session storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one file per session (default: `.freshmart`).
    #[serde(default = "default_storage_dir")]
    pub dir: String,

    /// Per-session byte quota; unlimited when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_bytes: Option<usize>,
}

fn default_storage_dir() -> String {
    ".freshmart".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            quota_bytes: None,
        }
    }
}

/// Catalog configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON file with the product list; the bundled demo catalog is used
    /// when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}
