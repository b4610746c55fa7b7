//! CLI configuration.

use std::path::Path;
use std::time::Duration;

use abyssinia_auth::DEFAULT_MERCHANT_PIN;
use abyssinia_store::StoreOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;

/// Names searched for when no `--config` is given.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["abyssinia.toml", ".abyssinia.toml", "abyssinia.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Order storage.
    #[serde(default)]
    pub store: StoreConfig,

    /// Merchant area.
    #[serde(default)]
    pub merchant: MerchantConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Product catalog source.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().is_some_and(|e| e == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }
}

/// Which backend holds the order history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
    /// One JSON file per key in `store.dir`.
    #[default]
    File,
    /// Process memory; history is lost on exit.
    Memory,
}

/// Order storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackendKind,

    /// Directory for the file backend, relative to the working directory.
    #[serde(default = "default_store_dir")]
    pub dir: String,

    /// Simulated delay before a save commits.
    #[serde(default = "default_save_latency_ms")]
    pub save_latency_ms: u64,

    /// Simulated delay before a listing returns.
    #[serde(default = "default_list_latency_ms")]
    pub list_latency_ms: u64,

    /// Fail on corrupt records instead of skipping them.
    #[serde(default)]
    pub strict_reads: bool,
}

fn default_store_dir() -> String {
    ".abyssinia/orders".to_string()
}

fn default_save_latency_ms() -> u64 {
    1500
}

fn default_list_latency_ms() -> u64 {
    500
}

impl StoreConfig {
    pub fn options(&self) -> StoreOptions {
        StoreOptions {
            save_latency: Duration::from_millis(self.save_latency_ms),
            list_latency: Duration::from_millis(self.list_latency_ms),
            strict_reads: self.strict_reads,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackendKind::default(),
            dir: default_store_dir(),
            save_latency_ms: default_save_latency_ms(),
            list_latency_ms: default_list_latency_ms(),
            strict_reads: false,
        }
    }
}

/// Merchant area configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantConfig {
    /// PIN for the merchant area.
    #[serde(default = "default_pin")]
    pub pin: String,
}

fn default_pin() -> String {
    DEFAULT_MERCHANT_PIN.to_string()
}

impl Default for MerchantConfig {
    fn default() -> Self {
        Self { pin: default_pin() }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `abyssinia_store=debug`.
    /// `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Catalog configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON product list; the built-in collection is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Generate a default abyssinia.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Abyssinia Direct storefront configuration

[store]
# "file" keeps orders across runs, "memory" forgets them on exit
backend = "file"
dir = "{dir}"
save_latency_ms = {save}
list_latency_ms = {list}
strict_reads = false

[merchant]
pin = "{pin}"

[logging]
# RUST_LOG overrides this
level = "warn"
# "human" or "json"
format = "human"

[catalog]
# path = "catalog.json"
"#,
        dir = default_store_dir(),
        save = default_save_latency_ms(),
        list = default_list_latency_ms(),
        pin = DEFAULT_MERCHANT_PIN,
    )
}
