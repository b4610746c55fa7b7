//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use abyssinia_auth::AccessGate;
use abyssinia_commerce::catalog::Catalog;
use abyssinia_store::{FileBackend, KvBackend, KvOrderStore, MemoryBackend};
use anyhow::{Context as _, Result};

use crate::config::{CliConfig, StoreBackendKind, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Order store as configured at runtime.
pub type AppStore = KvOrderStore<Box<dyn KvBackend>>;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Where the configuration came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = PathBuf::from(path);
                (CliConfig::load(&path)?, Some(path))
            }
            None => match Self::find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            },
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        start.ancestors().find_map(|dir| {
            CONFIG_FILE_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|path| path.is_file())
        })
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = PathBuf::from(path);
        if path.is_absolute() {
            path
        } else {
            self.cwd.join(path)
        }
    }

    /// The product catalog: the configured file, or the built-in collection.
    pub fn catalog(&self) -> Result<Catalog> {
        let Some(path) = &self.config.catalog.path else {
            return Ok(Catalog::standard());
        };
        let path = self.resolve_path(path);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
        Catalog::from_json(&content)
            .with_context(|| format!("Failed to parse catalog: {}", path.display()))
    }

    /// Open the configured order store.
    pub async fn open_store(&self) -> Result<Arc<AppStore>> {
        let store = &self.config.store;
        let backend: Box<dyn KvBackend> = match store.backend {
            StoreBackendKind::File => {
                let dir = self.resolve_path(&store.dir);
                self.output.debug(&format!("Order store: {}", dir.display()));
                Box::new(FileBackend::open(dir).await?)
            }
            StoreBackendKind::Memory => {
                self.output.debug("Order store: memory");
                Box::new(MemoryBackend::new())
            }
        };
        Ok(Arc::new(KvOrderStore::with_options(backend, store.options())))
    }

    /// A locked gate for the configured merchant PIN.
    pub fn merchant_gate(&self) -> AccessGate {
        AccessGate::new(self.config.merchant.pin.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join("abyssinia.toml"), "").unwrap();

        let found = Context::find_config(&nested).unwrap();
        assert_eq!(found, root.path().join("abyssinia.toml"));
    }

    #[test]
    fn test_find_config_prefers_nearest() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("shop");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join("abyssinia.toml"), "").unwrap();
        std::fs::write(nested.join(".abyssinia.toml"), "").unwrap();

        let found = Context::find_config(&nested).unwrap();
        assert_eq!(found, nested.join(".abyssinia.toml"));
    }
}
