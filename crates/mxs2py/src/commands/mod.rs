//! CLI command implementations - one command per file.

pub mod convert;
pub mod extract_names;
pub mod mark;
pub mod registry;
pub mod rename;

use crate::config::Mxs2pyConfig;
use crate::store::{RegistryStore, StoreError};
use mxs2py_surface_syntax::IdentifierRegistry;
use std::path::PathBuf;

/// Settings shared by every command.
pub struct Context {
    pub config: Mxs2pyConfig,
    store: Option<RegistryStore>,
}

impl Context {
    /// Load config for the current directory. `registry_dir` overrides the
    /// configured registry location.
    pub fn load(registry_dir: Option<PathBuf>) -> Self {
        let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let config = Mxs2pyConfig::load(&root);
        Self::new(config, registry_dir)
    }

    pub fn new(config: Mxs2pyConfig, registry_dir: Option<PathBuf>) -> Self {
        let store = registry_dir
            .or_else(|| config.registry_dir())
            .map(RegistryStore::new);
        Self { config, store }
    }

    /// The registry directory, or a message explaining how to pick one.
    pub fn store(&self) -> Result<&RegistryStore, &'static str> {
        self.store
            .as_ref()
            .ok_or("no registry directory: pass --registry or set [registry] dir")
    }

    /// Registry contents; empty when no directory is available.
    pub fn load_registry(&self) -> Result<IdentifierRegistry, StoreError> {
        match &self.store {
            Some(store) => store.load(),
            None => {
                tracing::warn!("no registry directory, converting without known functions");
                Ok(IdentifierRegistry::new())
            }
        }
    }
}
