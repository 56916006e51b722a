use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use super::{StateStorage, StorageError};

/// Backend-agnostic storage configuration.
///
/// `backend` must match the [`StorageFactory::backend_name`] of a
/// registered factory. `connection_string` is passed through to that
/// factory unchanged; its meaning is backend-specific.
///
/// | backend    | connection_string examples                  |
/// |------------|---------------------------------------------|
/// | `memory`   | ignored                                     |
/// | `file`     | `./state` (directory holding one file/key)  |
/// | `sqlite`   | `sqlite:checkout.db?mode=rwc`, `sqlite::memory:` |
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"sqlite"`).
    pub backend: String,
    /// Opaque value forwarded to the factory's `create` method.
    pub connection_string: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "file".to_string(),
            connection_string: ".checkout".to_string(),
        }
    }
}

/// One implementation per storage backend, registered with a
/// [`StorageRegistry`] at startup.
#[async_trait]
pub trait StorageFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Open (or create) the backing store and return it ready to use.
    async fn create(
        &self,
        config: &StorageConfig,
    ) -> Result<Box<dyn StateStorage>, StorageError>;
}

/// Registry of [`StorageFactory`] instances, keyed by backend name.
pub struct StorageRegistry {
    factories: HashMap<&'static str, Box<dyn StorageFactory>>,
}

impl StorageRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry preloaded with the backends this crate ships: `memory` and
    /// `file`.
    pub fn with_builtin_backends() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(super::MemoryStorageFactory));
        registry.register(Box::new(super::FileStorageFactory));
        registry
    }

    /// Register a backend factory, replacing any previous one with the same
    /// name.
    pub fn register(
        &mut self,
        factory: Box<dyn StorageFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory matching `config.backend`.
    ///
    /// # Errors
    /// * [`StorageError::Configuration`] when no factory is registered for
    ///   the requested backend.
    /// * Any error the chosen factory returns.
    pub async fn create(
        &self,
        config: &StorageConfig,
    ) -> Result<Box<dyn StateStorage>, StorageError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                StorageError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        factory.create(config).await
    }
}

impl Default for StorageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
