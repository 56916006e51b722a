//! Durable key-value slots backing the wizard store.

pub mod factory;
pub mod file;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use factory::{StorageConfig, StorageFactory, StorageRegistry};
pub use file::{FileStorage, FileStorageFactory};
pub use memory::{MemoryStorage, MemoryStorageFactory};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

/// A set of named string slots that outlive the process.
///
/// Implementations must make a completed `save` visible to every later
/// `load`, including one from a freshly created instance pointed at the same
/// location.
#[async_trait]
pub trait StateStorage: Send + Sync {
    /// Contents of `key`, or `None` when the slot is empty.
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrites `key` with `value`.
    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes `key`. Removing an empty slot is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
