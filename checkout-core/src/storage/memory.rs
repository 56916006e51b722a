use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{StateStorage, StorageConfig, StorageError, StorageFactory};

/// Process-local slots. Clones share the same map, which lets tests drop a
/// store and rehydrate a new one from "the same" storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a slot, bypassing the async interface.
    pub fn peek(
        &self,
        key: &str,
    ) -> Option<String> {
        self.lock().ok().and_then(|slots| slots.get(key).cloned())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.slots
            .lock()
            .map_err(|_| StorageError::Io("memory storage lock poisoned".to_string()))
    }
}

#[async_trait]
impl StateStorage for MemoryStorage {
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// [`StorageFactory`] for the `"memory"` backend. The connection string is
/// ignored; every call yields an empty, independent storage.
pub struct MemoryStorageFactory;

#[async_trait]
impl StorageFactory for MemoryStorageFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &StorageConfig,
    ) -> Result<Box<dyn StateStorage>, StorageError> {
        Ok(Box::new(MemoryStorage::new()))
    }
}
