use async_trait::async_trait;
use checkout_core::storage::{StorageConfig, StorageFactory};
use checkout_core::{StateStorage, StorageError};

use crate::storage::SqliteStateStorage;

/// Turns the configured connection string into a sqlx URL.
///
/// * `":memory:"` → `sqlite::memory:`
/// * a bare path such as `checkout.db` → `sqlite:checkout.db`
/// * anything already starting with `sqlite:` is used unchanged
fn database_url(connection_string: &str) -> String {
    if connection_string == ":memory:" {
        "sqlite::memory:".to_string()
    } else if connection_string.starts_with("sqlite:") {
        connection_string.to_string()
    } else {
        format!("sqlite:{connection_string}")
    }
}

/// [`StorageFactory`] for SQLite.
///
/// Register this with a [`checkout_core::StorageRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use checkout_core::StorageRegistry;
/// use checkout_store_sqlite::SqliteStorageFactory;
///
/// let mut registry = StorageRegistry::with_builtin_backends();
/// registry.register(Box::new(SqliteStorageFactory));
/// ```
pub struct SqliteStorageFactory;

#[async_trait]
impl StorageFactory for SqliteStorageFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Opens the database and runs the embedded migrations.
    async fn create(
        &self,
        config: &StorageConfig,
    ) -> Result<Box<dyn StateStorage>, StorageError> {
        let storage = SqliteStateStorage::new(&database_url(&config.connection_string)).await?;
        storage.run_migrations().await?;
        Ok(Box::new(storage))
    }
}
