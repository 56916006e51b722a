pub mod api;
pub mod app;
pub mod command;
pub mod config;
pub mod logging;
pub mod screens;
pub mod shell;
pub mod status_bar;

use checkout_core::StorageRegistry;
use checkout_store_sqlite::SqliteStorageFactory;

pub use app::{CheckoutApp, Flow, run};
pub use config::AppConfig;

/// Registry with every backend the binary supports: `memory`, `file` and
/// `sqlite`.
pub fn build_registry() -> StorageRegistry {
    let mut registry = StorageRegistry::with_builtin_backends();
    registry.register(Box::new(SqliteStorageFactory));
    registry
}
