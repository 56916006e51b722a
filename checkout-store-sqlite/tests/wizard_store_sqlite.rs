//! The wizard store running on top of an on-disk SQLite database.

use checkout_core::{
    CheckoutStep, RegistrationData, STORAGE_KEY, StateStorage, StorageConfig, StorageRegistry,
    WizardState, WizardStore,
};
use checkout_store_sqlite::{SqliteStateStorage, SqliteStorageFactory};
use pretty_assertions::assert_eq;

fn registry() -> StorageRegistry {
    let mut registry = StorageRegistry::with_builtin_backends();
    registry.register(Box::new(SqliteStorageFactory));
    registry
}

fn config(path: &std::path::Path) -> StorageConfig {
    StorageConfig {
        backend: "sqlite".to_string(),
        connection_string: path.to_string_lossy().into_owned(),
    }
}

#[tokio::test]
async fn store_rehydrates_from_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("checkout.db");

    let mut store = WizardStore::open(registry().create(&config(&db)).await.unwrap()).await;
    store.select_product(1).await.unwrap();
    store.set_step(CheckoutStep::Registration).await.unwrap();
    store
        .set_registration(RegistrationData::new("John Doe", "123 Main Street"))
        .await
        .unwrap();
    let before = store.state().clone();
    drop(store);

    let reloaded = WizardStore::open(registry().create(&config(&db)).await.unwrap()).await;

    assert_eq!(reloaded.state(), &before);
}

#[tokio::test]
async fn reset_deletes_the_row() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("checkout.db");

    let mut store = WizardStore::open(registry().create(&config(&db)).await.unwrap()).await;
    store.select_product(1).await.unwrap();
    store.reset_wizard().await.unwrap();
    drop(store);

    let storage = SqliteStateStorage::new(&format!("sqlite:{}", db.display()))
        .await
        .expect("Failed to reopen database");
    assert_eq!(storage.load(STORAGE_KEY).await, Ok(None));

    let reloaded = WizardStore::open(Box::new(storage)).await;
    assert_eq!(reloaded.state(), &WizardState::default());
}

#[tokio::test]
async fn corrupt_row_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("checkout.db");
    let storage = registry().create(&config(&db)).await.unwrap();
    storage.save(STORAGE_KEY, "][").await.unwrap();

    let store = WizardStore::open(storage).await;

    assert_eq!(store.state(), &WizardState::default());
}
