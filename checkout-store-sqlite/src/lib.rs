mod factory;
mod storage;

pub use factory::SqliteStorageFactory;
pub use storage::SqliteStateStorage;
