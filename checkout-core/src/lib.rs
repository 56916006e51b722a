pub mod form;
pub mod models;
pub mod services;
pub mod storage;
pub mod store;
pub mod validation;

pub use form::{FieldState, FormController, FormSchema};
pub use models::*;
pub use services::{CatalogService, PurchaseOutcome, PurchaseService, ServiceError};
pub use storage::{StateStorage, StorageConfig, StorageError, StorageRegistry};
pub use store::{STORAGE_KEY, StoreError, Transition, WizardStore};
pub use validation::{FieldError, ValidationFailed};
