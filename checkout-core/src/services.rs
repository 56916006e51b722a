//! Contracts for the two remote collaborators: the product catalog and the
//! purchase endpoint. Both are opaque async calls that either succeed or fail
//! with a message meant for the user.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Product;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The catalog could not be loaded.
    #[error("{0}")]
    Fetch(String),

    /// The purchase was not accepted.
    #[error("{0}")]
    Processing(String),
}

/// Result of an accepted purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Success,
}

#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<Product>, ServiceError>;
}

#[async_trait]
pub trait PurchaseService: Send + Sync {
    /// Confirms the purchase. Takes no payload: the call is a side-effecting
    /// confirmation and does not carry cart or customer data.
    async fn submit_purchase(&self) -> Result<PurchaseOutcome, ServiceError>;
}
