//! Simulated remote collaborators.
//!
//! Both services wait for a configurable latency and then answer from
//! configuration, so the wizard can be run without a backend.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use checkout_core::{CatalogService, Product, PurchaseOutcome, PurchaseService, ServiceError};
use tracing::debug;

use crate::config::{CatalogConfig, PurchaseConfig};

pub const FETCH_FAILED: &str = "Failed to fetch products";
pub const PROCESSING_FAILED: &str = "Payment processing failed";

#[derive(Debug, Clone)]
pub struct SimulatedCatalog {
    products: Vec<Product>,
    latency: Duration,
    fail: bool,
}

impl SimulatedCatalog {
    pub fn new(
        products: Vec<Product>,
        latency: Duration,
    ) -> Self {
        Self {
            products,
            latency,
            fail: false,
        }
    }

    /// Makes every fetch fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self {
            products: config.products.clone(),
            latency: Duration::from_millis(config.latency_ms),
            fail: config.fail,
        }
    }
}

#[async_trait]
impl CatalogService for SimulatedCatalog {
    async fn fetch_products(&self) -> Result<Vec<Product>, ServiceError> {
        tokio::time::sleep(self.latency).await;
        if self.fail {
            return Err(ServiceError::Fetch(FETCH_FAILED.to_string()));
        }
        debug!(count = self.products.len(), "catalog served");
        Ok(self.products.clone())
    }
}

/// Accepts purchases after rejecting the first `fail_first` attempts.
#[derive(Debug)]
pub struct SimulatedPurchase {
    latency: Duration,
    remaining_failures: AtomicU32,
}

impl SimulatedPurchase {
    pub fn new(
        latency: Duration,
        fail_first: u32,
    ) -> Self {
        Self {
            latency,
            remaining_failures: AtomicU32::new(fail_first),
        }
    }

    pub fn from_config(config: &PurchaseConfig) -> Self {
        Self::new(Duration::from_millis(config.latency_ms), config.fail_first)
    }
}

#[async_trait]
impl PurchaseService for SimulatedPurchase {
    async fn submit_purchase(&self) -> Result<PurchaseOutcome, ServiceError> {
        tokio::time::sleep(self.latency).await;
        let failed = self
            .remaining_failures
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(ServiceError::Processing(PROCESSING_FAILED.to_string()));
        }
        Ok(PurchaseOutcome::Success)
    }
}
