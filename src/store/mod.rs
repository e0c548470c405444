//! External sale store boundary
//!
//! The checkout core consumes a generic "execute atomic sale"
//! capability. Two implementations ship here: `RemoteStore` speaking
//! the hosted backend's REST/RPC surface, and `MemoryStore` with the
//! same all-or-nothing semantics for tests and offline use.

pub mod http;
pub mod memory;

pub use http::RemoteStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::sale::SaleDraft;

/// Store-side failures. These reach the operator verbatim through
/// `PosError::ExternalWrite`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// Live stock at commit time is lower than the sold quantity
    #[error("Insufficient stock for product {0}")]
    InsufficientStock(String),

    #[error("Store rejected the sale: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Atomic sale-recording capability
///
/// An implementation must persist the sale header, all line items, and
/// the stock decrements as one all-or-nothing operation; partial
/// application is a correctness violation.
#[async_trait]
pub trait SaleStore: Send + Sync {
    async fn record_sale(&self, draft: &SaleDraft) -> Result<(), StoreError>;
}
