//! Product catalog boundary
//!
//! Catalog rows arrive from the external store as typed records and are
//! validated here before any of them enters cart logic, so the cart's
//! invariants only ever see well-formed data.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{PosError, PosResult};
use crate::money::{MAX_UNIT_PRICE, require_finite};
use crate::store::StoreError;

/// Product as returned by a catalog search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Unit price in the shop currency
    pub unit_price: f64,
    /// Units currently in stock
    pub stock_quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Product {
    /// Boundary validation before the product may enter a cart
    pub(crate) fn validate(&self) -> PosResult<()> {
        require_finite(self.unit_price, "unit_price").map_err(PosError::InvalidProduct)?;
        if self.unit_price < 0.0 {
            return Err(PosError::InvalidProduct(format!(
                "unit_price must be non-negative, got {}",
                self.unit_price
            )));
        }
        if self.unit_price > MAX_UNIT_PRICE {
            return Err(PosError::InvalidProduct(format!(
                "unit_price exceeds maximum allowed ({}), got {}",
                MAX_UNIT_PRICE, self.unit_price
            )));
        }
        if self.id.is_empty() {
            return Err(PosError::InvalidProduct("product id is empty".to_string()));
        }
        Ok(())
    }
}

/// Catalog search capability, provided by the external store
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Return products whose name matches the search term
    async fn search(&self, term: &str) -> Result<Vec<Product>, StoreError>;
}
