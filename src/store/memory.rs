//! In-memory store
//!
//! Implements the same atomic contract as the hosted backend behind a
//! single lock: every line is validated against live stock before any
//! decrement happens, so a rejected sale leaves stock untouched. Used
//! as the test double and for offline demos.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{SaleStore, StoreError};
use crate::catalog::{CatalogLookup, Product};
use crate::sale::SaleDraft;

#[derive(Debug, Default)]
struct Inner {
    products: Vec<Product>,
    sales: Vec<SaleDraft>,
}

/// In-memory catalog + sale store
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a catalog product by id
    pub fn seed_product(&self, product: Product) {
        let mut inner = self.inner.lock();
        if let Some(existing) = inner.products.iter_mut().find(|p| p.id == product.id) {
            *existing = product;
        } else {
            inner.products.push(product);
        }
    }

    /// Live stock for a product, if it exists
    pub fn stock_of(&self, product_id: &str) -> Option<i32> {
        self.inner
            .lock()
            .products
            .iter()
            .find(|p| p.id == product_id)
            .map(|p| p.stock_quantity)
    }

    pub fn sale_count(&self) -> usize {
        self.inner.lock().sales.len()
    }

    /// Recorded sales, in commit order
    pub fn sales(&self) -> Vec<SaleDraft> {
        self.inner.lock().sales.clone()
    }
}

#[async_trait]
impl CatalogLookup for MemoryStore {
    async fn search(&self, term: &str) -> Result<Vec<Product>, StoreError> {
        let needle = term.to_lowercase();
        Ok(self
            .inner
            .lock()
            .products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SaleStore for MemoryStore {
    async fn record_sale(&self, draft: &SaleDraft) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();

        // Resolve each product once, validating every line against live
        // stock before any decrement happens
        let mut resolved = Vec::with_capacity(draft.lines.len());
        for line in &draft.lines {
            let idx = inner
                .products
                .iter()
                .position(|p| p.id == line.product_id)
                .ok_or_else(|| StoreError::UnknownProduct(line.product_id.clone()))?;
            if inner.products[idx].stock_quantity < line.quantity {
                return Err(StoreError::InsufficientStock(line.product_id.clone()));
            }
            resolved.push((idx, line.quantity));
        }

        for (idx, quantity) in resolved {
            inner.products[idx].stock_quantity -= quantity;
        }
        inner.sales.push(draft.clone());
        Ok(())
    }
}
