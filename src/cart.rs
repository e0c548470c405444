//! Cart Manager
//!
//! Maintains the working set of products to be sold and their
//! quantities, enforcing the stock limits snapshotted at add-time.
//! Nothing here is persisted; the cart lives only for the duration of
//! one checkout session.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::Product;
use crate::error::{PosError, PosResult};
use crate::money::{MAX_QUANTITY, round_money, to_decimal};

/// One product selected for sale
///
/// Unit price and stock ceiling are snapshots taken when the product is
/// first added; the line does not track later catalog changes. Invariant:
/// `1 <= quantity <= stock_ceiling`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub stock_ceiling: i32,
}

impl CartLine {
    /// `unit_price * quantity`, rounded to 2 decimal places
    pub fn line_total(&self) -> Decimal {
        round_money(self.unit_price * Decimal::from(self.quantity))
    }
}

/// The working cart, in insertion order
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Add one unit of `product` to the cart.
    ///
    /// First add snapshots the unit price and stock ceiling and inserts
    /// a new line with quantity 1; subsequent adds increment the
    /// quantity up to the ceiling. Fails without state change when the
    /// product has no stock or the ceiling is already reached.
    pub fn add_product(&mut self, product: &Product) -> PosResult<()> {
        product.validate()?;

        if product.stock_quantity <= 0 {
            warn!(product_id = %product.id, "add rejected: product out of stock");
            return Err(PosError::OutOfStock(product.id.clone()));
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            if line.quantity + 1 > line.stock_ceiling {
                warn!(
                    product_id = %product.id,
                    limit = line.stock_ceiling,
                    "add rejected: stock limit reached"
                );
                return Err(PosError::StockLimitReached {
                    product_id: product.id.clone(),
                    limit: line.stock_ceiling,
                });
            }
            line.quantity += 1;
        } else {
            self.lines.push(CartLine {
                product_id: product.id.clone(),
                name: product.name.clone(),
                unit_price: round_money(to_decimal(product.unit_price)),
                quantity: 1,
                stock_ceiling: product.stock_quantity.min(MAX_QUANTITY),
            });
        }
        Ok(())
    }

    /// Remove the matching line unconditionally. Idempotent: absent ids
    /// are silently ignored.
    pub fn remove_product(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Adjust a line's quantity by `delta`, keeping it within
    /// `[1, stock_ceiling]`. Out-of-range results are a silent no-op;
    /// going below 1 does not remove the line (removal is explicit).
    pub fn change_quantity(&mut self, product_id: &str, delta: i32) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            let new_quantity = line.quantity.saturating_add(delta);
            if (1..=line.stock_ceiling).contains(&new_quantity) {
                line.quantity = new_quantity;
            }
        }
    }

    /// Sum of `unit_price * quantity` over all lines, in exact decimal
    /// arithmetic. Pure, no side effects.
    pub fn total(&self) -> Decimal {
        round_money(self.lines.iter().map(CartLine::line_total).sum())
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
