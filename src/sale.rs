//! Sale payload types
//!
//! `SaleDraft` is the exact payload handed to the store's atomic
//! record-sale call: header fields plus the ordered line items. The
//! store decrements product stock as part of the same write.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::ledger::PaymentLedger;

/// One sold line as persisted in the sale record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleLine {
    pub product_id: String,
    pub quantity: i32,
    /// Unit price at sale time (the add-time snapshot)
    pub unit_price: Decimal,
}

/// The atomic sale payload: header + line items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleDraft {
    pub sale_id: String,
    pub total: Decimal,
    /// Rendered split, e.g. `"Efectivo (40.00), Tarjeta (25.50)"`
    pub payment_summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub operator_id: String,
    pub sold_at: DateTime<Utc>,
    pub lines: Vec<SaleLine>,
}

impl SaleDraft {
    pub(crate) fn build(
        cart: &Cart,
        ledger: &PaymentLedger,
        customer_id: Option<&str>,
        operator_id: &str,
    ) -> Self {
        Self {
            sale_id: uuid::Uuid::new_v4().to_string(),
            total: cart.total(),
            payment_summary: ledger.summary(),
            customer_id: customer_id.map(str::to_owned),
            operator_id: operator_id.to_owned(),
            sold_at: Utc::now(),
            lines: cart
                .lines()
                .iter()
                .map(|l| SaleLine {
                    product_id: l.product_id.clone(),
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                })
                .collect(),
        }
    }
}
