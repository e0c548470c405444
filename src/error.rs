//! Error types for the checkout core
//!
//! Every variant except `ExternalWrite` is recovered locally: the
//! operation is a no-op, state is untouched, and the message is shown
//! to the operator. `ExternalWrite` carries the store's message
//! verbatim so it can be displayed and the submission retried.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::store::StoreError;

/// Unified error type for cart, ledger and checkout operations
#[derive(Debug, Error)]
pub enum PosError {
    /// Product has zero available stock at add-time
    #[error("Product is out of stock: {0}")]
    OutOfStock(String),

    /// Requested quantity would exceed the stock snapshotted at add-time
    #[error("Stock limit reached for product {product_id}: at most {limit} available")]
    StockLimitReached { product_id: String, limit: i32 },

    /// Catalog row failed boundary validation
    #[error("Invalid product data: {0}")]
    InvalidProduct(String),

    /// Attempt to remove the sole payment method
    #[error("Cannot remove the last payment method")]
    CannotRemoveLastMethod,

    /// Checkout attempted with no cart lines
    #[error("Cart is empty")]
    EmptyCart,

    /// Payment amounts do not sum to the cart total within tolerance.
    /// Positive remaining means a shortfall to collect ("falta cubrir"),
    /// negative means change to return ("vuelto").
    #[error("Payments do not match the total: {remaining:.2} remaining")]
    UnbalancedPayment { remaining: Decimal },

    /// A submission is already in flight for this session
    #[error("Checkout already in progress")]
    SubmissionInFlight,

    /// The atomic sale call failed; cart and ledger are preserved for retry
    #[error("{0}")]
    ExternalWrite(String),
}

impl PosError {
    /// Whether the error was resolved locally (checkout blocked, state
    /// untouched) as opposed to an external write failure.
    pub fn is_recovered_locally(&self) -> bool {
        !matches!(self, Self::ExternalWrite(_))
    }
}

impl From<StoreError> for PosError {
    fn from(err: StoreError) -> Self {
        Self::ExternalWrite(err.to_string())
    }
}

/// Result type for checkout operations
pub type PosResult<T> = Result<T, PosError>;
