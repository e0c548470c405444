//! Checkout Submitter
//!
//! `CheckoutSession` owns the cart and the payment ledger for one POS
//! screen and is the only component that talks to the external store on
//! the write path. Submission is the terminal state transition:
//!
//! ```text
//! Idle -> Submitting -> Idle (success: state cleared)
//!                    -> Idle (failure: state untouched, retryable)
//! ```

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::cart::Cart;
use crate::catalog::Product;
use crate::error::{PosError, PosResult};
use crate::ledger::{PaymentLedger, PaymentMethod};
use crate::sale::SaleDraft;
use crate::store::SaleStore;

/// Resets the in-flight flag when submission finishes or is cancelled
struct ResetOnDrop<'a>(&'a mut bool);

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Returned to the presenting screen after a successful submission so
/// it can display/print the result and refresh its product listing
/// (stock changed).
#[derive(Debug, Clone, PartialEq)]
pub struct SaleReceipt {
    pub sale_id: String,
    pub total: Decimal,
    pub payment_summary: String,
}

/// One POS checkout session
///
/// Cart mutations keep the single-entry ledger auto-filled with the
/// running total; once the operator splits across a second method the
/// ledger is left alone. A boolean in-flight flag guards against
/// duplicate submissions from rapid repeated taps.
#[derive(Debug)]
pub struct CheckoutSession {
    cart: Cart,
    ledger: PaymentLedger,
    customer_id: Option<String>,
    operator_id: String,
    in_flight: bool,
}

impl CheckoutSession {
    pub fn new(operator_id: impl Into<String>) -> Self {
        Self {
            cart: Cart::new(),
            ledger: PaymentLedger::new(Decimal::ZERO),
            customer_id: None,
            operator_id: operator_id.into(),
            in_flight: false,
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn ledger(&self) -> &PaymentLedger {
        &self.ledger
    }

    pub fn set_customer(&mut self, customer_id: Option<String>) {
        self.customer_id = customer_id;
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    // ========== Cart mutations (trigger ledger auto-fill) ==========

    pub fn add_product(&mut self, product: &Product) -> PosResult<()> {
        self.cart.add_product(product)?;
        self.ledger.sync_total(self.cart.total());
        Ok(())
    }

    pub fn remove_product(&mut self, product_id: &str) {
        self.cart.remove_product(product_id);
        self.ledger.sync_total(self.cart.total());
    }

    pub fn change_quantity(&mut self, product_id: &str, delta: i32) {
        self.cart.change_quantity(product_id, delta);
        self.ledger.sync_total(self.cart.total());
    }

    // ========== Ledger operations ==========

    pub fn toggle_method(&mut self, method: PaymentMethod) -> PosResult<()> {
        self.ledger.toggle_method(method, self.cart.total())
    }

    pub fn set_amount(&mut self, method: PaymentMethod, text: &str) {
        self.ledger.set_amount(method, text);
    }

    /// Signed amount still to allocate (positive) or to return as
    /// change (negative)
    pub fn remaining(&self) -> Decimal {
        self.ledger.remaining(self.cart.total())
    }

    pub fn is_balanced(&self) -> bool {
        self.ledger.is_balanced(self.cart.total())
    }

    // ========== Submission ==========

    /// Validate preconditions and issue the single atomic record-sale
    /// call. On success the cart is cleared and the ledger reset to one
    /// default entry; on failure both are left exactly as they were so
    /// the operator can retry without re-entering data.
    pub async fn submit(&mut self, store: &dyn SaleStore) -> PosResult<SaleReceipt> {
        if self.in_flight {
            return Err(PosError::SubmissionInFlight);
        }
        if self.cart.is_empty() {
            return Err(PosError::EmptyCart);
        }
        let total = self.cart.total();
        if !self.ledger.is_balanced(total) {
            let remaining = self.ledger.remaining(total);
            warn!(%remaining, "checkout blocked: unbalanced payment");
            return Err(PosError::UnbalancedPayment { remaining });
        }

        let draft = SaleDraft::build(
            &self.cart,
            &self.ledger,
            self.customer_id.as_deref(),
            &self.operator_id,
        );
        info!(
            sale_id = %draft.sale_id,
            total = %draft.total,
            lines = draft.lines.len(),
            "submitting sale"
        );

        self.in_flight = true;
        let result = {
            // Clears the flag even when the submit future is dropped at
            // the await point, so the session never sticks in Submitting.
            let _reset = ResetOnDrop(&mut self.in_flight);
            store.record_sale(&draft).await
        };

        match result {
            Ok(()) => {
                info!(sale_id = %draft.sale_id, "sale recorded");
                self.cart.clear();
                self.ledger.reset(Decimal::ZERO);
                Ok(SaleReceipt {
                    sale_id: draft.sale_id,
                    total: draft.total,
                    payment_summary: draft.payment_summary,
                })
            }
            Err(err) => {
                warn!(
                    sale_id = %draft.sale_id,
                    error = %err,
                    "sale submission failed; cart and payments preserved"
                );
                Err(PosError::from(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError};
    use async_trait::async_trait;

    fn product(id: &str, unit_price: f64, stock: i32) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            unit_price,
            stock_quantity: stock,
            image_url: None,
        }
    }

    /// Store that always rejects, for failure-path tests
    struct FailingStore;

    #[async_trait]
    impl SaleStore for FailingStore {
        async fn record_sale(&self, _draft: &SaleDraft) -> Result<(), StoreError> {
            Err(StoreError::Network("connection refused".to_string()))
        }
    }

    fn session_with_scenario_cart() -> CheckoutSession {
        // 25.00 x 2 + 15.50 x 1 = 65.50
        let mut session = CheckoutSession::new("user-1");
        let p1 = product("p1", 25.00, 10);
        session.add_product(&p1).unwrap();
        session.add_product(&p1).unwrap();
        session.add_product(&product("p2", 15.50, 10)).unwrap();
        session
    }

    #[tokio::test]
    async fn test_submit_empty_cart_fails_before_any_call() {
        let store = MemoryStore::new();
        let mut session = CheckoutSession::new("user-1");

        let result = session.submit(&store).await;
        assert!(matches!(result, Err(PosError::EmptyCart)));
        assert_eq!(store.sale_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_unbalanced_fails_with_signed_remaining() {
        let store = MemoryStore::new();
        let mut session = session_with_scenario_cart();
        session.set_amount(PaymentMethod::Cash, "40.00");
        session.toggle_method(PaymentMethod::Card).unwrap();
        session.set_amount(PaymentMethod::Card, "20.00");

        let result = session.submit(&store).await;
        match result {
            Err(PosError::UnbalancedPayment { remaining }) => {
                assert_eq!(remaining, Decimal::new(550, 2));
            }
            other => panic!("expected UnbalancedPayment, got {other:?}"),
        }
        assert_eq!(store.sale_count(), 0);
        assert_eq!(session.cart().len(), 2);
    }

    #[tokio::test]
    async fn test_submit_success_clears_cart_and_resets_ledger() {
        let store = MemoryStore::new();
        store.seed_product(product("p1", 25.00, 10));
        store.seed_product(product("p2", 15.50, 10));

        let mut session = session_with_scenario_cart();
        assert_eq!(session.cart().total(), Decimal::new(6550, 2));
        // Single cash entry auto-filled to 65.50
        assert!(session.is_balanced());

        let receipt = session.submit(&store).await.unwrap();
        assert_eq!(receipt.total, Decimal::new(6550, 2));
        assert_eq!(receipt.payment_summary, "Efectivo (65.50)");

        assert!(session.cart().is_empty());
        let entries = session.ledger().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].method, PaymentMethod::Cash);
        assert_eq!(entries[0].amount, "0.00");

        assert_eq!(store.sale_count(), 1);
        assert_eq!(store.stock_of("p1"), Some(8));
        assert_eq!(store.stock_of("p2"), Some(9));
    }

    #[tokio::test]
    async fn test_submit_split_payment_summary() {
        let store = MemoryStore::new();
        store.seed_product(product("p1", 25.00, 10));
        store.seed_product(product("p2", 15.50, 10));

        let mut session = session_with_scenario_cart();
        session.set_amount(PaymentMethod::Cash, "40.00");
        session.toggle_method(PaymentMethod::Yape).unwrap();

        let receipt = session.submit(&store).await.unwrap();
        assert_eq!(receipt.payment_summary, "Efectivo (40.00), Yape (25.50)");

        let sale = &store.sales()[0];
        assert_eq!(sale.payment_summary, "Efectivo (40.00), Yape (25.50)");
        assert_eq!(sale.operator_id, "user-1");
    }

    #[tokio::test]
    async fn test_submit_failure_preserves_state_for_retry() {
        let failing = FailingStore;
        let mut session = session_with_scenario_cart();

        let result = session.submit(&failing).await;
        match result {
            Err(PosError::ExternalWrite(message)) => {
                assert_eq!(message, "Network error: connection refused");
            }
            other => panic!("expected ExternalWrite, got {other:?}"),
        }

        // Untouched and retryable
        assert_eq!(session.cart().len(), 2);
        assert_eq!(session.cart().total(), Decimal::new(6550, 2));
        assert!(session.is_balanced());
        assert!(!session.is_submitting());

        let store = MemoryStore::new();
        store.seed_product(product("p1", 25.00, 10));
        store.seed_product(product("p2", 15.50, 10));
        assert!(session.submit(&store).await.is_ok());
        assert!(session.cart().is_empty());
    }

    #[tokio::test]
    async fn test_submit_stale_stock_rejected_by_store() {
        let store = MemoryStore::new();
        // Cart snapshotted 10 in stock, but only 1 left at commit time
        store.seed_product(product("p1", 25.00, 1));

        let mut session = CheckoutSession::new("user-1");
        let snapshot = product("p1", 25.00, 10);
        session.add_product(&snapshot).unwrap();
        session.add_product(&snapshot).unwrap();

        let result = session.submit(&store).await;
        assert!(matches!(result, Err(PosError::ExternalWrite(_))));
        assert_eq!(store.stock_of("p1"), Some(1));
        assert_eq!(store.sale_count(), 0);
        assert_eq!(session.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_submit_leaves_session_retryable() {
        /// Store whose write never completes, standing in for a stalled
        /// backend the caller gives up on
        struct HangingStore;

        #[async_trait]
        impl SaleStore for HangingStore {
            async fn record_sale(&self, _draft: &SaleDraft) -> Result<(), StoreError> {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }

        let mut session = session_with_scenario_cart();

        // The UI abandons the submission mid-flight; the future is
        // dropped at the await point
        let abandoned = tokio::time::timeout(
            std::time::Duration::from_millis(10),
            session.submit(&HangingStore),
        )
        .await;
        assert!(abandoned.is_err());

        // The session must not stick in Submitting
        assert!(!session.is_submitting());
        assert_eq!(session.cart().len(), 2);

        let store = MemoryStore::new();
        store.seed_product(product("p1", 25.00, 10));
        store.seed_product(product("p2", 15.50, 10));
        let receipt = session.submit(&store).await.unwrap();
        assert_eq!(receipt.total, Decimal::new(6550, 2));
        assert!(session.cart().is_empty());
    }

    #[tokio::test]
    async fn test_cart_mutations_keep_single_entry_ledger_filled() {
        let mut session = CheckoutSession::new("user-1");
        let p = product("p1", 25.00, 10);

        session.add_product(&p).unwrap();
        assert_eq!(session.ledger().entries()[0].amount, "25.00");

        session.change_quantity("p1", 1);
        assert_eq!(session.ledger().entries()[0].amount, "50.00");

        session.remove_product("p1");
        assert_eq!(session.ledger().entries()[0].amount, "0.00");
    }

    #[tokio::test]
    async fn test_cart_mutations_leave_split_ledger_alone() {
        let mut session = CheckoutSession::new("user-1");
        let p = product("p1", 25.00, 10);
        session.add_product(&p).unwrap();

        session.set_amount(PaymentMethod::Cash, "10.00");
        session.toggle_method(PaymentMethod::Card).unwrap();

        session.add_product(&p).unwrap();
        assert_eq!(session.ledger().entries()[0].amount, "10.00");
        assert_eq!(session.ledger().entries()[1].amount, "15.00");
    }
}
