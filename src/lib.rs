//! Point-of-sale checkout core for a pet-shop management app
//!
//! This crate implements the one part of the shop app with real
//! invariants: the cart, the split-payment ledger, and the atomic
//! checkout submission.
//!
//! - **cart**: working set of products and quantities, stock ceilings
//!   snapshotted at add-time, decimal-safe running total
//! - **ledger**: one sale's total split across payment methods, with
//!   remaining/balanced computation at one-cent tolerance
//! - **checkout**: the terminal state transition turning cart + ledger
//!   into one persisted sale, or reporting why it could not
//! - **store**: the external boundary — catalog search and the atomic
//!   record-sale call (header + line items + stock decrements in one
//!   transaction)
//!
//! # Data flow
//!
//! ```text
//! CatalogLookup ──▶ Cart ──▶ PaymentLedger
//!                     │            │
//!                     └── CheckoutSession::submit ──▶ SaleStore
//!                                  │
//!                     success: clear + reset, SaleReceipt to caller
//!                     failure: state preserved, message verbatim
//! ```
//!
//! Amount conservation, stock bounds and the in-flight submission guard
//! are enforced here; everything else (auth, image storage, screens) is
//! an external collaborator.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod ledger;
pub mod money;
pub mod sale;
pub mod store;

// Re-exports
pub use cart::{Cart, CartLine};
pub use catalog::{CatalogLookup, Product};
pub use checkout::{CheckoutSession, SaleReceipt};
pub use config::StoreConfig;
pub use error::{PosError, PosResult};
pub use ledger::{PaymentEntry, PaymentLedger, PaymentMethod};
pub use sale::{SaleDraft, SaleLine};
pub use store::{MemoryStore, RemoteStore, SaleStore, StoreError};
