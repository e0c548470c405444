//! Payment Split Ledger
//!
//! Lets the operator split one sale's total across multiple payment
//! methods and certifies when the split covers the total. Amounts are
//! kept as the operator's raw text while editing and parsed on read, so
//! intermediate typing states like `"12."` never get clobbered.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PosError, PosResult};
use crate::money::{MONEY_TOLERANCE, format_amount, is_amount_input, parse_amount};

/// Accepted payment methods (fixed set)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Transfer,
    Yape,
    Plin,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Transfer,
        PaymentMethod::Yape,
        PaymentMethod::Plin,
    ];

    /// Display label used on receipts and in the payment summary
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Efectivo",
            PaymentMethod::Card => "Tarjeta",
            PaymentMethod::Transfer => "Transferencia",
            PaymentMethod::Yape => "Yape",
            PaymentMethod::Plin => "Plin",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One payment method's contribution to the sale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentEntry {
    pub method: PaymentMethod,
    /// Raw amount text under edit; empty while the operator is typing
    pub amount: String,
}

impl PaymentEntry {
    pub fn parsed_amount(&self) -> Decimal {
        // Stored text always parses: it is either seeded by the ledger
        // or accepted by set_amount, both of which guarantee it
        parse_amount(&self.amount).unwrap_or(Decimal::ZERO)
    }
}

/// Ordered collection of payment entries, unique by method.
/// Always holds at least one entry.
#[derive(Debug, Clone)]
pub struct PaymentLedger {
    entries: Vec<PaymentEntry>,
}

impl PaymentLedger {
    /// Fresh ledger with a single cash entry covering `cart_total`
    pub fn new(cart_total: Decimal) -> Self {
        Self {
            entries: vec![PaymentEntry {
                method: PaymentMethod::default(),
                amount: format_amount(cart_total),
            }],
        }
    }

    pub fn entries(&self) -> &[PaymentEntry] {
        &self.entries
    }

    pub fn has_method(&self, method: PaymentMethod) -> bool {
        self.entries.iter().any(|e| e.method == method)
    }

    /// Toggle a method on or off.
    ///
    /// Toggling on seeds the entry with the remaining unallocated total
    /// (clamped at zero). Toggling off removes the entry, except the
    /// last remaining one which is protected.
    pub fn toggle_method(&mut self, method: PaymentMethod, cart_total: Decimal) -> PosResult<()> {
        if let Some(idx) = self.entries.iter().position(|e| e.method == method) {
            if self.entries.len() == 1 {
                warn!(%method, "cannot remove the last payment method");
                return Err(PosError::CannotRemoveLastMethod);
            }
            self.entries.remove(idx);
        } else {
            let seed = (cart_total - self.allocated()).max(Decimal::ZERO);
            self.entries.push(PaymentEntry {
                method,
                amount: format_amount(seed),
            });
        }
        Ok(())
    }

    /// Update an entry's amount text. Anything that is not a prefix of
    /// a valid non-negative decimal, or whose digits exceed Decimal
    /// range, is rejected as a no-op, keeping the previous input.
    /// Unknown methods are ignored.
    pub fn set_amount(&mut self, method: PaymentMethod, text: &str) {
        if !is_amount_input(text) || parse_amount(text).is_none() {
            return;
        }
        if let Some(entry) = self.entries.iter_mut().find(|e| e.method == method) {
            entry.amount = text.to_string();
        }
    }

    /// Sum of all parsed amounts
    pub fn allocated(&self) -> Decimal {
        self.entries.iter().map(PaymentEntry::parsed_amount).sum()
    }

    /// `cart_total - allocated`. Positive: shortfall still to collect.
    /// Negative: overpaid, change to return.
    pub fn remaining(&self, cart_total: Decimal) -> Decimal {
        cart_total - self.allocated()
    }

    /// Balanced when the remaining amount is within one cent
    pub fn is_balanced(&self, cart_total: Decimal) -> bool {
        self.remaining(cart_total).abs() < MONEY_TOLERANCE
    }

    /// Single-entry auto-fill: when exactly one method is active, keep
    /// its amount pinned to the cart total so single-method checkout is
    /// frictionless. With two or more entries this must never run, so
    /// manual split edits are not clobbered.
    pub fn sync_total(&mut self, cart_total: Decimal) {
        if self.entries.len() == 1 {
            self.entries[0].amount = format_amount(cart_total);
        }
    }

    /// Reset to a single default entry (start of a checkout session)
    pub fn reset(&mut self, cart_total: Decimal) {
        *self = Self::new(cart_total);
    }

    /// Human-readable summary in insertion order, e.g.
    /// `"Efectivo (40.00), Tarjeta (25.50)"`
    pub fn summary(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{} ({})", e.method, format_amount(e.parsed_amount())))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
