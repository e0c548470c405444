//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic in this crate is done in `Decimal`; `f64` is
//! accepted only at the catalog boundary and emitted only toward the
//! store serialization layer, after rounding to two decimal places.

use rust_decimal::prelude::*;
use std::str::FromStr;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed unit price
pub(crate) const MAX_UNIT_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per cart line
pub(crate) const MAX_QUANTITY: i32 = 9999;

/// Convert f64 to Decimal for calculation
///
/// Input values should be validated as finite at the boundary. If
/// NaN/Infinity somehow reaches here, logs an error and returns ZERO
/// to avoid silent corruption in monetary calculations.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for serialization, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value)
        .to_f64()
        // Bounded inputs (unit price <= 1e6, quantity <= 9999) always fit in f64
        .unwrap_or(0.0)
}

/// Round a monetary value to 2 decimal places, midpoint away from zero
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a monetary value with exactly two decimal places
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", round_money(value))
}

/// Check whether `text` is an acceptable in-progress amount entry:
/// digits with at most one decimal point. Accepts intermediate typing
/// states such as `""`, `"12."` and `".5"`.
pub fn is_amount_input(text: &str) -> bool {
    let mut seen_point = false;
    for c in text.chars() {
        match c {
            '0'..='9' => {}
            '.' if !seen_point => seen_point = true,
            _ => return false,
        }
    }
    true
}

/// Parse an amount entry into a Decimal. Empty or dangling-point input
/// parses as the amount typed so far (`"12."` is 12, `""` is 0).
/// Returns `None` when the digits exceed Decimal range.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let trimmed = text.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(trimmed).ok()
}

/// Validate that a boundary f64 value is finite (not NaN, not Infinity)
#[inline]
pub(crate) fn require_finite(value: f64, field_name: &str) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{} must be a finite number, got {}", field_name, value));
    }
    Ok(())
}
