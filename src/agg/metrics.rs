//! Numeric helpers for aggregate outputs
//!
//! Division by zero is never an error here: a margin or percentage
//! whose denominator is zero is `None`, and consumers render it as
//! null. Rounding is standard half-away-from-zero, applied only to
//! currency-like outputs.

/// Rounds to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Profit margin as a percentage of sales, `None` when sales is
/// exactly zero.
pub fn margin_pct(profit: f64, sales: f64) -> Option<f64> {
    if sales == 0.0 {
        None
    } else {
        Some(round2(profit / sales * 100.0))
    }
}

/// `part` as a percentage of `total`, `None` when `total` is zero.
pub fn pct(part: u64, total: u64) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(round2(part as f64 * 100.0 / total as f64))
    }
}
