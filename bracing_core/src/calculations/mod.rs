//! # Bracing Calculations
//!
//! The calculation pipeline, leaf first:
//!
//! - [`row`] - resolve one element's ratings and achieved capacity
//! - [`line`] - sum rows, compute line minimum demand, pass/fail
//! - [`tab`] - sum lines, compare to tab demand, percentage rate
//!
//! Every function here is a pure function of its arguments. Missing
//! catalog entries and degenerate inputs (zero height, zero demand, no
//! lines) produce zero or "NA" results, never errors, and every number
//! produced is finite.

pub mod line;
pub mod row;
pub mod tab;

pub use line::{
    aggregate_line, evaluate_line, min_demand, validate_line, BracinglineData, LineResult,
    LineSummary, LineTotals, MinDemand,
};
pub use row::{resolve_row, resolve_rows, BracingRow, DisplayBracingRow};
pub use tab::{evaluate_tab, rate, summarize_tab, TabData, TabResult, TabSummary};

/// Collapse NaN and infinities to zero.
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_or_zero() {
        assert_eq!(finite_or_zero(12.5), 12.5);
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
        assert_eq!(finite_or_zero(f64::INFINITY), 0.0);
    }
}
