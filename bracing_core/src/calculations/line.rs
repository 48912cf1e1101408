//! # Bracing Line Check
//!
//! Sums resolved rows into line totals and checks them against the line's
//! minimum demand.
//!
//! ## Minimum Demand
//!
//! Per axis (wind and EQ independently):
//!
//! ```text
//! min = max(100, 15 × externalWallLength, 0.5 × tabDemand / max(lineCount, 1))
//! ```
//!
//! An absolute floor, a perimeter floor, and half of an even share of the
//! tab demand. A line passes an axis when its total is at least the
//! minimum; wind and EQ pass or fail separately.

use serde::{Deserialize, Serialize};

use super::finite_or_zero;
use super::row::{resolve_rows, BracingRow, DisplayBracingRow};
use crate::catalog::BracingData;
use crate::policy::{BracingPolicy, FloorType};

/// A bracing line: an ordered run of elements along one wall.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": 1,
///   "bracinglineNo": "BL-1",
///   "externalWallLength": 6.0,
///   "rows": [ { "id": 1, "label": "BL-1-1", "system": "GIB", "type": "GS1-N", "lengthOrCount": 1.2, "height": 2.4 } ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracinglineData {
    pub id: u64,

    /// Display name (e.g., "BL-1")
    pub bracingline_no: String,

    /// External wall length along this line in metres (0 for internal lines)
    pub external_wall_length: f64,

    pub rows: Vec<BracingRow>,
}

/// Summed capacity of a line.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineTotals {
    pub line_total_wind: f64,
    #[serde(rename = "lineTotalEQ")]
    pub line_total_eq: f64,
}

/// Minimum demand a line must meet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinDemand {
    pub min_demand_wind: f64,
    #[serde(rename = "minDemandEQ")]
    pub min_demand_eq: f64,
}

/// Line totals, minimum demand, and pass/fail per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSummary {
    pub line_total_wind: f64,
    #[serde(rename = "lineTotalEQ")]
    pub line_total_eq: f64,
    pub min_demand_wind: f64,
    #[serde(rename = "minDemandEQ")]
    pub min_demand_eq: f64,
    pub is_wind_ok: bool,
    pub is_eq_ok: bool,
}

impl LineSummary {
    /// Both axes meet their minimum demand
    pub fn passes(&self) -> bool {
        self.is_wind_ok && self.is_eq_ok
    }
}

/// A fully evaluated bracing line, self-contained for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineResult {
    pub id: u64,
    pub bracingline_no: String,
    pub external_wall_length: f64,
    pub display_rows: Vec<DisplayBracingRow>,
    pub line_summary: LineSummary,
}

impl LineResult {
    /// Rows that resolved to "NA"
    pub fn invalid_rows(&self) -> impl Iterator<Item = &DisplayBracingRow> {
        self.display_rows.iter().filter(|r| r.is_row_invalid)
    }
}

/// Sum row totals. Invalid rows already carry zero totals.
///
/// A sum that overflows to infinity collapses to 0.
pub fn aggregate_line(rows: &[DisplayBracingRow]) -> LineTotals {
    let (wind, eq) = rows
        .iter()
        .fold((0.0, 0.0), |(wind, eq), row| (wind + row.total_wind, eq + row.total_eq));
    LineTotals {
        line_total_wind: finite_or_zero(wind),
        line_total_eq: finite_or_zero(eq),
    }
}

/// Minimum demand for a line, per axis.
///
/// A `line_count` of zero is treated as one. A term that overflows
/// saturates at `f64::MAX`, so the line cannot pass on that axis.
///
/// ```rust
/// use bracing_core::calculations::line::min_demand;
/// use bracing_core::policy::BracingPolicy;
///
/// let min = min_demand(0.0, 0.0, 0.0, 2, &BracingPolicy::default());
/// assert_eq!(min.min_demand_wind, 100.0);
///
/// let min = min_demand(10.0, 500.0, 900.0, 2, &BracingPolicy::default());
/// assert_eq!(min.min_demand_wind, 150.0); // 15 × 10 m
/// assert_eq!(min.min_demand_eq, 225.0);   // 0.5 × 900 / 2
/// ```
pub fn min_demand(
    external_wall_length: f64,
    tab_demand_wind: f64,
    tab_demand_eq: f64,
    line_count: usize,
    policy: &BracingPolicy,
) -> MinDemand {
    let lines = line_count.max(1) as f64;
    let perimeter = policy.wall_length_factor * external_wall_length;
    let axis = |tab_demand: f64| {
        let fair_share = policy.fair_share_factor * (tab_demand / lines);
        let min = policy.min_line_demand.max(perimeter).max(fair_share);
        if min.is_finite() {
            min
        } else if min > 0.0 {
            f64::MAX
        } else {
            finite_or_zero(policy.min_line_demand)
        }
    };

    MinDemand {
        min_demand_wind: axis(tab_demand_wind),
        min_demand_eq: axis(tab_demand_eq),
    }
}

/// Check line totals against the minimum demand.
pub fn validate_line(totals: LineTotals, min: MinDemand) -> LineSummary {
    LineSummary {
        line_total_wind: totals.line_total_wind,
        line_total_eq: totals.line_total_eq,
        min_demand_wind: min.min_demand_wind,
        min_demand_eq: min.min_demand_eq,
        is_wind_ok: totals.line_total_wind >= min.min_demand_wind,
        is_eq_ok: totals.line_total_eq >= min.min_demand_eq,
    }
}

/// Resolve, sum and check one line of a tab.
///
/// `line_count` is the number of lines in the owning tab, used for the
/// fair-share term of the minimum demand.
pub fn evaluate_line(
    line: &BracinglineData,
    catalog: &BracingData,
    floor_type: FloorType,
    tab_demand_wind: f64,
    tab_demand_eq: f64,
    line_count: usize,
    policy: &BracingPolicy,
) -> LineResult {
    let display_rows = resolve_rows(&line.rows, catalog, floor_type, policy);
    let totals = aggregate_line(&display_rows);
    let min = min_demand(
        line.external_wall_length,
        tab_demand_wind,
        tab_demand_eq,
        line_count,
        policy,
    );

    LineResult {
        id: line.id,
        bracingline_no: line.bracingline_no.clone(),
        external_wall_length: line.external_wall_length,
        display_rows,
        line_summary: validate_line(totals, min),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BracingType, RatingTable, System};

    fn display(id: u64, wind: f64, eq: f64, invalid: bool) -> DisplayBracingRow {
        DisplayBracingRow {
            row: BracingRow::new(id, format!("r{}", id), "S", "T", 1.0, 2.4),
            wind_rating: if invalid { None } else { Some(wind) },
            eq_rating: if invalid { None } else { Some(eq) },
            total_wind: wind,
            total_eq: eq,
            is_row_invalid: invalid,
        }
    }

    fn catalog() -> BracingData {
        BracingData {
            systems: vec![System {
                name: "Piles".to_string(),
                types: vec![BracingType {
                    name: "Anchor".to_string(),
                    wind: RatingTable::per_unit(50.0),
                    eq: RatingTable::per_unit(25.0),
                }],
            }],
        }
    }

    #[test]
    fn test_aggregate_sums_rows() {
        let rows = vec![display(1, 100.0, 80.0, false), display(2, 50.0, 20.0, false)];
        let totals = aggregate_line(&rows);
        assert_eq!(totals.line_total_wind, 150.0);
        assert_eq!(totals.line_total_eq, 100.0);
    }

    #[test]
    fn test_aggregate_empty_is_zero() {
        assert_eq!(aggregate_line(&[]), LineTotals::default());
    }

    #[test]
    fn test_invalid_row_isolation() {
        let line = BracinglineData {
            id: 1,
            bracingline_no: "BL-1".to_string(),
            external_wall_length: 0.0,
            rows: vec![
                BracingRow::new(1, "a", "Piles", "Anchor", 2.0, 2.4),
                BracingRow::new(2, "b", "Piles", "Deleted Custom", 2.0, 2.4),
                BracingRow::new(3, "c", "Piles", "Anchor", 1.0, 2.4),
            ],
        };
        let result = evaluate_line(&line, &catalog(), FloorType::Timber, 0.0, 0.0, 2, &BracingPolicy::default());

        assert_eq!(result.line_summary.line_total_wind, 150.0);
        assert!(result.display_rows[1].is_row_invalid);
        assert!(!result.display_rows[0].is_row_invalid);
        assert_eq!(result.invalid_rows().count(), 1);
    }

    #[test]
    fn test_overflowing_line_stays_finite_and_fails() {
        let huge = BracingData {
            systems: vec![System {
                name: "Piles".to_string(),
                types: vec![BracingType {
                    name: "Anchor".to_string(),
                    wind: RatingTable::per_unit(10.0),
                    eq: RatingTable::per_unit(10.0),
                }],
            }],
        };
        let line = BracinglineData {
            id: 1,
            bracingline_no: "BL-1".to_string(),
            external_wall_length: 1e308,
            rows: vec![
                BracingRow::new(1, "a", "Piles", "Anchor", 1e307, 0.0),
                BracingRow::new(2, "b", "Piles", "Anchor", 1e307, 0.0),
            ],
        };
        let result = evaluate_line(&line, &huge, FloorType::Timber, 0.0, 0.0, 2, &BracingPolicy::default());
        let summary = result.line_summary;

        assert!(result.display_rows.iter().all(|r| r.total_wind.is_finite()));
        assert!(summary.line_total_wind.is_finite());
        assert!(summary.line_total_eq.is_finite());
        assert_eq!(summary.min_demand_wind, f64::MAX);
        assert!(!summary.is_wind_ok);
        assert!(!summary.is_eq_ok);

        let json = serde_json::to_value(summary).unwrap();
        assert!(json["lineTotalWind"].is_number());
        assert!(json["minDemandWind"].is_number());
    }

    #[test]
    fn test_aggregate_overflow_collapses_to_zero() {
        let rows = vec![display(1, f64::MAX, 1.0, false), display(2, f64::MAX, 2.0, false)];
        let totals = aggregate_line(&rows);
        assert_eq!(totals.line_total_wind, 0.0);
        assert_eq!(totals.line_total_eq, 3.0);
    }

    #[test]
    fn test_min_demand_absolute_floor() {
        let min = min_demand(0.0, 0.0, 0.0, 2, &BracingPolicy::default());
        assert_eq!(min.min_demand_wind, 100.0);
        assert_eq!(min.min_demand_eq, 100.0);
    }

    #[test]
    fn test_min_demand_fair_share() {
        let min = min_demand(0.0, 1000.0, 600.0, 2, &BracingPolicy::default());
        assert_eq!(min.min_demand_wind, 250.0);
        assert_eq!(min.min_demand_eq, 150.0);
    }

    #[test]
    fn test_min_demand_zero_lines() {
        let min = min_demand(0.0, 1000.0, 1000.0, 0, &BracingPolicy::default());
        assert_eq!(min.min_demand_wind, 500.0);
    }

    #[test]
    fn test_axes_validate_independently() {
        let totals = LineTotals {
            line_total_wind: 200.0,
            line_total_eq: 90.0,
        };
        let summary = validate_line(totals, min_demand(0.0, 0.0, 0.0, 2, &BracingPolicy::default()));
        assert!(summary.is_wind_ok);
        assert!(!summary.is_eq_ok);
        assert!(!summary.passes());
    }

    #[test]
    fn test_exact_minimum_passes() {
        let totals = LineTotals {
            line_total_wind: 100.0,
            line_total_eq: 100.0,
        };
        let summary = validate_line(totals, min_demand(0.0, 0.0, 0.0, 2, &BracingPolicy::default()));
        assert!(summary.passes());
    }

    #[test]
    fn test_summary_json_names() {
        let summary = validate_line(LineTotals::default(), min_demand(0.0, 0.0, 0.0, 1, &BracingPolicy::default()));
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["minDemandEQ"], 100.0);
        assert_eq!(json["lineTotalEQ"], 0.0);
        assert_eq!(json["isEqOk"], false);
    }
}
