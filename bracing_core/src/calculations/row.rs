//! # Row Resolution
//!
//! Resolves one bracing element against the catalog and computes its
//! achieved wind and EQ capacity.
//!
//! ## Algorithm
//!
//! 1. Look up the type by `system` then `type` name. A miss marks the row
//!    invalid with null ratings and zero totals.
//! 2. Number-keyed types (first wind key `n_1`) take the `n_1` rating.
//!    Length-keyed types take the rating at the largest length breakpoint
//!    not exceeding `lengthOrCount`, using the key chosen from the wind
//!    table for both axes.
//! 3. Length-keyed ratings are capped by floor type (Timber 120,
//!    Concrete 150). Number-keyed ratings are never capped.
//! 4. Totals:
//!    - number-keyed: `rating × count`
//!    - length-keyed: `rating × length × (2.4 / height)`, zero for
//!      non-positive heights
//!
//! Resolution never fails. A row whose type was deleted, or whose length
//! is below the shortest rated length, renders as "NA" with zero capacity
//! and leaves the other rows untouched.
//!
//! ## Example
//!
//! ```rust
//! use bracing_core::calculations::row::{resolve_row, BracingRow};
//! use bracing_core::catalog::{BracingData, BracingType, RatingTable, System};
//! use bracing_core::policy::{BracingPolicy, FloorType};
//!
//! let catalog = BracingData {
//!     systems: vec![System {
//!         name: "GIB".to_string(),
//!         types: vec![BracingType {
//!             name: "GS1-N".to_string(),
//!             wind: RatingTable::from_pairs([("1.2", Some(100.0))]),
//!             eq: RatingTable::from_pairs([("1.2", Some(80.0))]),
//!         }],
//!     }],
//! };
//!
//! let row = BracingRow::new(1, "BL-1-1", "GIB", "GS1-N", 2.0, 4.8);
//! let resolved = resolve_row(&row, &catalog, FloorType::Timber, &BracingPolicy::default());
//!
//! // 100 BU/m × 2 m × (2.4 / 4.8)
//! assert!((resolved.total_wind - 100.0).abs() < 1e-9);
//! assert!(!resolved.is_row_invalid);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::finite_or_zero;
use crate::catalog::{BracingData, KeyRegime, NUMBER_KEY};
use crate::policy::{BracingPolicy, FloorType};

/// One physical bracing element.
///
/// `system` and `type` reference the catalog by name.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": 1,
///   "label": "BL-1-1",
///   "system": "GIB",
///   "type": "GS1-N",
///   "lengthOrCount": 1.2,
///   "height": 2.4
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracingRow {
    pub id: u64,

    /// User label (e.g., "BL-1-1")
    pub label: String,

    /// Catalog system name
    pub system: String,

    /// Catalog type name within `system`
    #[serde(rename = "type")]
    pub type_name: String,

    /// Element length in metres, or a count for number-keyed types
    pub length_or_count: f64,

    /// Element height in metres (length-keyed types only)
    pub height: f64,
}

impl BracingRow {
    pub fn new(
        id: u64,
        label: impl Into<String>,
        system: impl Into<String>,
        type_name: impl Into<String>,
        length_or_count: f64,
        height: f64,
    ) -> Self {
        BracingRow {
            id,
            label: label.into(),
            system: system.into(),
            type_name: type_name.into(),
            length_or_count,
            height,
        }
    }
}

/// A bracing row with its resolved ratings and totals.
///
/// Derived on every calculation and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayBracingRow {
    #[serde(flatten)]
    pub row: BracingRow,

    /// Effective wind rating (BU per metre or per unit); `None` renders as NA
    pub wind_rating: Option<f64>,

    /// Effective EQ rating (BU per metre or per unit); `None` renders as NA
    pub eq_rating: Option<f64>,

    /// Achieved wind capacity (BU)
    pub total_wind: f64,

    /// Achieved EQ capacity (BU)
    #[serde(rename = "totalEQ")]
    pub total_eq: f64,

    /// True when the type is missing or either rating is unavailable
    pub is_row_invalid: bool,
}

impl DisplayBracingRow {
    fn invalid(row: &BracingRow, wind_rating: Option<f64>, eq_rating: Option<f64>) -> Self {
        DisplayBracingRow {
            row: row.clone(),
            wind_rating,
            eq_rating,
            total_wind: 0.0,
            total_eq: 0.0,
            is_row_invalid: true,
        }
    }
}

/// Resolve a single row against the catalog.
pub fn resolve_row(
    row: &BracingRow,
    catalog: &BracingData,
    floor_type: FloorType,
    policy: &BracingPolicy,
) -> DisplayBracingRow {
    let Some(bracing_type) = catalog.find_type(&row.system, &row.type_name) else {
        debug!(row = row.id, system = %row.system, type_name = %row.type_name, "bracing type not in catalog");
        return DisplayBracingRow::invalid(row, None, None);
    };

    let regime = bracing_type.wind.regime();
    let (wind_rating, eq_rating) = match regime {
        KeyRegime::NumberKeyed => (
            bracing_type.wind.get(NUMBER_KEY),
            bracing_type.eq.get(NUMBER_KEY),
        ),
        KeyRegime::LengthKeyed => {
            let key = bracing_type.wind.floor_key(row.length_or_count);
            let wind = key.and_then(|k| bracing_type.wind.get(k));
            let eq = key.and_then(|k| bracing_type.eq.get(k));
            (
                policy.apply_floor_cap(floor_type, wind),
                policy.apply_floor_cap(floor_type, eq),
            )
        }
    };
    let wind_rating = wind_rating.filter(|r| r.is_finite());
    let eq_rating = eq_rating.filter(|r| r.is_finite());

    let (Some(wind), Some(eq)) = (wind_rating, eq_rating) else {
        debug!(row = row.id, length = row.length_or_count, "no rating available for row");
        return DisplayBracingRow::invalid(row, wind_rating, eq_rating);
    };

    let multiplier = match regime {
        KeyRegime::NumberKeyed => row.length_or_count,
        KeyRegime::LengthKeyed => row.length_or_count * policy.height_ratio(row.height),
    };

    DisplayBracingRow {
        row: row.clone(),
        wind_rating,
        eq_rating,
        total_wind: finite_or_zero(wind * multiplier),
        total_eq: finite_or_zero(eq * multiplier),
        is_row_invalid: false,
    }
}

/// Resolve every row of a line, preserving order.
pub fn resolve_rows(
    rows: &[BracingRow],
    catalog: &BracingData,
    floor_type: FloorType,
    policy: &BracingPolicy,
) -> Vec<DisplayBracingRow> {
    rows.iter()
        .map(|row| resolve_row(row, catalog, floor_type, policy))
        .collect()
}
