//! # Bracing Policy
//!
//! Regulatory constants used by the row resolver and the line aggregator.
//!
//! The defaults are the authoritative values:
//!
//! | Constant | Default |
//! |----------|---------|
//! | Timber floor rating cap | 120 BU |
//! | Concrete floor rating cap | 150 BU |
//! | Reference element height | 2.4 m |
//! | Line minimum demand floor | 100 BU |
//! | Perimeter factor | 15 BU/m of external wall |
//! | Fair-share factor | 0.5 × (tab demand / line count) |
//!
//! A project stores its policy in its settings so individual projects can
//! carry adjusted values when the governing rules change.

use serde::{Deserialize, Serialize};

/// Floor construction beneath the bracing level.
///
/// Determines the maximum per-metre rating a length-keyed element may claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FloorType {
    #[default]
    Timber,
    Concrete,
}

impl FloorType {
    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            FloorType::Timber => "Timber",
            FloorType::Concrete => "Concrete",
        }
    }
}

/// Policy constants for rating caps and line minimum demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BracingPolicy {
    /// Rating cap (BU/m) for length-keyed elements on a timber floor
    pub timber_cap: f64,

    /// Rating cap (BU/m) for length-keyed elements on a concrete floor
    pub concrete_cap: f64,

    /// Height (m) the catalog ratings are calibrated for
    pub reference_height: f64,

    /// Absolute minimum demand per line (BU)
    pub min_line_demand: f64,

    /// Minimum demand per metre of external wall (BU/m)
    pub wall_length_factor: f64,

    /// Fraction of the even per-line share of tab demand each line must carry
    pub fair_share_factor: f64,
}

impl Default for BracingPolicy {
    fn default() -> Self {
        BracingPolicy {
            timber_cap: 120.0,
            concrete_cap: 150.0,
            reference_height: 2.4,
            min_line_demand: 100.0,
            wall_length_factor: 15.0,
            fair_share_factor: 0.5,
        }
    }
}

impl BracingPolicy {
    /// Rating cap for the given floor type
    pub fn cap_for(&self, floor_type: FloorType) -> f64 {
        match floor_type {
            FloorType::Timber => self.timber_cap,
            FloorType::Concrete => self.concrete_cap,
        }
    }

    /// Apply the floor-type cap to a length-keyed rating.
    ///
    /// Values at or below the cap and `None` pass through unchanged, so
    /// applying the cap twice is the same as applying it once.
    ///
    /// ```rust
    /// use bracing_core::policy::{BracingPolicy, FloorType};
    ///
    /// let policy = BracingPolicy::default();
    /// assert_eq!(policy.apply_floor_cap(FloorType::Timber, Some(140.0)), Some(120.0));
    /// assert_eq!(policy.apply_floor_cap(FloorType::Concrete, Some(140.0)), Some(140.0));
    /// assert_eq!(policy.apply_floor_cap(FloorType::Timber, None), None);
    /// ```
    pub fn apply_floor_cap(&self, floor_type: FloorType, rating: Option<f64>) -> Option<f64> {
        let cap = self.cap_for(floor_type);
        rating.map(|r| if r > cap { cap } else { r })
    }

    /// Scale factor for an element of the given height.
    ///
    /// Non-positive heights yield 0 so the element contributes nothing.
    pub fn height_ratio(&self, height: f64) -> f64 {
        if height > 0.0 {
            self.reference_height / height
        } else {
            0.0
        }
    }
}
