//! # Tab Check
//!
//! A tab is one building level and direction with a single wind/EQ demand
//! budget. Its achieved capacity is the sum of its line totals, and its
//! rate is achieved capacity as a percentage of demand.
//!
//! Tabs are independent: nothing in one tab affects another.

use serde::{Deserialize, Serialize};

use super::finite_or_zero;
use super::line::{evaluate_line, BracinglineData, LineResult};
use crate::catalog::BracingData;
use crate::policy::{BracingPolicy, FloorType};

/// Rate at or above which an axis is compliant (percent)
pub const COMPLIANT_RATE: f64 = 100.0;

/// Input data for one tab.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "tab1",
///   "levelAndLocation": "Level 1 Cross",
///   "direction": "NS-Cross",
///   "floorType": "Timber",
///   "demandWind": 500,
///   "demandEQ": 500,
///   "bracinglines": []
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabData {
    pub id: String,
    pub level_and_location: String,
    pub direction: String,
    pub floor_type: FloorType,

    /// Total wind demand for the tab (BU)
    pub demand_wind: f64,

    /// Total EQ demand for the tab (BU)
    #[serde(rename = "demandEQ")]
    pub demand_eq: f64,

    pub bracinglines: Vec<BracinglineData>,
}

/// Achieved capacity and rate per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSummary {
    pub achieved_wind: f64,
    #[serde(rename = "achievedEQ")]
    pub achieved_eq: f64,
    pub wind_rate: f64,
    pub eq_rate: f64,
}

impl TabSummary {
    pub fn wind_ok(&self) -> bool {
        self.wind_rate >= COMPLIANT_RATE
    }

    pub fn eq_ok(&self) -> bool {
        self.eq_rate >= COMPLIANT_RATE
    }
}

/// Evaluated lines plus the tab summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabResult {
    pub processed_lines: Vec<LineResult>,
    pub tab_summary: TabSummary,
}

/// Achieved capacity as a percentage of demand; 0 when demand is 0.
pub fn rate(achieved: f64, demand: f64) -> f64 {
    if demand == 0.0 {
        0.0
    } else {
        finite_or_zero(achieved / demand * 100.0)
    }
}

/// Sum evaluated lines into a tab summary.
pub fn summarize_tab(lines: &[LineResult], demand_wind: f64, demand_eq: f64) -> TabSummary {
    let (achieved_wind, achieved_eq) = lines.iter().fold((0.0, 0.0), |(wind, eq), line| {
        (
            wind + line.line_summary.line_total_wind,
            eq + line.line_summary.line_total_eq,
        )
    });

    let achieved_wind = finite_or_zero(achieved_wind);
    let achieved_eq = finite_or_zero(achieved_eq);

    TabSummary {
        achieved_wind,
        achieved_eq,
        wind_rate: rate(achieved_wind, demand_wind),
        eq_rate: rate(achieved_eq, demand_eq),
    }
}

/// Evaluate every line of a tab and summarize.
pub fn evaluate_tab(tab: &TabData, catalog: &BracingData, policy: &BracingPolicy) -> TabResult {
    let line_count = tab.bracinglines.len();
    let processed_lines: Vec<LineResult> = tab
        .bracinglines
        .iter()
        .map(|line| {
            evaluate_line(
                line,
                catalog,
                tab.floor_type,
                tab.demand_wind,
                tab.demand_eq,
                line_count,
                policy,
            )
        })
        .collect();
    let tab_summary = summarize_tab(&processed_lines, tab.demand_wind, tab.demand_eq);

    TabResult {
        processed_lines,
        tab_summary,
    }
}
