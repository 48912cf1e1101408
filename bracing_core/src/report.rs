//! # Report Assembly
//!
//! Turns a project snapshot into a flattened, self-contained report
//! document for an external renderer (HTML, print, PDF).
//!
//! The report carries every resolved rating, total, minimum demand and
//! pass/fail flag, so a renderer never needs the catalog or the policy.
//! Assembly is pure: the same snapshot always yields an equal document.
//!
//! ## Structure
//!
//! ```text
//! ReportDocument
//! ├── projectInfo
//! └── tabs: [ReportTab]
//!     ├── id, title, levelAndLocation, direction, floorType, demandWind, demandEQ
//!     ├── processedLines: [LineResult]
//!     │   ├── displayRows: [DisplayBracingRow]
//!     │   └── lineSummary
//!     └── tabSummary
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::line::LineResult;
use crate::calculations::tab::{evaluate_tab, TabData, TabSummary};
use crate::catalog::BracingData;
use crate::policy::{BracingPolicy, FloorType};
use crate::project::{ProjectInfo, Tab};

/// One tab of the report: tab metadata, evaluated lines, summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTab {
    pub id: String,
    pub title: String,
    pub level_and_location: String,
    pub direction: String,
    pub floor_type: FloorType,
    pub demand_wind: f64,
    #[serde(rename = "demandEQ")]
    pub demand_eq: f64,
    pub processed_lines: Vec<LineResult>,
    pub tab_summary: TabSummary,
}

impl ReportTab {
    /// Both rates reach 100% and every line meets its minimum demand
    pub fn is_compliant(&self) -> bool {
        self.tab_summary.wind_ok()
            && self.tab_summary.eq_ok()
            && self.processed_lines.iter().all(|l| l.line_summary.passes())
    }

    /// Lines failing wind or EQ minimum demand
    pub fn failing_lines(&self) -> impl Iterator<Item = &LineResult> {
        self.processed_lines.iter().filter(|l| !l.line_summary.passes())
    }
}

/// The complete report for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub project_info: ProjectInfo,
    pub tabs: Vec<ReportTab>,
}

impl ReportDocument {
    pub fn is_compliant(&self) -> bool {
        self.tabs.iter().all(ReportTab::is_compliant)
    }

    /// Number of rows across the report that resolved to "NA"
    pub fn invalid_row_count(&self) -> usize {
        self.tabs
            .iter()
            .flat_map(|t| &t.processed_lines)
            .map(|l| l.invalid_rows().count())
            .sum()
    }
}

/// Assemble a report from a project snapshot.
///
/// Tabs are reported in the order of `tabs`. A tab with no entry in
/// `tabs_data` is left out of the report.
pub fn assemble_report(
    project_info: &ProjectInfo,
    tabs: &[Tab],
    tabs_data: &IndexMap<String, TabData>,
    catalog: &BracingData,
    policy: &BracingPolicy,
) -> ReportDocument {
    let report_tabs = tabs
        .iter()
        .filter_map(|tab| {
            let Some(data) = tabs_data.get(&tab.id) else {
                warn!(tab = %tab.id, "tab has no data, skipping");
                return None;
            };
            Some(report_tab(tab, data, catalog, policy))
        })
        .collect::<Vec<_>>();

    debug!(tabs = report_tabs.len(), "assembled report");
    ReportDocument {
        project_info: project_info.clone(),
        tabs: report_tabs,
    }
}

fn report_tab(tab: &Tab, data: &TabData, catalog: &BracingData, policy: &BracingPolicy) -> ReportTab {
    let result = evaluate_tab(data, catalog, policy);
    ReportTab {
        id: tab.id.clone(),
        title: tab.title.clone(),
        level_and_location: data.level_and_location.clone(),
        direction: data.direction.clone(),
        floor_type: data.floor_type,
        demand_wind: data.demand_wind,
        demand_eq: data.demand_eq,
        processed_lines: result.processed_lines,
        tab_summary: result.tab_summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::line::BracinglineData;
    use crate::calculations::row::BracingRow;
    use crate::catalog::{BracingType, RatingTable, System};

    fn catalog() -> BracingData {
        BracingData {
            systems: vec![System {
                name: "GIB".to_string(),
                types: vec![BracingType {
                    name: "Wall".to_string(),
                    wind: RatingTable::from_pairs([("1.0", Some(100.0))]),
                    eq: RatingTable::from_pairs([("1.0", Some(100.0))]),
                }],
            }],
        }
    }

    fn tab_data(id: &str, length: f64) -> TabData {
        let line = |n: u64| BracinglineData {
            id: n,
            bracingline_no: format!("BL-{}", n),
            external_wall_length: 0.0,
            rows: vec![BracingRow::new(1, "r", "GIB", "Wall", length, 2.4)],
        };
        TabData {
            id: id.to_string(),
            level_and_location: "L1".to_string(),
            direction: "NS".to_string(),
            floor_type: FloorType::Timber,
            demand_wind: 400.0,
            demand_eq: 400.0,
            bracinglines: vec![line(1), line(2)],
        }
    }

    fn snapshot() -> (ProjectInfo, Vec<Tab>, IndexMap<String, TabData>) {
        let tabs = vec![
            Tab::new("b", "Level 1 Along"),
            Tab::new("a", "Level 1 Cross"),
        ];
        let mut data = IndexMap::new();
        data.insert("a".to_string(), tab_data("a", 1.0));
        data.insert("b".to_string(), tab_data("b", 2.0));
        (ProjectInfo::default(), tabs, data)
    }

    #[test]
    fn test_tabs_follow_tab_order() {
        let (info, tabs, data) = snapshot();
        let report = assemble_report(&info, &tabs, &data, &catalog(), &BracingPolicy::default());
        let ids: Vec<&str> = report.tabs.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(report.tabs[0].title, "Level 1 Along");
    }

    #[test]
    fn test_compliance() {
        let (info, tabs, data) = snapshot();
        let report = assemble_report(&info, &tabs, &data, &catalog(), &BracingPolicy::default());
        // tab b: 2 lines × 200 = 400 of 400
        assert!(report.tabs[0].is_compliant());
        // tab a: 2 lines × 100 = 200 of 400
        assert!(!report.tabs[1].is_compliant());
        assert_eq!(report.tabs[1].tab_summary.wind_rate, 50.0);
        assert!(!report.is_compliant());
    }

    #[test]
    fn test_missing_tab_data_skipped() {
        let (info, mut tabs, data) = snapshot();
        tabs.push(Tab::new("ghost", "Deleted"));
        let report = assemble_report(&info, &tabs, &data, &catalog(), &BracingPolicy::default());
        assert_eq!(report.tabs.len(), 2);
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let (info, tabs, data) = snapshot();
        let first = assemble_report(&info, &tabs, &data, &catalog(), &BracingPolicy::default());
        let second = assemble_report(&info, &tabs, &data, &catalog(), &BracingPolicy::default());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_report_json_is_denormalized() {
        let (info, tabs, data) = snapshot();
        let report = assemble_report(&info, &tabs, &data, &catalog(), &BracingPolicy::default());
        let json = serde_json::to_value(&report).unwrap();
        let row = &json["tabs"][0]["processedLines"][0]["displayRows"][0];
        assert_eq!(row["windRating"], 100.0);
        assert_eq!(row["totalWind"], 200.0);
        assert_eq!(json["tabs"][0]["tabSummary"]["achievedEQ"], 400.0);
        assert_eq!(json["tabs"][0]["processedLines"][0]["lineSummary"]["isWindOk"], true);
    }
}
