//! End-to-end report over the sample catalog fixture.

use std::path::PathBuf;

use bracing_core::catalog::CustomBracing;
use bracing_core::file_io::load_catalog;
use bracing_core::policy::FloorType;
use bracing_core::project::Project;
use bracing_core::BracingData;

fn catalog() -> BracingData {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/catalog.json");
    load_catalog(&path).unwrap()
}

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

/// First tab: two lines mixing length-keyed, number-keyed, custom and
/// dangling rows. Second tab left at defaults.
fn project() -> (Project, String) {
    let mut project = Project::new("Smith House", "25-017", "J Smith");
    project
        .custom_bracings
        .create(CustomBracing::number_based("Site Portal", 90.0, 70.0))
        .unwrap();
    let tab = project.tabs[0].id.clone();

    // Line 1: default GS1-N row plus a BL1-H that exceeds the timber cap
    let row = project.add_row(&tab, 1, 0).unwrap();
    {
        let r = project.row_mut(&tab, 1, row).unwrap();
        r.type_name = "BL1-H".to_string();
        r.length_or_count = 2.4;
    }

    // Line 2: three anchor piles, one custom portal, one deleted custom type
    {
        let r = project.row_mut(&tab, 2, 1).unwrap();
        r.system = "Piles".to_string();
        r.type_name = "Anchor Pile".to_string();
        r.length_or_count = 3.0;
        r.height = 0.0;
    }
    let portal = project.add_row(&tab, 2, 0).unwrap();
    {
        let r = project.row_mut(&tab, 2, portal).unwrap();
        r.system = "Custom".to_string();
        r.type_name = "Site Portal".to_string();
        r.length_or_count = 1.0;
    }
    let dangling = project.add_row(&tab, 2, 1).unwrap();
    {
        let r = project.row_mut(&tab, 2, dangling).unwrap();
        r.system = "Custom".to_string();
        r.type_name = "Removed Portal".to_string();
    }

    (project, tab)
}

#[test]
fn test_full_report_values() {
    let (project, _) = project();
    let report = project.report(&catalog());

    let tab = &report.tabs[0];
    let line1 = &tab.processed_lines[0];
    // GS1-N 55 × 1.2 = 66; BL1-H 145 capped to 120 × 2.4 = 288
    approx(line1.line_summary.line_total_wind, 354.0);
    approx(line1.line_summary.line_total_eq, 336.0);
    assert_eq!(line1.display_rows[1].wind_rating, Some(120.0));
    approx(line1.line_summary.min_demand_wind, 125.0);
    assert!(line1.line_summary.passes());

    let line2 = &tab.processed_lines[1];
    // 3 piles × 120 + portal 90, dangling row contributes nothing
    approx(line2.line_summary.line_total_wind, 450.0);
    approx(line2.line_summary.line_total_eq, 250.0);
    assert_eq!(line2.invalid_rows().count(), 1);
    assert_eq!(line2.display_rows[2].row.type_name, "Removed Portal");

    approx(tab.tab_summary.achieved_wind, 804.0);
    approx(tab.tab_summary.wind_rate, 160.8);
    approx(tab.tab_summary.eq_rate, 117.2);
    assert!(tab.is_compliant());

    let defaults = &report.tabs[1];
    assert!(!defaults.is_compliant());
    assert_eq!(defaults.failing_lines().count(), 2);
    approx(defaults.tab_summary.wind_rate, 26.4);

    assert!(!report.is_compliant());
    assert_eq!(report.invalid_row_count(), 1);
}

#[test]
fn test_concrete_floor_raises_cap() {
    let (mut project, tab) = project();
    project.tab_data_mut(&tab).unwrap().floor_type = FloorType::Concrete;
    let report = project.report(&catalog());
    let row = &report.tabs[0].processed_lines[0].display_rows[1];
    assert_eq!(row.wind_rating, Some(145.0));
    assert_eq!(row.eq_rating, Some(135.0));
}

#[test]
fn test_deleting_custom_type_degrades_rows() {
    let (mut project, _) = project();
    assert!(project.custom_bracings.delete("Site Portal"));
    let report = project.report(&catalog());
    let line2 = &report.tabs[0].processed_lines[1];
    assert_eq!(line2.invalid_rows().count(), 2);
    approx(line2.line_summary.line_total_wind, 360.0);
}

#[test]
fn test_report_is_idempotent_and_base_untouched() {
    let (project, _) = project();
    let base = catalog();
    let first = project.report(&base);
    let second = project.report(&base);

    assert_eq!(first, second);
    assert_eq!(base, catalog());
    assert!(base.find_type("Custom", "Site Portal").is_none());
}

#[test]
fn test_report_json_numbers_are_present() {
    let (project, _) = project();
    let json = serde_json::to_value(project.report(&catalog())).unwrap();
    for tab in json["tabs"].as_array().unwrap() {
        for line in tab["processedLines"].as_array().unwrap() {
            for row in line["displayRows"].as_array().unwrap() {
                assert!(row["totalWind"].is_number());
                assert!(row["totalEQ"].is_number());
                assert!(row["isRowInvalid"].is_boolean());
            }
            assert!(line["lineSummary"]["isWindOk"].is_boolean());
            assert!(line["lineSummary"]["minDemandEQ"].is_number());
        }
        assert!(tab["tabSummary"]["windRate"].is_number());
    }
    assert_eq!(json["projectInfo"]["projectName"], "Smith House");
}
