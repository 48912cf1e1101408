//! Plain-text rendering of a report document for the terminal.

use std::fmt::Write;

use bracing_core::calculations::{DisplayBracingRow, LineResult};
use bracing_core::report::{ReportDocument, ReportTab};

const RULE: &str = "═══════════════════════════════════════════════════════════════════════════════";

fn status(ok: bool) -> &'static str {
    if ok {
        "OK"
    } else {
        "NG"
    }
}

fn rating(row: &DisplayBracingRow, value: Option<f64>) -> String {
    match value {
        Some(v) if !row.is_row_invalid => format!("{:.0}", v),
        _ => "NA".to_string(),
    }
}

/// Render the full report.
pub fn render_report(report: &ReportDocument) -> String {
    let mut out = String::new();
    let info = &report.project_info;
    let date = info
        .date
        .map(|d| d.format("%-d/%m/%Y").to_string())
        .unwrap_or_else(|| "N/A".to_string());

    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "  BRACING REPORT");
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Job:       {}", info.project_name);
    let _ = writeln!(out, "Job No:    {}", info.project_no);
    let _ = writeln!(out, "Client:    {}", info.client);
    let _ = writeln!(out, "Design by: {}", info.designer);
    let _ = writeln!(out, "Date:      {}", date);
    if !info.note.is_empty() {
        let _ = writeln!(out, "Note:      {}", info.note);
    }

    for tab in &report.tabs {
        render_tab(&mut out, tab);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(
        out,
        "  RESULT: {}",
        if report.is_compliant() { "PASS" } else { "FAIL" }
    );
    let _ = writeln!(out, "{}", RULE);
    out
}

fn render_tab(out: &mut String, tab: &ReportTab) {
    let s = &tab.tab_summary;
    let _ = writeln!(out);
    let _ = writeln!(out, "── {} ──", tab.title);
    let _ = writeln!(
        out,
        "Location: {} | Direction: {} | Floor Type: {}",
        tab.level_and_location,
        tab.direction,
        tab.floor_type.display_name()
    );
    let _ = writeln!(out, "{:<16}{:>10}{:>10}", "", "Wind", "EQ");
    let _ = writeln!(out, "{:<16}{:>10.0}{:>10.0}", "Total Demand", tab.demand_wind, tab.demand_eq);
    let _ = writeln!(out, "{:<16}{:>10.0}{:>10.0}", "Total Achieved", s.achieved_wind, s.achieved_eq);
    let _ = writeln!(
        out,
        "{:<16}{:>9.1}%{:>9.1}%   [{}/{}]",
        "Rate",
        s.wind_rate,
        s.eq_rate,
        status(s.wind_ok()),
        status(s.eq_ok())
    );

    for line in &tab.processed_lines {
        render_line(out, line);
    }
}

fn render_line(out: &mut String, line: &LineResult) {
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  Bracing Line {} (external wall {} m)",
        line.bracingline_no, line.external_wall_length
    );
    let _ = writeln!(
        out,
        "    {:<10}{:<8}{:<18}{:>8}{:>8}{:>9}{:>9}{:>11}{:>11}",
        "Label", "Sys.", "Type", "Len/No", "Height", "BU Wind", "BU EQ", "Total Wind", "Total EQ"
    );
    for row in &line.display_rows {
        let _ = writeln!(
            out,
            "    {:<10}{:<8}{:<18}{:>8}{:>8}{:>9}{:>9}{:>11.0}{:>11.0}",
            row.row.label,
            row.row.system,
            row.row.type_name,
            row.row.length_or_count,
            row.row.height,
            rating(row, row.wind_rating),
            rating(row, row.eq_rating),
            row.total_wind,
            row.total_eq
        );
    }
    let s = &line.line_summary;
    let _ = writeln!(out, "    {:<14}{:>10}{:>10}", "", "Wind", "EQ");
    let _ = writeln!(out, "    {:<14}{:>10.0}{:>10.0}", "Min Demand", s.min_demand_wind, s.min_demand_eq);
    let _ = writeln!(out, "    {:<14}{:>10.0}{:>10.0}", "Total for Line", s.line_total_wind, s.line_total_eq);
    let _ = writeln!(
        out,
        "    {:<14}{:>10}{:>10}",
        "Result",
        status(s.is_wind_ok),
        status(s.is_eq_ok)
    );
}

/// One line per failing tab or line, for `bracing check`.
pub fn render_failures(report: &ReportDocument) -> Vec<String> {
    let mut failures = Vec::new();
    for tab in &report.tabs {
        let s = &tab.tab_summary;
        if !s.wind_ok() || !s.eq_ok() {
            failures.push(format!(
                "{}: rate wind {:.1}% ({}), EQ {:.1}% ({})",
                tab.title,
                s.wind_rate,
                status(s.wind_ok()),
                s.eq_rate,
                status(s.eq_ok())
            ));
        }
        for line in tab.failing_lines() {
            let l = &line.line_summary;
            failures.push(format!(
                "{} / {}: wind {:.0} of {:.0} ({}), EQ {:.0} of {:.0} ({})",
                tab.title,
                line.bracingline_no,
                l.line_total_wind,
                l.min_demand_wind,
                status(l.is_wind_ok),
                l.line_total_eq,
                l.min_demand_eq,
                status(l.is_eq_ok)
            ));
        }
    }
    failures
}
