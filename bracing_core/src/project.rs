//! # Project Data Structures
//!
//! The `Project` struct is the editing-store snapshot: project information,
//! the ordered tab list, per-tab bracing data, the custom bracing library
//! and the policy settings. Projects serialize to human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (schema version, timestamps)
//! ├── info: ProjectInfo (name, number, client, designer, date, note)
//! ├── settings: ProjectSettings (bracing policy)
//! ├── tabs: [Tab] (display order)
//! ├── tabsData: { tab id → TabData }
//! └── customBracings: CustomLibrary
//! ```
//!
//! Structural edits keep the invariants the calculation relies on: a
//! line always keeps at least one row and a tab at least two lines.
//!
//! ## Example
//!
//! ```rust
//! use bracing_core::project::Project;
//!
//! let mut project = Project::new("Smith House", "25-017", "J Smith");
//! assert_eq!(project.tabs.len(), 2);
//!
//! let tab_id = project.add_tab("Level 2 Cross");
//! let line_id = project.add_bracingline(&tab_id, 1).unwrap();
//! let row_id = project.add_row(&tab_id, line_id, 0).unwrap();
//!
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("Level 2 Cross"));
//! # let _ = row_id;
//! ```

use chrono::{DateTime, Local, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::calculations::line::BracinglineData;
use crate::calculations::row::BracingRow;
use crate::calculations::tab::TabData;
use crate::catalog::{merge_catalog, BracingData, CustomLibrary};
use crate::errors::{BracingError, BracingResult};
use crate::policy::{BracingPolicy, FloorType};
use crate::report::{assemble_report, ReportDocument};

/// Current schema version for project files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// A line never drops below this many rows
pub const MIN_ROWS_PER_LINE: usize = 1;

/// A tab never drops below this many lines
pub const MIN_LINES_PER_TAB: usize = 2;

/// System and type given to newly added rows
pub const DEFAULT_SYSTEM: &str = "GIB";
pub const DEFAULT_TYPE: &str = "GS1-N";

const DEFAULT_LENGTH: f64 = 1.2;
const DEFAULT_HEIGHT: f64 = 2.4;
const DEFAULT_DIRECTION: &str = "NS-Cross";
const DEFAULT_DEMAND: f64 = 500.0;

/// Identifying information printed on the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub project_name: String,
    pub project_no: String,
    pub client: String,
    pub designer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub note: String,
}

/// A tab in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: String,
    pub title: String,
}

impl Tab {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Tab {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Project file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Per-project settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    pub policy: BracingPolicy,
}

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub meta: ProjectMetadata,
    pub info: ProjectInfo,
    #[serde(default)]
    pub settings: ProjectSettings,

    /// Tabs in display order
    pub tabs: Vec<Tab>,

    /// Bracing data keyed by tab id
    pub tabs_data: IndexMap<String, TabData>,

    #[serde(default)]
    pub custom_bracings: CustomLibrary,
}

impl Project {
    /// Create a project with the two default tabs.
    ///
    /// ```rust
    /// use bracing_core::project::Project;
    ///
    /// let project = Project::new("New Project", "", "");
    /// let titles: Vec<&str> = project.tabs.iter().map(|t| t.title.as_str()).collect();
    /// assert_eq!(titles, vec!["Level 1 Cross", "Level 1 Along"]);
    /// ```
    pub fn new(project_name: impl Into<String>, project_no: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        let mut project = Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                created: now,
                modified: now,
            },
            info: ProjectInfo {
                project_name: project_name.into(),
                project_no: project_no.into(),
                client: client.into(),
                designer: String::new(),
                date: Some(Local::now().date_naive()),
                note: String::new(),
            },
            settings: ProjectSettings::default(),
            tabs: Vec::new(),
            tabs_data: IndexMap::new(),
            custom_bracings: CustomLibrary::default(),
        };
        project.add_tab("Level 1 Cross");
        project.add_tab("Level 1 Along");
        project
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Append a tab with default data. Returns the new tab's id.
    pub fn add_tab(&mut self, title: impl Into<String>) -> String {
        let id = Uuid::new_v4().to_string();
        let title = title.into();
        let data = TabData {
            id: id.clone(),
            level_and_location: title.clone(),
            direction: DEFAULT_DIRECTION.to_string(),
            floor_type: FloorType::Timber,
            demand_wind: DEFAULT_DEMAND,
            demand_eq: DEFAULT_DEMAND,
            bracinglines: vec![default_line(1), default_line(2)],
        };
        self.tabs.push(Tab::new(id.clone(), title));
        self.tabs_data.insert(id.clone(), data);
        self.touch();
        debug!(tab = %id, "added tab");
        id
    }

    /// Rename a tab. The tab's level/location follows the new title.
    pub fn rename_tab(&mut self, tab_id: &str, title: impl Into<String>) -> BracingResult<()> {
        let title = title.into();
        let tab = self
            .tabs
            .iter_mut()
            .find(|t| t.id == tab_id)
            .ok_or_else(|| BracingError::not_found("tab", tab_id))?;
        tab.title = title.clone();
        if let Some(data) = self.tabs_data.get_mut(tab_id) {
            data.level_and_location = title;
        }
        self.touch();
        Ok(())
    }

    /// Remove a tab and its data. Returns whether the tab existed.
    pub fn delete_tab(&mut self, tab_id: &str) -> bool {
        let before = self.tabs.len();
        self.tabs.retain(|t| t.id != tab_id);
        let removed_data = self.tabs_data.shift_remove(tab_id).is_some();
        let removed = before != self.tabs.len() || removed_data;
        if removed {
            self.touch();
        }
        removed
    }

    pub fn tab_data(&self, tab_id: &str) -> Option<&TabData> {
        self.tabs_data.get(tab_id)
    }

    /// Mutable tab data. Marks the project as modified when found.
    pub fn tab_data_mut(&mut self, tab_id: &str) -> Option<&mut TabData> {
        if self.tabs_data.contains_key(tab_id) {
            self.meta.modified = Utc::now();
            self.tabs_data.get_mut(tab_id)
        } else {
            None
        }
    }

    /// Insert a default line after position `index`. Returns the line id.
    pub fn add_bracingline(&mut self, tab_id: &str, index: usize) -> BracingResult<u64> {
        let data = self
            .tab_data_mut(tab_id)
            .ok_or_else(|| BracingError::not_found("tab", tab_id))?;
        let id = data.bracinglines.iter().map(|l| l.id).max().unwrap_or(0) + 1;
        let at = (index + 1).min(data.bracinglines.len());
        data.bracinglines.insert(at, default_line(id));
        Ok(id)
    }

    /// Remove a line, keeping at least [`MIN_LINES_PER_TAB`] lines.
    pub fn delete_bracingline(&mut self, tab_id: &str, line_id: u64) -> BracingResult<()> {
        let data = self
            .tab_data_mut(tab_id)
            .ok_or_else(|| BracingError::not_found("tab", tab_id))?;
        let pos = data
            .bracinglines
            .iter()
            .position(|l| l.id == line_id)
            .ok_or_else(|| BracingError::not_found("bracing line", line_id.to_string()))?;
        if data.bracinglines.len() <= MIN_LINES_PER_TAB {
            return Err(BracingError::constraint(format!(
                "a tab needs at least {} bracing lines",
                MIN_LINES_PER_TAB
            )));
        }
        data.bracinglines.remove(pos);
        Ok(())
    }

    /// Insert a default row after position `index`. Returns the row id.
    pub fn add_row(&mut self, tab_id: &str, line_id: u64, index: usize) -> BracingResult<u64> {
        let line = self.line_mut(tab_id, line_id)?;
        let id = line.rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let row = default_row(id, &line.bracingline_no, line.rows.len());
        let at = (index + 1).min(line.rows.len());
        line.rows.insert(at, row);
        Ok(id)
    }

    /// Remove a row, keeping at least [`MIN_ROWS_PER_LINE`] rows.
    pub fn delete_row(&mut self, tab_id: &str, line_id: u64, row_id: u64) -> BracingResult<()> {
        let line = self.line_mut(tab_id, line_id)?;
        let pos = line
            .rows
            .iter()
            .position(|r| r.id == row_id)
            .ok_or_else(|| BracingError::not_found("row", row_id.to_string()))?;
        if line.rows.len() <= MIN_ROWS_PER_LINE {
            return Err(BracingError::constraint("a bracing line needs at least one row"));
        }
        line.rows.remove(pos);
        Ok(())
    }

    /// Mutable access to one row for field edits.
    pub fn row_mut(&mut self, tab_id: &str, line_id: u64, row_id: u64) -> BracingResult<&mut BracingRow> {
        self.line_mut(tab_id, line_id)?
            .rows
            .iter_mut()
            .find(|r| r.id == row_id)
            .ok_or_else(|| BracingError::not_found("row", row_id.to_string()))
    }

    fn line_mut(&mut self, tab_id: &str, line_id: u64) -> BracingResult<&mut BracinglineData> {
        self.tab_data_mut(tab_id)
            .ok_or_else(|| BracingError::not_found("tab", tab_id))?
            .bracinglines
            .iter_mut()
            .find(|l| l.id == line_id)
            .ok_or_else(|| BracingError::not_found("bracing line", line_id.to_string()))
    }

    /// The base catalog with this project's custom bracing merged in.
    pub fn effective_catalog(&self, base: &BracingData) -> BracingData {
        merge_catalog(base, self.custom_bracings.entries())
    }

    /// Assemble the compliance report against `base`.
    pub fn report(&self, base: &BracingData) -> ReportDocument {
        let catalog = self.effective_catalog(base);
        assemble_report(
            &self.info,
            &self.tabs,
            &self.tabs_data,
            &catalog,
            &self.settings.policy,
        )
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("New Project", "", "")
    }
}

fn default_row(id: u64, bracingline_no: &str, row_count: usize) -> BracingRow {
    BracingRow::new(
        id,
        format!("{}-{}", bracingline_no, row_count + 1),
        DEFAULT_SYSTEM,
        DEFAULT_TYPE,
        DEFAULT_LENGTH,
        DEFAULT_HEIGHT,
    )
}

fn default_line(id: u64) -> BracinglineData {
    let bracingline_no = format!("BL-{}", id);
    BracinglineData {
        id,
        rows: vec![default_row(1, &bracingline_no, 0)],
        bracingline_no,
        external_wall_length: 0.0,
    }
}
