//! # bracing_core - Bracing Rating & Compliance Engine
//!
//! `bracing_core` computes the wind and earthquake bracing capacity of a
//! building design and checks it against minimum-demand rules, rolling
//! results up from element rows to bracing lines, tabs (one level and
//! direction each) and the whole project.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take a snapshot and return results
//! - **Never crash on data**: A row referencing a missing catalog type is
//!   reported as "NA" with zero capacity instead of failing the calculation
//! - **JSON-First**: All types implement Serialize/Deserialize
//!
//! ## Quick Start
//!
//! ```rust
//! use bracing_core::file_io::parse_catalog;
//! use bracing_core::project::Project;
//!
//! let catalog = parse_catalog(r#"{
//!     "systems": [
//!         { "name": "GIB", "types": [
//!             { "name": "GS1-N", "wind": { "0.4": null, "1.2": 100 }, "eq": { "0.4": null, "1.2": 100 } }
//!         ]},
//!         { "name": "Custom", "types": [] }
//!     ]
//! }"#).unwrap();
//!
//! let project = Project::new("Smith House", "25-017", "J Smith");
//! let report = project.report(&catalog);
//!
//! // Default rows: 1.2 m at 2.4 m high, 100 BU/m
//! let line = &report.tabs[0].processed_lines[0];
//! assert!((line.line_summary.line_total_wind - 120.0).abs() < 1e-9);
//!
//! // Minimum is max(100, 15 × 0 m, 0.5 × 500 / 2 lines) = 125
//! assert_eq!(line.line_summary.min_demand_wind, 125.0);
//! assert!(!line.line_summary.is_wind_ok);
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Rating catalog, custom bracing library and merge
//! - [`calculations`] - Row resolution, line and tab checks
//! - [`report`] - Denormalized report document
//! - [`project`] - Project container and structural edits
//! - [`policy`] - Floor caps and minimum-demand constants
//! - [`errors`] - Structured error types
//! - [`file_io`] - Catalog loading, atomic project saves

pub mod calculations;
pub mod catalog;
pub mod errors;
pub mod file_io;
pub mod policy;
pub mod project;
pub mod report;

// Re-export commonly used types at crate root for convenience
pub use catalog::{merge_catalog, BracingData, CustomBracing, CustomLibrary};
pub use errors::{BracingError, BracingResult};
pub use file_io::{load_catalog, load_project, save_project};
pub use policy::{BracingPolicy, FloorType};
pub use project::{Project, ProjectInfo, Tab};
pub use report::{assemble_report, ReportDocument};
