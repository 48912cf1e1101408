//! # Rating Catalog
//!
//! Reference table of bracing systems and their types. Each type carries a
//! wind and an EQ [`RatingTable`].
//!
//! The catalog is loaded once and treated as immutable during a
//! calculation. User-defined types are layered on with
//! [`merge_catalog`], which returns a new catalog.
//!
//! ## JSON Shape
//!
//! ```json
//! {
//!   "systems": [
//!     {
//!       "name": "GIB",
//!       "types": [
//!         { "name": "GS1-N", "wind": { "0.4": null, "1.2": 55 }, "eq": { "0.4": null, "1.2": 40 } }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bracing_core::catalog::{BracingData, BracingType, RatingTable, System};
//!
//! let catalog = BracingData {
//!     systems: vec![System {
//!         name: "Piles".to_string(),
//!         types: vec![BracingType {
//!             name: "Anchor Pile".to_string(),
//!             wind: RatingTable::per_unit(120.0),
//!             eq: RatingTable::per_unit(60.0),
//!         }],
//!     }],
//! };
//!
//! assert!(catalog.find_type("Piles", "Anchor Pile").is_some());
//! assert!(catalog.find_type("Piles", "Braced Pile").is_none());
//! ```

pub mod custom;
pub mod rating_table;

pub use custom::{merge_catalog, CustomBracing, CustomLibrary};
pub use rating_table::{KeyRegime, RatingTable, NUMBER_KEY};

use serde::{Deserialize, Serialize};

/// Name of the system that receives user-defined bracing types.
pub const CUSTOM_SYSTEM: &str = "Custom";

/// A single bracing type with its wind and EQ ratings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BracingType {
    pub name: String,
    #[serde(default)]
    pub wind: RatingTable,
    #[serde(default)]
    pub eq: RatingTable,
}

/// A named group of bracing types (a manufacturer or category).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct System {
    pub name: String,
    #[serde(default)]
    pub types: Vec<BracingType>,
}

impl System {
    /// Find a type by name within this system.
    pub fn find_type(&self, name: &str) -> Option<&BracingType> {
        self.types.iter().find(|t| t.name == name)
    }
}

/// The full bracing catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BracingData {
    #[serde(default)]
    pub systems: Vec<System>,
}

impl BracingData {
    /// Find a system by name.
    pub fn find_system(&self, name: &str) -> Option<&System> {
        self.systems.iter().find(|s| s.name == name)
    }

    /// Look up a type by system and type name.
    ///
    /// Rows reference the catalog by name, so a miss is an ordinary
    /// outcome (e.g. a deleted custom type) and returns `None`.
    pub fn find_type(&self, system: &str, type_name: &str) -> Option<&BracingType> {
        self.find_system(system)?.find_type(type_name)
    }

    /// System names in catalog order.
    pub fn system_names(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|s| s.name.as_str())
    }

    /// Total number of types across all systems.
    pub fn type_count(&self) -> usize {
        self.systems.iter().map(|s| s.types.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> BracingData {
        serde_json::from_str(
            r#"{
                "systems": [
                    { "name": "GIB", "types": [
                        { "name": "GS1-N", "wind": { "0.4": null, "1.2": 55 }, "eq": { "0.4": null, "1.2": 40 } },
                        { "name": "BL1-H", "wind": { "0.4": 70 }, "eq": { "0.4": 60 } }
                    ]},
                    { "name": "Custom", "types": [] }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_find_type() {
        let catalog = catalog();
        let t = catalog.find_type("GIB", "GS1-N").unwrap();
        assert_eq!(t.wind.get("1.2"), Some(55.0));
        assert!(catalog.find_type("GIB", "missing").is_none());
        assert!(catalog.find_type("Nope", "GS1-N").is_none());
    }

    #[test]
    fn test_counts_and_names() {
        let catalog = catalog();
        assert_eq!(catalog.type_count(), 2);
        let names: Vec<&str> = catalog.system_names().collect();
        assert_eq!(names, vec!["GIB", CUSTOM_SYSTEM]);
    }

    #[test]
    fn test_tolerates_missing_tables() {
        let catalog: BracingData =
            serde_json::from_str(r#"{ "systems": [ { "name": "X", "types": [ { "name": "Bare" } ] } ] }"#).unwrap();
        let t = catalog.find_type("X", "Bare").unwrap();
        assert!(t.wind.is_empty());
        assert!(t.eq.is_empty());
    }
}
