//! # Custom Bracing
//!
//! User-defined bracing types and their overlay onto the base catalog.
//!
//! [`CustomLibrary`] is the editing boundary: it rejects blank and
//! duplicate names, so everything that reaches [`merge_catalog`] is
//! already validated. Names are the identity of an entry and cannot be
//! changed by an update.
//!
//! ## Example
//!
//! ```rust
//! use bracing_core::catalog::{merge_catalog, BracingData, CustomBracing, CustomLibrary};
//!
//! let mut library = CustomLibrary::default();
//! library.create(CustomBracing::number_based("Site Pile", 80.0, 45.0)).unwrap();
//! library
//!     .create(CustomBracing::length_based("Ply Wall", [("0.6", 60.0, 50.0), ("1.2", 90.0, 75.0)]))
//!     .unwrap();
//!
//! // Duplicate names are rejected
//! assert!(library.create(CustomBracing::number_based("Site Pile", 1.0, 1.0)).is_err());
//!
//! let base = BracingData::default();
//! let merged = merge_catalog(&base, library.entries());
//! assert!(merged.find_type("Custom", "Ply Wall").is_some());
//! assert!(base.systems.is_empty());
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rating_table::{RatingTable, NUMBER_KEY};
use super::{BracingData, BracingType, System, CUSTOM_SYSTEM};
use crate::errors::{BracingError, BracingResult};

const KIND: &str = "custom bracing";

/// A user-authored bracing type. Ratings are never null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomBracing {
    pub name: String,
    pub wind: IndexMap<String, f64>,
    pub eq: IndexMap<String, f64>,
}

impl CustomBracing {
    /// A per-unit entry (pile, portal) rated under the `n_1` key.
    pub fn number_based(name: impl Into<String>, wind: f64, eq: f64) -> Self {
        CustomBracing {
            name: name.into(),
            wind: IndexMap::from([(NUMBER_KEY.to_string(), wind)]),
            eq: IndexMap::from([(NUMBER_KEY.to_string(), eq)]),
        }
    }

    /// A length-keyed entry from `(length key, wind, eq)` rows.
    ///
    /// Rows with a blank key are skipped, matching how the entry form
    /// treats half-filled rows.
    pub fn length_based<K: AsRef<str>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = (K, f64, f64)>,
    ) -> Self {
        let mut wind = IndexMap::new();
        let mut eq = IndexMap::new();
        for (key, w, e) in values {
            let key = key.as_ref().trim();
            if key.is_empty() {
                continue;
            }
            wind.insert(key.to_string(), w);
            eq.insert(key.to_string(), e);
        }
        CustomBracing {
            name: name.into(),
            wind,
            eq,
        }
    }

    pub fn is_number_based(&self) -> bool {
        self.wind.keys().next().map(String::as_str) == Some(NUMBER_KEY)
    }

    /// Check the entry is well formed.
    ///
    /// - name is not blank
    /// - at least one rating key
    /// - wind and EQ declare the same keys
    /// - number-based entries carry only `n_1`; length-based keys are numbers
    /// - every rating is finite
    pub fn validate(&self) -> BracingResult<()> {
        if self.name.trim().is_empty() {
            return Err(BracingError::missing_field("name"));
        }
        if self.wind.is_empty() {
            return Err(BracingError::invalid_input(
                "wind",
                "{}",
                "At least one rating is required",
            ));
        }

        let mut wind_keys: Vec<&String> = self.wind.keys().collect();
        let mut eq_keys: Vec<&String> = self.eq.keys().collect();
        wind_keys.sort();
        eq_keys.sort();
        if wind_keys != eq_keys {
            return Err(BracingError::invalid_input(
                "eq",
                format!("{:?}", self.eq.keys().collect::<Vec<_>>()),
                "Wind and EQ must declare the same keys",
            ));
        }

        if self.is_number_based() {
            if self.wind.len() != 1 {
                return Err(BracingError::invalid_input(
                    "wind",
                    format!("{:?}", self.wind.keys().collect::<Vec<_>>()),
                    "Number-based bracing takes only the n_1 rating",
                ));
            }
        } else {
            for key in self.wind.keys() {
                if key.parse::<f64>().map(|v| !v.is_finite()).unwrap_or(true) {
                    return Err(BracingError::invalid_input(
                        "key",
                        key.clone(),
                        "Length keys must be numbers",
                    ));
                }
            }
        }

        for (field, table) in [("wind", &self.wind), ("eq", &self.eq)] {
            if let Some((key, value)) = table.iter().find(|(_, v)| !v.is_finite()) {
                return Err(BracingError::invalid_input(
                    format!("{}.{}", field, key),
                    value.to_string(),
                    "Rating must be a finite number",
                ));
            }
        }

        Ok(())
    }

    /// Catalog representation of this entry.
    pub fn to_bracing_type(&self) -> BracingType {
        BracingType {
            name: self.name.clone(),
            wind: RatingTable::from_pairs(self.wind.iter().map(|(k, v)| (k.clone(), Some(*v)))),
            eq: RatingTable::from_pairs(self.eq.iter().map(|(k, v)| (k.clone(), Some(*v)))),
        }
    }
}

/// The collection of custom bracing types, unique by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomLibrary(Vec<CustomBracing>);

impl CustomLibrary {
    /// Add a new entry. The name is trimmed before storing.
    ///
    /// Fails if the name is blank, already used, or the entry is malformed.
    pub fn create(&mut self, mut bracing: CustomBracing) -> BracingResult<()> {
        bracing.name = bracing.name.trim().to_string();
        bracing.validate()?;
        if self.get(&bracing.name).is_some() {
            return Err(BracingError::duplicate_name(KIND, bracing.name));
        }
        self.0.push(bracing);
        Ok(())
    }

    /// Replace the ratings of an existing entry, keyed by its trimmed name.
    pub fn update(&mut self, mut bracing: CustomBracing) -> BracingResult<()> {
        bracing.name = bracing.name.trim().to_string();
        bracing.validate()?;
        let slot = self
            .0
            .iter_mut()
            .find(|b| b.name == bracing.name)
            .ok_or_else(|| BracingError::not_found(KIND, bracing.name.clone()))?;
        *slot = bracing;
        Ok(())
    }

    /// Remove an entry by name. Removing an unknown name is a no-op.
    ///
    /// Returns whether an entry was removed.
    pub fn delete(&mut self, name: &str) -> bool {
        let name = name.trim();
        let before = self.0.len();
        self.0.retain(|b| b.name != name);
        before != self.0.len()
    }

    pub fn get(&self, name: &str) -> Option<&CustomBracing> {
        let name = name.trim();
        self.0.iter().find(|b| b.name == name)
    }

    pub fn entries(&self) -> &[CustomBracing] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Overlay custom types onto a base catalog.
///
/// Returns a new catalog; `base` is never modified. Custom entries are
/// appended to the [`CUSTOM_SYSTEM`] system after its existing types. If
/// the base has no such system, one is added at the end.
pub fn merge_catalog(base: &BracingData, custom: &[CustomBracing]) -> BracingData {
    let mut merged = base.clone();
    let custom_types = custom.iter().map(CustomBracing::to_bracing_type);

    match merged.systems.iter_mut().find(|s| s.name == CUSTOM_SYSTEM) {
        Some(system) => system.types.extend(custom_types),
        None => merged.systems.push(System {
            name: CUSTOM_SYSTEM.to_string(),
            types: custom_types.collect(),
        }),
    }

    debug!(custom = custom.len(), types = merged.type_count(), "merged custom bracing into catalog");
    merged
}
