//! Rating tables: per-unit wind or EQ ratings keyed by length breakpoint
//! or by the number-based sentinel.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Reserved key marking a per-unit (per pile, per portal) rating.
pub const NUMBER_KEY: &str = "n_1";

/// How a rating table's keys are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyRegime {
    /// Keys are element lengths; lookup is a step function
    LengthKeyed,
    /// Single `n_1` key; rating applies per counted unit
    NumberKeyed,
}

/// Mapping from key to nullable rating, in declaration order.
///
/// Declaration order matters: a table is number-keyed only when its
/// *first* key is [`NUMBER_KEY`].
///
/// ## JSON Example
///
/// ```json
/// { "0.4": null, "1.2": 55, "2.4": 60 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingTable(pub IndexMap<String, Option<f64>>);

impl RatingTable {
    /// Build a table from `(key, rating)` pairs, keeping their order.
    pub fn from_pairs<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Option<f64>)>) -> Self {
        RatingTable(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// A number-keyed table holding a single per-unit rating.
    pub fn per_unit(rating: f64) -> Self {
        RatingTable::from_pairs([(NUMBER_KEY, Some(rating))])
    }

    /// Key regime, decided by the first declared key.
    pub fn regime(&self) -> KeyRegime {
        match self.0.keys().next() {
            Some(first) if first == NUMBER_KEY => KeyRegime::NumberKeyed,
            _ => KeyRegime::LengthKeyed,
        }
    }

    pub fn is_number_based(&self) -> bool {
        self.regime() == KeyRegime::NumberKeyed
    }

    /// Rating stored under `key`; `None` if the key is absent or the
    /// rating is null.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied().flatten()
    }

    /// Largest length breakpoint not exceeding `length`.
    ///
    /// Keys are compared numerically, not lexically. Keys that do not parse
    /// as finite numbers are never breakpoints. A `length` below every
    /// breakpoint has no match.
    ///
    /// ```rust
    /// use bracing_core::catalog::RatingTable;
    ///
    /// let table = RatingTable::from_pairs([
    ///     ("2.4", Some(70.0)),
    ///     ("1.2", Some(60.0)),
    ///     ("3.6", Some(80.0)),
    /// ]);
    /// assert_eq!(table.floor_key(3.0), Some("2.4"));
    /// assert_eq!(table.floor_key(3.6), Some("3.6"));
    /// assert_eq!(table.floor_key(1.0), None);
    /// ```
    pub fn floor_key(&self, length: f64) -> Option<&str> {
        let mut breakpoints: Vec<(f64, &str)> = self
            .0
            .keys()
            .filter_map(|key| {
                key.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(|v| (v, key.as_str()))
            })
            .collect();
        breakpoints.sort_by(|a, b| a.0.total_cmp(&b.0));

        breakpoints
            .into_iter()
            .take_while(|(value, _)| *value <= length)
            .last()
            .map(|(_, key)| key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
