//! Routing-table observations.
//!
//! A `RouteTable` is one full observation of a device's routing table at
//! a point in time: an ordered sequence of `(RouteKey, AttrValue)` pairs.
//! Order is preserved through serialization so that persisted snapshots
//! reproduce the observation exactly; diff semantics themselves are
//! order-independent over keys.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::route::{AttrValue, RouteKey};

/// One full routing-table observation.
///
/// Keys are expected to be unique within a table. When a device reports
/// duplicates anyway, lookups resolve to the last occurrence, matching
/// construction order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTable {
    entries: Vec<(RouteKey, AttrValue)>,
}

impl RouteTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table from an ordered sequence of pairs.
    #[must_use]
    pub fn from_entries(entries: Vec<(RouteKey, AttrValue)>) -> Self {
        Self { entries }
    }

    /// Appends one route record, preserving insertion order.
    pub fn push(&mut self, key: impl Into<RouteKey>, attrs: impl Into<AttrValue>) {
        self.entries.push((key.into(), attrs.into()));
    }

    /// Number of records in the observation (duplicates included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the observation holds no records.
    ///
    /// An empty table is a valid observation and is distinct from an
    /// absent snapshot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates records in observation order.
    pub fn iter(&self) -> impl Iterator<Item = &(RouteKey, AttrValue)> {
        self.entries.iter()
    }

    /// Builds a key-to-attributes lookup, last occurrence wins.
    #[must_use]
    pub fn lookup(&self) -> HashMap<&RouteKey, &AttrValue> {
        let mut map = HashMap::with_capacity(self.entries.len());
        for (key, attrs) in &self.entries {
            map.insert(key, attrs);
        }
        map
    }
}

impl FromIterator<(RouteKey, AttrValue)> for RouteTable {
    fn from_iter<I: IntoIterator<Item = (RouteKey, AttrValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a (RouteKey, AttrValue);
    type IntoIter = std::slice::Iter<'a, (RouteKey, AttrValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
