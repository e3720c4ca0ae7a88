//! Routing-table comparison.
//!
//! `diff` computes a minimal changeset between the previously persisted
//! observation and the current one. It is a pure function: it never
//! touches the snapshot store, which keeps it testable in isolation and
//! leaves persistence ordering to the session.

use serde::{Deserialize, Serialize};

use crate::route::{AttrValue, RouteKey};
use crate::table::RouteTable;

/// One detected difference between two observations.
///
/// Change records are produced only by comparison and are never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteChange {
    /// Key present in the current table but not the previous one.
    Added {
        key: RouteKey,
        attrs: AttrValue,
    },
    /// Key present in both tables with structurally different attributes.
    Modified {
        key: RouteKey,
        previous: AttrValue,
        current: AttrValue,
    },
    /// Key present in the previous table but not the current one.
    Removed {
        key: RouteKey,
    },
}

impl RouteChange {
    /// Returns the route key this change refers to.
    #[must_use]
    pub fn key(&self) -> &RouteKey {
        match self {
            Self::Added { key, .. } | Self::Modified { key, .. } | Self::Removed { key } => key,
        }
    }

    /// Renders the change as a one-line human-readable description.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Added { key, attrs } => format!("route added: {key} -> {attrs}"),
            Self::Modified { key, previous, current } => {
                format!("route modified: {key}: {previous} -> {current}")
            }
            Self::Removed { key } => format!("route removed: {key}"),
        }
    }
}

/// Outcome of comparing two observations.
///
/// The first successful check for a device has nothing to compare
/// against; that state is the distinct `InitialCapture` marker, never an
/// empty change list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ChangeSet {
    /// No prior snapshot existed; the current table is the baseline.
    InitialCapture,
    /// Comparison ran; the list may be empty.
    Changes { changes: Vec<RouteChange> },
}

impl ChangeSet {
    /// Returns true if comparison ran and found nothing.
    ///
    /// `InitialCapture` is not empty: no comparison was possible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Changes { changes } if changes.is_empty())
    }

    /// Returns true if this is the initial-capture marker.
    #[must_use]
    pub const fn is_initial_capture(&self) -> bool {
        matches!(self, Self::InitialCapture)
    }

    /// Returns the change records, if comparison ran.
    #[must_use]
    pub fn changes(&self) -> Option<&[RouteChange]> {
        match self {
            Self::InitialCapture => None,
            Self::Changes { changes } => Some(changes),
        }
    }

    /// Renders the changeset as human-readable lines.
    #[must_use]
    pub fn describe(&self) -> Vec<String> {
        match self {
            Self::InitialCapture => vec!["initial routing table captured".to_string()],
            Self::Changes { changes } => changes.iter().map(RouteChange::describe).collect(),
        }
    }
}

/// Compares the previous observation against the current one.
///
/// `None` for `previous` means no snapshot has ever been persisted for
/// this device and yields `ChangeSet::InitialCapture`, even when
/// `current` is empty. Otherwise:
///
/// - keys only in `current` become `Added`,
/// - keys in both with unequal attributes become `Modified`,
/// - keys only in `previous` become `Removed`.
///
/// Attribute equality is deep structural equality ([`AttrValue`]
/// normalizes composite field order on construction). Duplicate keys
/// within a table resolve last-occurrence-wins, and each distinct key
/// produces at most one record. Output order is deterministic: added
/// and modified records follow `current` table order, removed records
/// follow `previous` table order.
#[must_use]
pub fn diff(previous: Option<&RouteTable>, current: &RouteTable) -> ChangeSet {
    let Some(previous) = previous else {
        return ChangeSet::InitialCapture;
    };

    let previous_lookup = previous.lookup();
    let current_lookup = current.lookup();
    let mut changes = Vec::new();

    let mut seen = std::collections::HashSet::with_capacity(current.len());
    for (key, _) in current {
        if !seen.insert(key) {
            continue;
        }
        // Attrs come from the lookup so duplicates resolve last-wins.
        let attrs = current_lookup[key];
        match previous_lookup.get(key) {
            None => changes.push(RouteChange::Added {
                key: key.clone(),
                attrs: attrs.clone(),
            }),
            Some(prev_attrs) if *prev_attrs != attrs => changes.push(RouteChange::Modified {
                key: key.clone(),
                previous: (*prev_attrs).clone(),
                current: attrs.clone(),
            }),
            Some(_) => {}
        }
    }

    let mut seen_removed = std::collections::HashSet::with_capacity(previous.len());
    for (key, _) in previous {
        if !seen_removed.insert(key) {
            continue;
        }
        if !current_lookup.contains_key(key) {
            changes.push(RouteChange::Removed { key: key.clone() });
        }
    }

    ChangeSet::Changes { changes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn table(pairs: &[(&str, &str)]) -> RouteTable {
        pairs
            .iter()
            .map(|(k, v)| (RouteKey::from(*k), AttrValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_absent_previous_is_initial_capture() {
        let current = table(&[("10.0.0.0/24", "nh=A")]);
        let result = diff(None, &current);
        assert!(result.is_initial_capture());
        assert!(!result.is_empty());
    }

    #[test]
    fn test_absent_previous_with_empty_current_is_still_initial_capture() {
        let result = diff(None, &RouteTable::new());
        assert_eq!(result, ChangeSet::InitialCapture);
    }

    #[test]
    fn test_identical_tables_yield_empty_changeset() {
        let t = table(&[("10.0.0.0/24", "nh=A"), ("10.0.1.0/24", "nh=B")]);
        let result = diff(Some(&t), &t);
        assert!(result.is_empty());
        assert!(!result.is_initial_capture());
    }

    #[test]
    fn test_modified_route_detected() {
        let previous = table(&[("10.0.0.0/24", "nh=A")]);
        let current = table(&[("10.0.0.0/24", "nh=B")]);

        let result = diff(Some(&previous), &current);
        assert_eq!(
            result.changes().unwrap(),
            &[RouteChange::Modified {
                key: RouteKey::from("10.0.0.0/24"),
                previous: AttrValue::from("nh=A"),
                current: AttrValue::from("nh=B"),
            }]
        );
    }

    #[test]
    fn test_removed_route_detected() {
        let previous = table(&[("10.0.0.0/24", "nh=A")]);
        let current = RouteTable::new();

        let result = diff(Some(&previous), &current);
        assert_eq!(
            result.changes().unwrap(),
            &[RouteChange::Removed {
                key: RouteKey::from("10.0.0.0/24"),
            }]
        );
    }

    #[test]
    fn test_added_routes_detected_in_current_order() {
        let previous = RouteTable::new();
        let current = table(&[("10.0.0.0/24", "nh=A"), ("10.0.1.0/24", "nh=A")]);

        let result = diff(Some(&previous), &current);
        let changes = result.changes().unwrap();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].key().as_str(), "10.0.0.0/24");
        assert_eq!(changes[1].key().as_str(), "10.0.1.0/24");
        assert!(matches!(changes[0], RouteChange::Added { .. }));
        assert!(matches!(changes[1], RouteChange::Added { .. }));
    }

    #[test]
    fn test_rebuilt_attrs_with_reordered_fields_are_not_modified() {
        let previous: RouteTable = vec![(
            RouteKey::from("10.0.0.0/24"),
            AttrValue::map([("next-hop", "10.1.1.1"), ("proto", "bgp")]),
        )]
        .into_iter()
        .collect();
        let current: RouteTable = vec![(
            RouteKey::from("10.0.0.0/24"),
            AttrValue::map([("proto", "bgp"), ("next-hop", "10.1.1.1")]),
        )]
        .into_iter()
        .collect();

        assert!(diff(Some(&previous), &current).is_empty());
    }

    #[test]
    fn test_duplicate_keys_resolve_last_wins_and_emit_one_record() {
        let previous = table(&[("10.0.0.0/24", "nh=A")]);
        let current = table(&[("10.0.0.0/24", "nh=stale"), ("10.0.0.0/24", "nh=B")]);

        let result = diff(Some(&previous), &current);
        assert_eq!(
            result.changes().unwrap(),
            &[RouteChange::Modified {
                key: RouteKey::from("10.0.0.0/24"),
                previous: AttrValue::from("nh=A"),
                current: AttrValue::from("nh=B"),
            }]
        );
    }

    #[test]
    fn test_changes_partition_keys_without_overlap() {
        let previous = table(&[
            ("10.0.0.0/24", "nh=A"),
            ("10.0.1.0/24", "nh=A"),
            ("10.0.2.0/24", "nh=A"),
        ]);
        let current = table(&[
            ("10.0.1.0/24", "nh=B"),
            ("10.0.2.0/24", "nh=A"),
            ("10.0.3.0/24", "nh=A"),
        ]);

        let result = diff(Some(&previous), &current);
        let changes = result.changes().unwrap();

        let mut added = HashSet::new();
        let mut modified = HashSet::new();
        let mut removed = HashSet::new();
        for change in changes {
            let inserted = match change {
                RouteChange::Added { key, .. } => added.insert(key.clone()),
                RouteChange::Modified { key, .. } => modified.insert(key.clone()),
                RouteChange::Removed { key } => removed.insert(key.clone()),
            };
            assert!(inserted, "duplicate record for {}", change.key());
        }

        assert_eq!(added, HashSet::from([RouteKey::from("10.0.3.0/24")]));
        assert_eq!(modified, HashSet::from([RouteKey::from("10.0.1.0/24")]));
        assert_eq!(removed, HashSet::from([RouteKey::from("10.0.0.0/24")]));
        // No key appears in more than one record kind.
        assert!(added.is_disjoint(&modified));
        assert!(added.is_disjoint(&removed));
        assert!(modified.is_disjoint(&removed));
    }

    #[test]
    fn test_diff_is_deterministic() {
        let previous = table(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let current = table(&[("b", "2"), ("c", "9"), ("d", "4")]);

        let first = diff(Some(&previous), &current);
        let second = diff(Some(&previous), &current);
        assert_eq!(first, second);
    }

    #[test]
    fn test_describe_initial_capture_and_changes() {
        assert_eq!(
            ChangeSet::InitialCapture.describe(),
            vec!["initial routing table captured".to_string()]
        );

        let previous = table(&[("10.0.0.0/24", "nh=A")]);
        let current = table(&[("10.0.0.0/24", "nh=B")]);
        let lines = diff(Some(&previous), &current).describe();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("route modified"));
        assert!(lines[0].contains("10.0.0.0/24"));
    }

    #[test]
    fn test_changeset_serde_distinguishes_initial_capture() {
        let initial = serde_json::to_value(ChangeSet::InitialCapture).unwrap();
        let empty = serde_json::to_value(ChangeSet::Changes { changes: vec![] }).unwrap();
        assert_ne!(initial, empty);
        assert_eq!(initial["result"], "initial_capture");
        assert_eq!(empty["result"], "changes");
    }
}
