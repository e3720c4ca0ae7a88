//! Per-device snapshot persistence.
//!
//! The snapshot store owns two things on top of a raw [`ObjectStore`]:
//! the key convention addressing each device's last observation, and
//! the serialization of routing tables to bytes. Serialization is
//! canonical JSON via serde and round-trips exactly, preserving pair
//! order, so the next check diffs against precisely what was observed.

use std::sync::Arc;

use crate::error::StoreError;
use crate::storage::ObjectStore;
use crate::table::RouteTable;

/// Filename component under each device's key prefix.
///
/// Other tooling relies on the resulting `{prefix}/{device}/previous_routes`
/// layout; treat it as a stable convention.
const SNAPSHOT_OBJECT: &str = "previous_routes";

/// Loads and saves the last-known routing table per device.
///
/// Cheap to clone; safe to share across concurrent checks for distinct
/// devices. Checks for the same device must be serialized by the
/// caller, as the underlying store only guarantees atomic single-writer
/// replace.
#[derive(Clone)]
pub struct SnapshotStore {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl SnapshotStore {
    /// Creates a snapshot store over `store`, keyed under `prefix`.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Object key for a device's snapshot.
    #[must_use]
    pub fn key_for(&self, device: &str) -> String {
        format!("{}/{}/{}", self.prefix, device, SNAPSHOT_OBJECT)
    }

    /// Loads the previously persisted table for `device`.
    ///
    /// `Ok(None)` means no snapshot has ever been written — the
    /// expected state on a device's first check. Decode failures on an
    /// existing blob surface as `StoreError::Corrupted`; they are never
    /// folded into the absent case.
    pub fn load(&self, device: &str) -> Result<Option<RouteTable>, StoreError> {
        let key = self.key_for(device);
        let Some(bytes) = self.store.get(&key)? else {
            return Ok(None);
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::Corrupted {
                key,
                detail: e.to_string(),
            })
    }

    /// Persists `table` as the new snapshot for `device`, fully
    /// replacing any prior value.
    pub fn save(&self, device: &str, table: &RouteTable) -> Result<(), StoreError> {
        let key = self.key_for(device);
        let bytes = serde_json::to_vec(table).map_err(|e| StoreError::Serialize {
            key: key.clone(),
            message: e.to_string(),
        })?;
        self.store.put(&key, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{AttrValue, RouteKey};
    use crate::storage::MemoryObjectStore;

    fn snapshots() -> SnapshotStore {
        SnapshotStore::new(Arc::new(MemoryObjectStore::new()), "route-states")
    }

    fn table(pairs: &[(&str, &str)]) -> RouteTable {
        pairs
            .iter()
            .map(|(k, v)| (RouteKey::from(*k), AttrValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_key_convention() {
        let store = snapshots();
        assert_eq!(store.key_for("edge-1"), "route-states/edge-1/previous_routes");
    }

    #[test]
    fn test_load_before_first_save_is_absent() {
        let store = snapshots();
        assert_eq!(store.load("edge-1").unwrap(), None);
    }

    #[test]
    fn test_save_then_load_round_trips_exactly() {
        let store = snapshots();
        let t = table(&[
            ("10.0.1.0/24", "nh=B"),
            ("10.0.0.0/24", "nh=A"),
        ]);

        store.save("edge-1", &t).unwrap();
        assert_eq!(store.load("edge-1").unwrap(), Some(t));
    }

    #[test]
    fn test_save_is_idempotent() {
        let store = snapshots();
        let t = table(&[("10.0.0.0/24", "nh=A")]);

        store.save("edge-1", &t).unwrap();
        store.save("edge-1", &t).unwrap();
        assert_eq!(store.load("edge-1").unwrap(), Some(t));
    }

    #[test]
    fn test_save_replaces_prior_snapshot() {
        let store = snapshots();
        store.save("edge-1", &table(&[("10.0.0.0/24", "nh=A")])).unwrap();

        let newer = table(&[("10.0.1.0/24", "nh=B")]);
        store.save("edge-1", &newer).unwrap();
        assert_eq!(store.load("edge-1").unwrap(), Some(newer));
    }

    #[test]
    fn test_devices_do_not_share_snapshots() {
        let store = snapshots();
        store.save("edge-1", &table(&[("10.0.0.0/24", "nh=A")])).unwrap();
        assert_eq!(store.load("edge-2").unwrap(), None);
    }

    #[test]
    fn test_undecodable_blob_is_corruption_not_absent() {
        let backing = Arc::new(MemoryObjectStore::new());
        let store = SnapshotStore::new(backing.clone(), "route-states");
        backing
            .put("route-states/edge-1/previous_routes", b"not json")
            .unwrap();

        match store.load("edge-1") {
            Err(StoreError::Corrupted { key, .. }) => {
                assert_eq!(key, "route-states/edge-1/previous_routes");
            }
            other => panic!("expected corruption error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_table_is_a_snapshot_distinct_from_absent() {
        let store = snapshots();
        store.save("edge-1", &RouteTable::new()).unwrap();

        let loaded = store.load("edge-1").unwrap();
        assert_eq!(loaded, Some(RouteTable::new()));
        assert!(loaded.unwrap().is_empty());
    }
}
