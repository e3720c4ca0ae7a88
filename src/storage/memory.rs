//! In-memory object storage backend.
//!
//! Thread-safe map-backed implementation of [`ObjectStore`]. Intended
//! for tests, embedded usage, and as a reference implementation of the
//! contract.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::StoreError;
use crate::storage::traits::ObjectStore;

fn lock_err(key: &str) -> StoreError {
    StoreError::Backend {
        key: key.to_string(),
        message: "poisoned lock".to_string(),
    }
}

/// Map-backed [`ObjectStore`].
///
/// Writes replace the whole value under the write lock, so readers
/// observe either the old blob or the new one, never a mixture.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    ///
    /// # Errors
    /// Returns `StoreError::Backend` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.blobs.read().map_err(|_| lock_err("<len>"))?.len())
    }

    /// Returns true if no key has ever been written.
    ///
    /// # Errors
    /// Returns `StoreError::Backend` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl ObjectStore for MemoryObjectStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let blobs = self.blobs.read().map_err(|_| lock_err(key))?;
        Ok(blobs.get(key).cloned())
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let mut blobs = self.blobs.write().map_err(|_| lock_err(key))?;
        blobs.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
