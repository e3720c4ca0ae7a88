//! Abstract object-storage trait backing the snapshot store.
//!
//! By using a trait, we enable:
//! - In-memory backends for testing and embedded use
//! - Durable filesystem backends for production
//! - Remote object stores (S3-style) behind the same contract

use crate::error::StoreError;

/// Key-addressed byte-blob storage.
///
/// The contract distinguishes "never written" from failure: `get`
/// returns `Ok(None)` for a key that has no value, and reserves
/// `Err(StoreError)` for transport, permission, and corruption
/// failures. `put` fully replaces any prior value and must be atomic
/// from a reader's perspective: a concurrent `get` observes either the
/// old blob or the new one, never a partial write.
///
/// Implementations must be safe to share across threads; checks for
/// distinct keys never contend. Concurrent writers to the *same* key
/// are not coordinated here and must be serialized by the caller.
pub trait ObjectStore: Send + Sync {
    /// Fetches the blob stored at `key`, or `None` if never written.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stores `bytes` at `key`, replacing any prior value.
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;
}
