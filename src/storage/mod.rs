//! Storage backends for snapshot persistence.
//!
//! The snapshot store is written against the [`ObjectStore`] trait, so
//! the diffing core never knows which backend holds its state:
//! - [`MemoryObjectStore`] — always available; tests and embedded use
//! - [`FsObjectStore`] — durable filesystem backend (feature `persistent`)

pub mod memory;
pub mod traits;

#[cfg(feature = "persistent")]
pub mod codec;
#[cfg(feature = "persistent")]
pub mod fs;

pub use memory::MemoryObjectStore;
pub use traits::ObjectStore;

#[cfg(feature = "persistent")]
pub use fs::{FsObjectStore, FsStoreConfig};
