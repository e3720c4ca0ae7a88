//! # routewatch - routing-table change detection
//!
//! routewatch polls network devices' routing tables, diffs each
//! observation against the previously persisted snapshot, and reports a
//! deterministic changeset of additions, modifications, and removals.
//! The latest observation is durably persisted so the next cycle has a
//! baseline to diff against.
//!
//! ## Core Concepts
//!
//! - **RouteTable**: one full observation of a device's routing table
//! - **ChangeSet**: Added/Modified/Removed records between two tables,
//!   or the initial-capture marker when no baseline existed
//! - **SnapshotStore**: per-device persistence of the last observation
//! - **MonitorSession**: one fetch-load-diff-persist-report cycle
//!
//! Device transport and configuration loading stay behind the
//! [`DeviceConnector`], [`DeviceSource`], and [`ObjectStore`] traits;
//! the core is synchronous, stateless between checks, and reentrant
//! across distinct devices.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use routewatch::{run_batch, MonitorConfig, SessionConfig};
//! use routewatch::storage::MemoryObjectStore;
//!
//! let config = MonitorConfig::from_json(config_json)?;
//! let summary = run_batch(
//!     &config,
//!     &my_connector,
//!     Arc::new(MemoryObjectStore::new()),
//!     SessionConfig::default(),
//! )?;
//! for result in &summary.results {
//!     println!("{}: {:?}", result.device, result.changes());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod diff;
pub mod error;
pub mod route;
pub mod runner;
pub mod session;
pub mod snapshot;
pub mod source;
pub mod storage;
pub mod table;

// Re-export primary types at crate root for convenience
pub use config::{DeviceConfig, MonitorConfig};
pub use diff::{diff, ChangeSet, RouteChange};
pub use error::{
    ConfigError, ConnectError, FetchError, MonitorError, MonitorResult, StoreError,
};
pub use route::{AttrValue, RouteKey};
pub use runner::{run_batch, BatchSummary};
pub use session::{CheckOutcome, CheckResult, MonitorSession, SessionConfig};
pub use snapshot::SnapshotStore;
pub use source::{DeviceConnector, DeviceSource, SourceGuard};
pub use storage::{MemoryObjectStore, ObjectStore};
pub use table::RouteTable;

#[cfg(feature = "persistent")]
pub use storage::{FsObjectStore, FsStoreConfig};
