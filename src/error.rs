//! Error types for routewatch.
//!
//! All errors are strongly typed using thiserror. Each stage of a check
//! has its own error enum so callers can pattern-match on the outcome
//! kind instead of inspecting sentinel values. Per-device errors are
//! converted into `CheckResult` entries at the session boundary; only
//! configuration errors abort a whole batch.

use std::io;

use thiserror::Error;

/// Configuration errors. Fatal for the whole batch: no devices are
/// processed when one of these is raised.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("device list is empty")]
    NoDevices,

    #[error("storage prefix cannot be empty")]
    EmptyStoragePrefix,

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Connection-stage errors for a single device.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("device {host} is not reachable")]
    Unreachable { host: String },

    #[error("failed to open session to {host}: {message}")]
    SessionFailed { host: String, message: String },
}

/// Table retrieval failed on an already-connected device.
#[derive(Debug, Error)]
#[error("failed to fetch routes from {host}: {message}")]
pub struct FetchError {
    /// Device the fetch was issued against.
    pub host: String,
    /// Transport- or device-level detail.
    pub message: String,
}

impl FetchError {
    /// Creates a fetch error for `host`.
    #[must_use]
    pub fn new(host: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            message: message.into(),
        }
    }
}

/// Snapshot storage errors.
///
/// Every variant carries the object key it failed on. An absent
/// snapshot is *not* an error: stores report it as `Ok(None)`, and
/// none of these variants may be used to encode it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend rejected or failed the operation.
    #[error("storage backend error for {key}: {message}")]
    Backend { key: String, message: String },

    /// Underlying I/O failure (filesystem, network).
    #[error("storage I/O error for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    /// Stored bytes exist but could not be decoded.
    #[error("corrupted snapshot at {key}: {detail}")]
    Corrupted { key: String, detail: String },

    /// Table could not be serialized for storage.
    #[error("failed to serialize snapshot for {key}: {message}")]
    Serialize { key: String, message: String },
}

impl StoreError {
    /// Returns the object key this error refers to.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Backend { key, .. }
            | Self::Io { key, .. }
            | Self::Corrupted { key, .. }
            | Self::Serialize { key, .. } => key,
        }
    }
}

/// Top-level error type for routewatch.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("connection error: {0}")]
    Connect(#[from] ConnectError),

    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl MonitorError {
    /// Returns true if this error aborts a whole batch rather than a
    /// single device check.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns true if this is a storage error.
    #[must_use]
    pub const fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

/// Result type alias for routewatch operations.
pub type MonitorResult<T> = Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_carries_key() {
        let err = StoreError::Backend {
            key: "route-states/edge-1/previous_routes".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(err.key(), "route-states/edge-1/previous_routes");
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::new("edge-1", "rpc timed out");
        let msg = err.to_string();
        assert!(msg.contains("edge-1"));
        assert!(msg.contains("rpc timed out"));
    }

    #[test]
    fn test_only_config_errors_are_fatal() {
        let config: MonitorError = ConfigError::NoDevices.into();
        assert!(config.is_fatal());

        let connect: MonitorError = ConnectError::Unreachable {
            host: "edge-1".to_string(),
        }
        .into();
        assert!(!connect.is_fatal());

        let store: MonitorError = StoreError::Backend {
            key: "k".to_string(),
            message: "m".to_string(),
        }
        .into();
        assert!(store.is_store());
        assert!(!store.is_fatal());
    }
}
