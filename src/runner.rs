//! Batch entry point.
//!
//! `run_batch` processes every configured device through one
//! `MonitorSession` check and returns a summary sized to the device
//! list. Only configuration problems abort the run; every per-device
//! failure (bad credentials, unreachable, connection refused, check
//! error) becomes that device's `CheckResult`, so operators can tell
//! "some devices misbehaving" from "entire run failed".

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::MonitorConfig;
use crate::error::ConfigError;
use crate::session::{CheckResult, MonitorSession, SessionConfig};
use crate::snapshot::SnapshotStore;
use crate::source::DeviceConnector;
use crate::storage::ObjectStore;

/// Summary of one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// One entry per configured device, in configuration order.
    pub results: Vec<CheckResult>,
    /// When the batch completed.
    pub timestamp: DateTime<Utc>,
    /// Correlates this run across logs and downstream consumers.
    pub run_id: Uuid,
}

impl BatchSummary {
    /// Number of devices whose check completed.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// Number of devices whose check failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

/// Runs one check for every configured device.
///
/// Returns `Err` only for invalid configuration, before any device is
/// touched. Otherwise the summary always contains exactly one result
/// per configured device, even when every single check failed.
///
/// Devices are processed sequentially in configuration order. Callers
/// wanting parallel checks can run one `run_batch` shard per worker;
/// the session and stores are reentrant across distinct devices.
pub fn run_batch(
    config: &MonitorConfig,
    connector: &dyn DeviceConnector,
    store: Arc<dyn ObjectStore>,
    session_config: SessionConfig,
) -> Result<BatchSummary, ConfigError> {
    config.validate()?;

    let run_id = Uuid::new_v4();
    let snapshots = SnapshotStore::new(store, config.storage_prefix.clone());
    let session = MonitorSession::with_config(snapshots, session_config);

    info!(%run_id, devices = config.devices.len(), "batch started");

    let mut results = Vec::with_capacity(config.devices.len());
    for device in &config.devices {
        // A blank hostname still gets a result entry under "unknown".
        let host = if device.hostname.trim().is_empty() {
            "unknown"
        } else {
            device.hostname.as_str()
        };

        if device.has_missing_parameters() {
            warn!(device = host, "skipping device with missing parameters");
            results.push(CheckResult::error(host, "missing required parameters"));
            continue;
        }

        if !connector.probe(device) {
            warn!(device = host, "device not reachable");
            results.push(CheckResult::error(host, "device not reachable"));
            continue;
        }

        match connector.connect(device) {
            Ok(source) => results.push(session.check_once(host, source)),
            Err(e) => {
                warn!(device = host, error = %e, "connection failed");
                results.push(CheckResult::error(host, "connection failed"));
            }
        }
    }

    let summary = BatchSummary {
        results,
        timestamp: Utc::now(),
        run_id,
    };
    info!(
        %run_id,
        succeeded = summary.succeeded(),
        failed = summary.failed(),
        "batch finished"
    );
    Ok(summary)
}
