//! One monitoring check for one device.
//!
//! `MonitorSession` drives the per-check state machine: fetch the
//! current table, load the previous snapshot, diff, persist, report.
//! Every per-device failure is converted into a `CheckResult` here;
//! nothing escapes as an error to the caller, and the device handle is
//! released exactly once on every path.

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::diff::{diff, ChangeSet};
use crate::snapshot::SnapshotStore;
use crate::source::{DeviceSource, SourceGuard};

/// Per-check policy knobs.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Treat a snapshot-write failure as a check failure.
    ///
    /// Off by default: a post-diff persistence failure degrades into a
    /// successful result carrying the computed changes plus a warning,
    /// since failing the check would mask real, already-detected route
    /// changes. The cost is that the next cycle may re-report them.
    pub fail_on_persist_error: bool,
}

/// Outcome of one device check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// The check completed; `changes` may be the initial-capture
    /// marker, empty, or a list of detected changes.
    Success {
        changes: ChangeSet,
        /// Present when the snapshot write failed but the check still
        /// succeeded (see [`SessionConfig::fail_on_persist_error`]).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        persist_warning: Option<String>,
    },
    /// The check failed; no changes are reported.
    Error { message: String },
}

/// Per-device result returned to the batch caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Device identifier the check ran against.
    pub device: String,
    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

impl CheckResult {
    /// Builds a successful result.
    #[must_use]
    pub fn success(device: impl Into<String>, changes: ChangeSet) -> Self {
        Self {
            device: device.into(),
            outcome: CheckOutcome::Success {
                changes,
                persist_warning: None,
            },
        }
    }

    /// Builds an error result.
    #[must_use]
    pub fn error(device: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            outcome: CheckOutcome::Error {
                message: message.into(),
            },
        }
    }

    /// Returns true if the check completed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.outcome, CheckOutcome::Success { .. })
    }

    /// Returns the changeset if the check completed.
    #[must_use]
    pub fn changes(&self) -> Option<&ChangeSet> {
        match &self.outcome {
            CheckOutcome::Success { changes, .. } => Some(changes),
            CheckOutcome::Error { .. } => None,
        }
    }
}

/// Runs single checks against a snapshot store.
///
/// Stateless between checks and safe to share across concurrent checks
/// for distinct devices; checks for the same device must be serialized
/// by the caller.
#[derive(Clone)]
pub struct MonitorSession {
    snapshots: SnapshotStore,
    config: SessionConfig,
}

impl MonitorSession {
    /// Creates a session with default policy.
    #[must_use]
    pub fn new(snapshots: SnapshotStore) -> Self {
        Self::with_config(snapshots, SessionConfig::default())
    }

    /// Creates a session with an explicit policy.
    #[must_use]
    pub fn with_config(snapshots: SnapshotStore, config: SessionConfig) -> Self {
        Self { snapshots, config }
    }

    /// Performs one check for `device` against an already-open source.
    ///
    /// Steps: fetch current table, load previous snapshot, diff,
    /// persist current table, report. A fetch failure returns an error
    /// result before any store access. A snapshot *read* failure is
    /// fatal for the check; a *write* failure follows
    /// [`SessionConfig::fail_on_persist_error`]. The source is closed
    /// on every path, exactly once. No retries happen here.
    pub fn check_once(&self, device: &str, source: Box<dyn DeviceSource>) -> CheckResult {
        let mut source = SourceGuard::new(source);

        let current = match source.fetch_table() {
            Ok(table) => table,
            Err(e) => {
                error!(device, error = %e, "route fetch failed");
                return CheckResult::error(device, "failed to fetch routes");
            }
        };
        source.close();

        let previous = match self.snapshots.load(device) {
            Ok(previous) => previous,
            Err(e) => {
                error!(device, error = %e, "snapshot load failed");
                return CheckResult::error(device, e.to_string());
            }
        };

        let changes = diff(previous.as_ref(), &current);

        // Persist the observation whether or not anything changed, so
        // the next cycle diffs against what was actually seen.
        let persist_warning = match self.snapshots.save(device, &current) {
            Ok(()) => None,
            Err(e) if self.config.fail_on_persist_error => {
                error!(device, error = %e, "snapshot save failed");
                return CheckResult::error(device, e.to_string());
            }
            Err(e) => {
                warn!(
                    device,
                    error = %e,
                    "snapshot save failed; next check may re-report these changes"
                );
                Some(e.to_string())
            }
        };

        info!(
            device,
            routes = current.len(),
            initial = changes.is_initial_capture(),
            changed = changes.changes().map_or(0, |c| c.len()),
            "check complete"
        );

        CheckResult {
            device: device.to_string(),
            outcome: CheckOutcome::Success {
                changes,
                persist_warning,
            },
        }
    }
}
