//! Monitoring configuration.
//!
//! The core consumes already-resolved values: a device list and a
//! storage prefix. How the JSON got here (parameter store, file,
//! environment) is the caller's concern.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_storage_prefix() -> String {
    "route-states".to_string()
}

/// Credentials and address for one monitored device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Hostname or address; also the device's snapshot identifier.
    #[serde(default)]
    pub hostname: String,
    /// Login username.
    #[serde(default)]
    pub username: String,
    /// Login password.
    #[serde(default)]
    pub password: String,
}

impl DeviceConfig {
    /// Returns true if any required parameter is blank.
    ///
    /// A device failing this yields a per-device error result; it does
    /// not abort the batch.
    #[must_use]
    pub fn has_missing_parameters(&self) -> bool {
        self.hostname.trim().is_empty()
            || self.username.trim().is_empty()
            || self.password.trim().is_empty()
    }
}

/// Resolved configuration for one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Devices to check, in order. One `CheckResult` is produced per entry.
    pub devices: Vec<DeviceConfig>,
    /// Key prefix under which snapshots are stored.
    #[serde(default = "default_storage_prefix")]
    pub storage_prefix: String,
}

impl MonitorConfig {
    /// Parses a configuration from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks batch-level validity.
    ///
    /// Per-device credential problems are deliberately not checked
    /// here: they surface as per-device error results so one bad entry
    /// cannot take down the whole run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.devices.is_empty() {
            return Err(ConfigError::NoDevices);
        }
        if self.storage_prefix.trim().is_empty() {
            return Err(ConfigError::EmptyStoragePrefix);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(host: &str) -> DeviceConfig {
        DeviceConfig {
            hostname: host.to_string(),
            username: "monitor".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn test_from_json_with_defaults() {
        let config = MonitorConfig::from_json(
            r#"{"devices": [{"hostname": "edge-1", "username": "monitor", "password": "secret"}]}"#,
        )
        .unwrap();

        assert_eq!(config.devices.len(), 1);
        assert_eq!(config.storage_prefix, "route-states");
    }

    #[test]
    fn test_partial_device_entry_parses_into_blank_fields() {
        // Incomplete entries stay parseable; the runner turns them into
        // per-device errors instead of failing the whole batch.
        let config = MonitorConfig::from_json(
            r#"{"devices": [{"hostname": "edge-1"}], "storage_prefix": "p"}"#,
        )
        .unwrap();
        assert!(config.devices[0].has_missing_parameters());
    }

    #[test]
    fn test_from_json_rejects_malformed_payload() {
        let err = MonitorConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_device_list_is_fatal() {
        let config = MonitorConfig {
            devices: vec![],
            storage_prefix: "route-states".to_string(),
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoDevices)));
    }

    #[test]
    fn test_blank_storage_prefix_is_fatal() {
        let config = MonitorConfig {
            devices: vec![device("edge-1")],
            storage_prefix: "  ".to_string(),
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyStoragePrefix)));
    }

    #[test]
    fn test_missing_parameters_detected_per_device() {
        let mut incomplete = device("edge-1");
        incomplete.password = String::new();
        assert!(incomplete.has_missing_parameters());
        assert!(!device("edge-2").has_missing_parameters());

        // Batch-level validation still passes; the bad entry is handled
        // per device by the runner.
        let config = MonitorConfig {
            devices: vec![incomplete, device("edge-2")],
            storage_prefix: "route-states".to_string(),
        };
        assert!(config.validate().is_ok());
    }
}
