//! Typed configuration with documented defaults
//!
//! Replaces the loose settings map of earlier iterations with an explicit
//! record; every field has a named default and a validation rule.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, WatchError};

/// Default recurring-scan interval in seconds
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 600;

/// Default notification transport port
pub const DEFAULT_NOTIFY_PORT: u16 = 587;

/// Watcher configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds between recurring scans; re-read at the start of every
    /// scheduler sleep cycle, so a change takes effect on the next cycle
    pub refresh_interval_secs: u64,

    /// Whether the recurring schedule triggers scans at all
    pub scan_enabled: bool,

    /// Notification settings, opaque to the core beyond being passed
    /// through to the notification collaborator
    pub notify: NotifySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            scan_enabled: true,
            notify: NotifySettings::default(),
        }
    }
}

impl Settings {
    /// Validate field constraints
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the refresh interval is zero or a
    /// notification field required by `notify.enabled` is missing.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_secs == 0 {
            return Err(WatchError::InvalidConfig {
                reason: "refresh_interval_secs must be at least 1".to_string(),
            });
        }
        if self.notify.enabled {
            if self.notify.sender.is_empty() {
                return Err(WatchError::InvalidConfig {
                    reason: "notify.sender is required when notifications are enabled"
                        .to_string(),
                });
            }
            if self.notify.recipients.is_empty() {
                return Err(WatchError::InvalidConfig {
                    reason: "notify.recipients is required when notifications are enabled"
                        .to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Notification delivery settings
///
/// Consumed by the notification collaborator; the engine only checks
/// `enabled` before invoking it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifySettings {
    /// Whether change notifications are delivered at all (default false)
    pub enabled: bool,

    /// Sender address handed to the delivery mechanism
    pub sender: String,

    /// Recipient addresses
    pub recipients: Vec<String>,

    /// Delivery server host
    pub server: String,

    /// Delivery server port (default 587)
    pub port: u16,

    /// Transport credentials
    pub username: String,
    pub password: String,
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            sender: String::new(),
            recipients: Vec::new(),
            server: String::new(),
            port: DEFAULT_NOTIFY_PORT,
            username: String::new(),
            password: String::new(),
        }
    }
}
