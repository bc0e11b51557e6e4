use thiserror::Error;

/// Result type alias using WatchError
pub type Result<T> = std::result::Result<T, WatchError>;

/// Error taxonomy for the watcher
///
/// Each variant maps to a stable error code usable for programmatic
/// handling, testing, and external API responses.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WatchError {
    // ===== External Collaborators =====
    /// The acquisition collaborator failed (source unreachable or malformed)
    #[error("Acquisition failed: {message}")]
    Acquisition { message: String },

    /// The notification collaborator failed (logged only, never aborts a scan)
    #[error("Notification failed: {message}")]
    Notification { message: String },

    // ===== Persistence =====
    /// The snapshot store rejected a read or write
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    /// A schema migration failed to apply
    #[error("Migration {migration_id} failed: {reason}")]
    Migration {
        migration_id: String,
        reason: String,
    },

    // ===== Orchestration =====
    /// A scan trigger arrived while a scan was already running
    #[error("A scan is already in progress")]
    ScanInProgress,

    // ===== Configuration =====
    /// A configuration field failed validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Generic =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Filesystem or process I/O error
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl WatchError {
    /// Get the stable error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            WatchError::Acquisition { .. } => "ERR_ACQUISITION",
            WatchError::Notification { .. } => "ERR_NOTIFICATION",
            WatchError::Persistence { .. } => "ERR_PERSISTENCE",
            WatchError::Migration { .. } => "ERR_MIGRATION",
            WatchError::ScanInProgress => "ERR_SCAN_IN_PROGRESS",
            WatchError::InvalidConfig { .. } => "ERR_INVALID_CONFIG",
            WatchError::Serialization { .. } => "ERR_SERIALIZATION",
            WatchError::Io { .. } => "ERR_IO",
            WatchError::Internal { .. } => "ERR_INTERNAL",
        }
    }

    /// Create an acquisition error from any displayable cause
    pub fn acquisition(message: impl Into<String>) -> Self {
        WatchError::Acquisition {
            message: message.into(),
        }
    }

    /// Create a persistence error from any displayable cause
    pub fn persistence(message: impl Into<String>) -> Self {
        WatchError::Persistence {
            message: message.into(),
        }
    }

    /// Create a notification error from any displayable cause
    pub fn notification(message: impl Into<String>) -> Self {
        WatchError::Notification {
            message: message.into(),
        }
    }
}

/// Conversion from serde_json::Error to WatchError
impl From<serde_json::Error> for WatchError {
    fn from(err: serde_json::Error) -> Self {
        WatchError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from std::io::Error to WatchError
impl From<std::io::Error> for WatchError {
    fn from(err: std::io::Error) -> Self {
        WatchError::Io {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_stable() {
        let cases = [
            (WatchError::acquisition("x"), "ERR_ACQUISITION"),
            (WatchError::persistence("x"), "ERR_PERSISTENCE"),
            (WatchError::ScanInProgress, "ERR_SCAN_IN_PROGRESS"),
            (WatchError::notification("x"), "ERR_NOTIFICATION"),
        ];
        for (err, expected_code) in cases {
            assert_eq!(err.code(), expected_code, "Wrong code for {:?}", err);
        }
    }

    #[test]
    fn test_display_includes_message() {
        let err = WatchError::acquisition("browser timed out");
        assert!(err.to_string().contains("browser timed out"));
    }

    #[test]
    fn test_scan_in_progress_is_not_internal() {
        // A concurrency rejection is a signal to the caller, not an error state
        assert_ne!(
            WatchError::ScanInProgress.code(),
            WatchError::Internal {
                message: String::new()
            }
            .code()
        );
    }
}
