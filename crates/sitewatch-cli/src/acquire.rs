//! Shell-command acquisition
//!
//! Delegates content extraction to an external command (a headless-browser
//! script, a curl pipeline, a fixture cat in tests) whose stdout is a JSON
//! array of entries:
//!
//! ```json
//! [{"title": "...", "date_label": "...", "link": "..."}]
//! ```

use std::process::Command;

use sitewatch_core::{Acquirer, RawEntry, Result, WatchError};

/// Acquirer that runs a shell command and parses its stdout
#[derive(Debug)]
pub struct ExecAcquirer {
    command: String,
}

impl ExecAcquirer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Acquirer for ExecAcquirer {
    fn acquire(&self) -> Result<Vec<RawEntry>> {
        tracing::debug!(command = %self.command, "running fetch command");

        let output = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .output()
            .map_err(|e| {
                WatchError::acquisition(format!("failed to run fetch command: {}", e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WatchError::acquisition(format!(
                "fetch command exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let entries: Vec<RawEntry> = serde_json::from_slice(&output.stdout).map_err(|e| {
            WatchError::acquisition(format!("fetch command output is not an entry array: {}", e))
        })?;

        tracing::debug!(entries = entries.len(), "fetch command finished");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_entry_array() {
        let acquirer = ExecAcquirer::new(
            r#"printf '[{"title":"A","date_label":"2024-01-01","link":"id1"}]'"#,
        );
        let entries = acquirer.acquire().unwrap();
        assert_eq!(entries, vec![RawEntry::new("A", "2024-01-01", "id1")]);
    }

    #[test]
    fn test_empty_array_is_valid() {
        let acquirer = ExecAcquirer::new("printf '[]'");
        assert!(acquirer.acquire().unwrap().is_empty());
    }

    #[test]
    fn test_nonzero_exit_is_acquisition_error() {
        let acquirer = ExecAcquirer::new("printf 'boom' >&2; exit 3");
        let err = acquirer.acquire().unwrap_err();
        assert_eq!(err.code(), "ERR_ACQUISITION");
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_malformed_output_is_acquisition_error() {
        let acquirer = ExecAcquirer::new("printf 'not json'");
        let err = acquirer.acquire().unwrap_err();
        assert_eq!(err.code(), "ERR_ACQUISITION");
    }
}
