//! Error helpers for sitewatch-store
//!
//! Maps storage-layer failures onto the core WatchError taxonomy. No
//! persistence error is swallowed here; everything propagates.

use sitewatch_core::WatchError;

/// Create a persistence error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> WatchError {
    WatchError::Persistence {
        message: err.to_string(),
    }
}

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> WatchError {
    WatchError::Migration {
        migration_id: migration_id.to_string(),
        reason: reason.to_string(),
    }
}
