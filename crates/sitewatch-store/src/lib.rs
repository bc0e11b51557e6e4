//! Sitewatch Store - Durable SQLite snapshot store
//!
//! Persists the last-known snapshot of every tracked entry, the
//! append-only history of detected changes, the scan-state singleton,
//! and the watcher settings. Schema is applied through embedded,
//! checksummed migrations.

pub mod errors;
pub mod migrations;
pub mod snapshot;

pub use snapshot::SnapshotStore;
