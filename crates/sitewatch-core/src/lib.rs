//! Sitewatch Core - Domain models and shared facilities
//!
//! This crate provides the foundational pieces of the announcement watcher:
//! - Entry and ChangeRecord models with serde support
//! - Content fingerprinting for change detection
//! - Error taxonomy with stable codes
//! - Typed configuration with documented defaults
//! - Collaborator contracts for acquisition and notification
//! - Change-digest rendering for notifications and the CLI
//! - Logging initialization profiles

pub mod config;
pub mod errors;
pub mod fingerprint;
pub mod logging;
pub mod model;
pub mod notify;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use config::{NotifySettings, Settings};
pub use errors::{Result, WatchError};
pub use fingerprint::fingerprint;
pub use model::{ChangeKind, ChangeRecord, Entry, ScanStatus};
pub use notify::{Notifier, NoopNotifier};
pub use source::{Acquirer, RawEntry};
