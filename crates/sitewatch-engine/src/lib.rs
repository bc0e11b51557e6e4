//! Sitewatch Engine - Scan orchestration layer
//!
//! Coordinates acquisition, diffing, removal verification, and the
//! recurring schedule on top of the snapshot store:
//! - Diff engine: upserts one acquired pass and collects change records
//! - Removal verifier: guards removal detection against transient
//!   acquisition failures with a bounded single-retry policy
//! - Scan orchestrator: the Idle/Scanning state machine behind one
//!   exclusive lock
//! - Scheduler: the background recurring-scan loop

pub mod diff;
pub mod orchestrator;
pub mod scheduler;
pub mod verifier;

pub use orchestrator::ScanOrchestrator;
pub use scheduler::{spawn, SchedulerHandle};
pub use verifier::{RemovalVerifier, Verified};
