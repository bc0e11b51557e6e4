//! CLI command implementations

pub mod changes;
pub mod entries;
pub mod scan;
pub mod settings;
pub mod status;
pub mod watch;

use clap::Args;
use sitewatch_store::SnapshotStore;

/// Snapshot store location shared by every command
#[derive(Debug, Args)]
pub struct DbArgs {
    /// Snapshot store path
    #[arg(long, default_value = ".sitewatch/watch.db")]
    pub db: String,
}

/// Open the store, creating its parent directory when missing
pub(crate) fn open_store(db: &str) -> Result<SnapshotStore, Box<dyn std::error::Error>> {
    if let Some(parent) = std::path::Path::new(db).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(SnapshotStore::open(db)?)
}
