//! Foreground watch command
//!
//! Runs one immediate scan, then hands off to the recurring scheduler and
//! stays in the foreground until the process is killed.

use std::sync::Arc;

use clap::Args;
use sitewatch_engine::ScanOrchestrator;

use crate::acquire::ExecAcquirer;
use crate::notify::LogNotifier;

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Shell command whose stdout is a JSON array of entries
    #[arg(long)]
    pub fetch_cmd: String,

    #[command(flatten)]
    pub db: super::DbArgs,
}

pub fn execute(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(&args.db.db)?;
    let orchestrator = Arc::new(ScanOrchestrator::new(
        store,
        Box::new(ExecAcquirer::new(args.fetch_cmd)),
        Box::new(LogNotifier),
    )?);

    // First pass fires immediately; a failure is recorded and the loop
    // still starts
    if let Err(e) = orchestrator.try_scan() {
        tracing::warn!(error = %e, "initial scan failed");
    }

    let interval = orchestrator.settings().refresh_interval_secs;
    println!("Watching every {} second(s); press Ctrl-C to stop", interval);

    let _scheduler = sitewatch_engine::spawn(Arc::clone(&orchestrator));
    loop {
        std::thread::park();
    }
}
