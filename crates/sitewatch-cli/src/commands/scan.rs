//! Single scan command
//!
//! Usage: sitewatch scan --fetch-cmd <CMD> [--db <FILE>]

use clap::Args;
use sitewatch_core::render::change_digest;
use sitewatch_engine::ScanOrchestrator;

use crate::acquire::ExecAcquirer;
use crate::notify::LogNotifier;

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Shell command whose stdout is a JSON array of entries
    #[arg(long)]
    pub fetch_cmd: String,

    #[command(flatten)]
    pub db: super::DbArgs,
}

pub fn execute(args: ScanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(&args.db.db)?;
    let orchestrator = ScanOrchestrator::new(
        store,
        Box::new(ExecAcquirer::new(args.fetch_cmd)),
        Box::new(LogNotifier),
    )?;

    let changes = orchestrator.try_scan()?;
    if changes.is_empty() {
        println!("No changes detected");
    } else {
        print!("{}", change_digest(&changes));
    }

    Ok(())
}
