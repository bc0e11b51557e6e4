//! Change history command
//!
//! Usage: sitewatch changes [--limit <N>] [--since <RFC3339>]

use chrono::{DateTime, Utc};
use clap::Args;
use sitewatch_core::render::change_digest;

#[derive(Debug, Args)]
pub struct ChangesArgs {
    /// Maximum number of records to show
    #[arg(long, default_value_t = 50)]
    pub limit: u32,

    /// Only records detected strictly after this RFC 3339 timestamp
    #[arg(long)]
    pub since: Option<String>,

    #[command(flatten)]
    pub db: super::DbArgs,
}

pub fn execute(args: ChangesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let since: Option<DateTime<Utc>> = args
        .since
        .as_deref()
        .map(|s| DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)))
        .transpose()
        .map_err(|e| format!("invalid --since timestamp: {}", e))?;

    let store = super::open_store(&args.db.db)?;
    let changes = store.list_changes(args.limit, since)?;

    if changes.is_empty() {
        println!("No recorded changes");
    } else {
        print!("{}", change_digest(&changes));
    }

    Ok(())
}
