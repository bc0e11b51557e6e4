//! Entries listing command

use clap::Args;

#[derive(Debug, Args)]
pub struct EntriesArgs {
    #[command(flatten)]
    pub db: super::DbArgs,
}

pub fn execute(args: EntriesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(&args.db.db)?;
    let entries = store.list_entries()?;

    if entries.is_empty() {
        println!("No tracked entries");
        return Ok(());
    }

    for entry in entries {
        println!(
            "{:>5}  {}  {}  {}",
            entry.id,
            entry.last_seen.format("%Y-%m-%d %H:%M"),
            entry.title,
            entry.link,
        );
    }

    Ok(())
}
