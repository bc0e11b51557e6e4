//! Scan status command

use clap::Args;

#[derive(Debug, Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub db: super::DbArgs,
}

pub fn execute(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(&args.db.db)?;
    let status = store.scan_status()?;

    let last_scan = status
        .last_scan
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());

    println!("Last scan:  {}", last_scan);
    println!("Scanning:   {}", if status.scanning { "yes" } else { "no" });
    println!("Entries:    {}", status.entry_count);
    match status.error {
        Some(error) => println!("Last error: {}", error),
        None => println!("Last error: none"),
    }

    Ok(())
}
