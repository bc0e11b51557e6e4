//! Sitewatch CLI
//!
//! Command-line interface for the announcement watcher

use clap::{Parser, Subcommand};
use sitewatch_core::logging::{self, Profile};

mod acquire;
mod commands;
mod notify;

#[derive(Debug, Parser)]
#[command(name = "sitewatch")]
#[command(about = "Sitewatch - Announcement tracking and change detection", long_about = None)]
struct Cli {
    /// Emit JSON logs instead of human-readable output
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a single scan pass now
    Scan(commands::scan::ScanArgs),
    /// Run the recurring scan loop in the foreground
    Watch(commands::watch::WatchArgs),
    /// List tracked entries
    Entries(commands::entries::EntriesArgs),
    /// List recorded changes, newest first
    Changes(commands::changes::ChangesArgs),
    /// Show the scan status
    Status(commands::status::StatusArgs),
    /// Settings operations
    Settings(commands::settings::SettingsArgs),
}

fn main() {
    let cli = Cli::parse();

    logging::init(if cli.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = match cli.command {
        Commands::Scan(args) => commands::scan::execute(args),
        Commands::Watch(args) => commands::watch::execute(args),
        Commands::Entries(args) => commands::entries::execute(args),
        Commands::Changes(args) => commands::changes::execute(args),
        Commands::Status(args) => commands::status::execute(args),
        Commands::Settings(args) => commands::settings::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
