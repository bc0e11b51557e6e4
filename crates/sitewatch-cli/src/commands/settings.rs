//! Settings commands
//!
//! Usage: sitewatch settings show
//!        sitewatch settings set [--refresh-interval <SECS>] [...]

use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print the persisted settings as JSON
    Show(ShowArgs),
    /// Update one or more settings fields
    Set(SetArgs),
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub db: super::DbArgs,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Seconds between recurring scans
    #[arg(long)]
    pub refresh_interval: Option<u64>,

    /// Enable or disable the recurring schedule
    #[arg(long)]
    pub scan_enabled: Option<bool>,

    /// Enable or disable change notifications
    #[arg(long)]
    pub notify_enabled: Option<bool>,

    /// Notification sender address
    #[arg(long)]
    pub notify_sender: Option<String>,

    /// Comma-separated notification recipients
    #[arg(long)]
    pub notify_recipients: Option<String>,

    /// Notification server host
    #[arg(long)]
    pub notify_server: Option<String>,

    /// Notification server port
    #[arg(long)]
    pub notify_port: Option<u16>,

    #[command(flatten)]
    pub db: super::DbArgs,
}

pub fn execute(args: SettingsArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        SettingsCommand::Show(show_args) => execute_show(show_args),
        SettingsCommand::Set(set_args) => execute_set(set_args),
    }
}

fn execute_show(args: ShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(&args.db.db)?;
    let settings = store.settings()?;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

fn execute_set(args: SetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = super::open_store(&args.db.db)?;
    let mut settings = store.settings()?;

    if let Some(secs) = args.refresh_interval {
        settings.refresh_interval_secs = secs;
    }
    if let Some(enabled) = args.scan_enabled {
        settings.scan_enabled = enabled;
    }
    if let Some(enabled) = args.notify_enabled {
        settings.notify.enabled = enabled;
    }
    if let Some(sender) = args.notify_sender {
        settings.notify.sender = sender;
    }
    if let Some(recipients) = args.notify_recipients {
        settings.notify.recipients = recipients
            .split(',')
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
    }
    if let Some(server) = args.notify_server {
        settings.notify.server = server;
    }
    if let Some(port) = args.notify_port {
        settings.notify.port = port;
    }

    settings.validate()?;
    store.update_settings(&settings)?;
    println!("✓ Settings updated");
    Ok(())
}
