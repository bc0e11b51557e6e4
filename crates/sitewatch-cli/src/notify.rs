//! Log-backed notification delivery
//!
//! Renders the change digest and emits it through the logging facility.
//! Stands in for a real transport; the engine treats it like any other
//! notifier, including the best-effort failure handling.

use sitewatch_core::render::change_digest;
use sitewatch_core::{ChangeRecord, Notifier, NotifySettings, Result};

/// Notifier that writes the change digest to the log
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, changes: &[ChangeRecord], settings: &NotifySettings) -> Result<()> {
        let digest = change_digest(changes);
        tracing::info!(
            changes = changes.len(),
            recipients = settings.recipients.len(),
            digest = %digest,
            "change digest"
        );
        Ok(())
    }
}
