//! Notification collaborator contract

use crate::config::NotifySettings;
use crate::errors::Result;
use crate::model::ChangeRecord;

/// Notification collaborator
///
/// Invoked once per scan that produced at least one change. Delivery is
/// best-effort: a failure is logged by the caller and never rolls back or
/// retries the scan.
pub trait Notifier: Send + Sync {
    /// Deliver a description of the detected changes
    ///
    /// # Errors
    ///
    /// Returns `Notification` on delivery failure.
    fn notify(&self, changes: &[ChangeRecord], settings: &NotifySettings) -> Result<()>;
}

/// Notifier that silently accepts every delivery
///
/// Used when notifications are disabled and as a test stand-in.
#[derive(Debug, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _changes: &[ChangeRecord], _settings: &NotifySettings) -> Result<()> {
        Ok(())
    }
}
