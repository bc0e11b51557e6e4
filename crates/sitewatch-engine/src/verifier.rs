//! Removal verifier
//!
//! The acquisition mechanism is unreliable: a transient failure can yield
//! an empty or heavily truncated list, which would otherwise mass-report
//! every tracked entry as removed. The verifier applies a two-stage
//! confirm policy with at most one re-acquisition per scan pass.

use std::collections::HashSet;
use std::time::Duration;

use sitewatch_core::{Acquirer, RawEntry, Result};

/// Default pause before the single re-acquisition
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Absolute floor for the majority-loss guard
///
/// Small watch-lists churn by an item or two in ordinary operation; the
/// guard only fires when more than this many entries would disappear.
pub const MAJORITY_LOSS_FLOOR: usize = 3;

/// Outcome of removal verification for one scan pass
#[derive(Debug)]
pub struct Verified {
    /// The entry list to diff against the store (possibly the retry's)
    pub entries: Vec<RawEntry>,

    /// Whether removal detection may run on this pass
    ///
    /// False whenever the final entry list is empty: a watch-list is never
    /// wiped from a single bad read.
    pub removal_eligible: bool,
}

/// Bounded-retry removal verification policy
///
/// Max one retry per scan, fixed delay. The pause is injectable so tests
/// run against a fake clock.
pub struct RemovalVerifier {
    retry_delay: Duration,
    pause: Box<dyn Fn(Duration) + Send + Sync>,
}

impl std::fmt::Debug for RemovalVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemovalVerifier")
            .field("retry_delay", &self.retry_delay)
            .finish_non_exhaustive()
    }
}

impl Default for RemovalVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RemovalVerifier {
    /// Create a verifier with the default delay and a thread-sleep pause
    pub fn new() -> Self {
        Self {
            retry_delay: DEFAULT_RETRY_DELAY,
            pause: Box::new(std::thread::sleep),
        }
    }

    /// Create a verifier with a custom delay and pause (for tests)
    pub fn with_pause(
        retry_delay: Duration,
        pause: impl Fn(Duration) + Send + Sync + 'static,
    ) -> Self {
        Self {
            retry_delay,
            pause: Box::new(pause),
        }
    }

    /// Evaluate the guard policy over one acquired pass
    ///
    /// Guards apply only when the store already tracks at least one entry:
    ///
    /// 1. Empty-result guard: an empty pass against a non-empty store is a
    ///    suspected transient failure. Pause, re-acquire once; still empty
    ///    means the scan completes with zero changes and removal detection
    ///    is skipped entirely.
    /// 2. Majority-loss guard: a non-empty pass that would remove more
    ///    than half of the tracked entries (and more than the absolute
    ///    floor) is a suspected partial failure. Pause, re-acquire once,
    ///    and trust the retry result even if the anomaly persists.
    ///
    /// # Errors
    ///
    /// Propagates a failure of the re-acquisition call.
    pub fn verify(
        &self,
        acquirer: &dyn Acquirer,
        first_pass: Vec<RawEntry>,
        tracked_links: &HashSet<String>,
    ) -> Result<Verified> {
        if tracked_links.is_empty() {
            let removal_eligible = !first_pass.is_empty();
            return Ok(Verified {
                entries: first_pass,
                removal_eligible,
            });
        }

        if first_pass.is_empty() {
            tracing::warn!(
                tracked = tracked_links.len(),
                "acquisition returned no entries; suspecting transient failure"
            );
            (self.pause)(self.retry_delay);
            let retry = acquirer.acquire()?;

            if retry.is_empty() {
                // Confirmed-empty reads are never trusted as mass removal
                tracing::warn!("re-acquisition still empty; skipping removal detection");
                return Ok(Verified {
                    entries: Vec::new(),
                    removal_eligible: false,
                });
            }

            return Ok(Verified {
                entries: retry,
                removal_eligible: true,
            });
        }

        let acquired: HashSet<&str> = first_pass.iter().map(|e| e.link.as_str()).collect();
        let would_be_removed = tracked_links
            .iter()
            .filter(|link| !acquired.contains(link.as_str()))
            .count();

        if 2 * would_be_removed > tracked_links.len() && would_be_removed > MAJORITY_LOSS_FLOOR {
            tracing::warn!(
                would_be_removed,
                tracked = tracked_links.len(),
                "majority of tracked entries missing; suspecting partial failure"
            );
            (self.pause)(self.retry_delay);
            // The retry result is trusted unconditionally; no second retry
            let retry = acquirer.acquire()?;
            let removal_eligible = !retry.is_empty();
            return Ok(Verified {
                entries: retry,
                removal_eligible,
            });
        }

        Ok(Verified {
            entries: first_pass,
            removal_eligible: true,
        })
    }
}
