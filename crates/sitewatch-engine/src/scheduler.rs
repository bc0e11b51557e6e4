//! Recurring scan scheduler
//!
//! A background thread that triggers a scan every refresh interval. The
//! interval and the enable flag are re-read from live settings at the top
//! of every cycle, so configuration updates take effect on the next cycle
//! without a restart.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use sitewatch_core::WatchError;

use crate::orchestrator::ScanOrchestrator;

/// Sleep slice granularity; bounds shutdown latency
const TICK: Duration = Duration::from_millis(250);

/// Handle to a running scheduler thread
#[derive(Debug)]
pub struct SchedulerHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Signal the scheduler to stop and wait for the thread to finish
    ///
    /// A scan already in progress runs to completion first.
    pub fn shutdown(mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Start the recurring scan loop on a background thread
///
/// The first scan fires after one full interval, not immediately; callers
/// wanting an immediate pass trigger one themselves before spawning.
pub fn spawn(orchestrator: Arc<ScanOrchestrator>) -> SchedulerHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);

    let thread = std::thread::Builder::new()
        .name("sitewatch-scheduler".into())
        .spawn(move || run_loop(&orchestrator, &stop_flag))
        .expect("failed to spawn scheduler thread");

    SchedulerHandle {
        stop,
        thread: Some(thread),
    }
}

fn run_loop(orchestrator: &ScanOrchestrator, stop: &AtomicBool) {
    loop {
        let settings = orchestrator.settings();
        let interval = Duration::from_secs(settings.refresh_interval_secs);

        if sleep_interruptibly(interval, stop) {
            return;
        }

        // Re-read after the sleep: a toggle flipped mid-interval counts
        let settings = orchestrator.settings();
        if !settings.scan_enabled {
            tracing::debug!("recurring scans disabled; skipping cycle");
            continue;
        }

        match orchestrator.try_scan() {
            Ok(changes) => {
                tracing::info!(changes = changes.len(), "scheduled scan completed");
            }
            Err(WatchError::ScanInProgress) => {
                // A manual trigger beat us to the lock; no conflict
                tracing::debug!("scan already in progress; skipping cycle");
            }
            Err(err) => {
                // Already recorded as the last-error; the loop keeps going
                tracing::warn!(error = %err, "scheduled scan failed");
            }
        }
    }
}

/// Sleep for `total` in short slices; returns true when stopped
fn sleep_interruptibly(total: Duration, stop: &AtomicBool) -> bool {
    let mut remaining = total;
    while !remaining.is_zero() {
        if stop.load(Ordering::SeqCst) {
            return true;
        }
        let slice = remaining.min(TICK);
        std::thread::sleep(slice);
        remaining -= slice;
    }
    stop.load(Ordering::SeqCst)
}
