//! Scan orchestrator
//!
//! The Idle/Scanning state machine. Enforces at-most-one concurrent scan
//! through a single exclusive lock, drives acquisition, removal
//! verification, diffing, and removal detection in sequence, and keeps
//! the scan-state singleton in step with the store.

use std::collections::HashSet;
use std::sync::{Mutex, RwLock};

use chrono::{DateTime, Utc};
use sitewatch_core::{
    Acquirer, ChangeRecord, Entry, Notifier, Result, ScanStatus, Settings, WatchError,
};
use sitewatch_store::SnapshotStore;

use crate::diff::run_diff;
use crate::verifier::RemovalVerifier;

/// In-memory mirror of the scan-state singleton
///
/// Mutated only inside the scan lock (plus the failure path's flag clear,
/// also under the lock); readers receive a snapshot copy and never wait.
#[derive(Debug, Default)]
struct ScanState {
    last_scan: Option<DateTime<Utc>>,
    scanning: bool,
    error: Option<String>,
}

/// Scan orchestrator owning the store, the collaborators, and the state
pub struct ScanOrchestrator {
    store: Mutex<SnapshotStore>,
    // Held for the full duration of the Scanning state; acquisition
    // blocking (possibly tens of seconds) happens while it is held
    scan_gate: Mutex<()>,
    state: RwLock<ScanState>,
    settings: RwLock<Settings>,
    acquirer: Box<dyn Acquirer>,
    notifier: Box<dyn Notifier>,
    verifier: RemovalVerifier,
}

impl std::fmt::Debug for ScanOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanOrchestrator").finish_non_exhaustive()
    }
}

impl ScanOrchestrator {
    /// Create an orchestrator over an opened store
    ///
    /// Loads persisted settings; the store open has already forced the
    /// scanning flag off, so the machine starts in `Idle`.
    pub fn new(
        store: SnapshotStore,
        acquirer: Box<dyn Acquirer>,
        notifier: Box<dyn Notifier>,
    ) -> Result<Self> {
        Self::with_verifier(store, acquirer, notifier, RemovalVerifier::new())
    }

    /// Create an orchestrator with a custom removal verifier (for tests)
    pub fn with_verifier(
        store: SnapshotStore,
        acquirer: Box<dyn Acquirer>,
        notifier: Box<dyn Notifier>,
        verifier: RemovalVerifier,
    ) -> Result<Self> {
        let settings = store.settings()?;
        let persisted = store.scan_status()?;
        Ok(Self {
            store: Mutex::new(store),
            scan_gate: Mutex::new(()),
            state: RwLock::new(ScanState {
                last_scan: persisted.last_scan,
                scanning: false,
                error: persisted.error,
            }),
            settings: RwLock::new(settings),
            acquirer,
            notifier,
            verifier,
        })
    }

    /// Trigger a scan, rejecting if one is already in progress
    ///
    /// Returns the change records the scan produced.
    ///
    /// # Errors
    ///
    /// `ScanInProgress` when another trigger holds the scan lock; any
    /// acquisition or persistence failure, after it has been recorded as
    /// the scan's last-error.
    pub fn try_scan(&self) -> Result<Vec<ChangeRecord>> {
        let Ok(gate) = self.scan_gate.try_lock() else {
            return Err(WatchError::ScanInProgress);
        };
        let _gate = gate;

        let outcome = self.mark_scanning().and_then(|()| self.scan_body());
        match outcome {
            Ok(changes) => {
                self.mark_idle(None)?;
                tracing::info!(changes = changes.len(), "scan completed");
                Ok(changes)
            }
            Err(err) => {
                // Record the failure and fold back to Idle; changes already
                // written by the diff engine stay committed
                tracing::warn!(error = %err, "scan failed");
                if let Err(record_err) = self.mark_idle(Some(&err.to_string())) {
                    tracing::error!(error = %record_err, "failed to record scan outcome");
                }
                Err(err)
            }
        }
    }

    /// The Scanning-state pipeline, run with the gate held
    fn scan_body(&self) -> Result<Vec<ChangeRecord>> {
        let first_pass = self.acquirer.acquire()?;

        let tracked = self.store.lock().expect("store lock poisoned").tracked_links()?;
        let verified = self
            .verifier
            .verify(self.acquirer.as_ref(), first_pass, &tracked)?;

        let acquired_links: HashSet<String> =
            verified.entries.iter().map(|e| e.link.clone()).collect();

        let mut changes = {
            let mut store = self.store.lock().expect("store lock poisoned");
            let mut changes = run_diff(&mut store, &verified.entries)?;

            // Never infer removals from an empty read
            if verified.removal_eligible && !acquired_links.is_empty() {
                changes.extend(store.mark_absent(&acquired_links)?);
            }
            changes
        };
        changes.sort_by_key(|c| c.id);

        if !changes.is_empty() {
            let notify_settings = self.settings().notify;
            if notify_settings.enabled {
                // Best-effort: a delivery failure never affects the scan
                if let Err(err) = self.notifier.notify(&changes, &notify_settings) {
                    tracing::warn!(error = %err, "notification delivery failed");
                }
            }
        }

        Ok(changes)
    }

    fn mark_scanning(&self) -> Result<()> {
        self.store.lock().expect("store lock poisoned").set_scanning()?;
        let mut state = self.state.write().expect("state lock poisoned");
        state.scanning = true;
        state.error = None;
        Ok(())
    }

    fn mark_idle(&self, error: Option<&str>) -> Result<()> {
        // The in-memory state folds back to Idle even when the store
        // write fails; the scanning flag must never stay stuck
        let persisted = self.store.lock().expect("store lock poisoned").set_idle(error);
        let mut state = self.state.write().expect("state lock poisoned");
        state.scanning = false;
        state.last_scan = Some(Utc::now());
        state.error = error.map(str::to_string);
        persisted
    }

    // ===== Status and query surface =====

    /// Read the current scan status without waiting on the scan lock
    pub fn status(&self) -> Result<ScanStatus> {
        let (last_scan, scanning, error) = {
            let state = self.state.read().expect("state lock poisoned");
            (state.last_scan, state.scanning, state.error.clone())
        };
        let entry_count = self
            .store
            .lock()
            .expect("store lock poisoned")
            .entry_count()?;
        Ok(ScanStatus {
            last_scan,
            scanning,
            entry_count,
            error,
        })
    }

    /// List tracked entries, newest last-observed first
    pub fn entries(&self) -> Result<Vec<Entry>> {
        self.store.lock().expect("store lock poisoned").list_entries()
    }

    /// List change records, newest first
    pub fn changes(
        &self,
        limit: u32,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ChangeRecord>> {
        self.store
            .lock()
            .expect("store lock poisoned")
            .list_changes(limit, since)
    }

    // ===== Configuration surface =====

    /// Current settings (snapshot copy)
    pub fn settings(&self) -> Settings {
        self.settings.read().expect("settings lock poisoned").clone()
    }

    /// Validate, persist, and apply new settings
    ///
    /// The recurring scheduler re-reads the interval at the start of its
    /// next sleep cycle; a cycle already in progress is unaffected.
    pub fn update_settings(&self, settings: Settings) -> Result<()> {
        settings.validate()?;
        self.store
            .lock()
            .expect("store lock poisoned")
            .update_settings(&settings)?;
        *self.settings.write().expect("settings lock poisoned") = settings;
        Ok(())
    }
}
