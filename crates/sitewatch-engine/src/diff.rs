//! Diff engine
//!
//! Runs one acquired pass through the snapshot store and collects the
//! resulting change records.

use sitewatch_core::{ChangeRecord, RawEntry, Result};
use sitewatch_store::SnapshotStore;

/// Upsert each acquired entry in input order and collect the changes
///
/// Input order does not affect correctness but keeps change ordering
/// deterministic. Entries sharing a link within one pass are a source
/// data-quality anomaly; the later occurrence wins (its upsert overwrites
/// the earlier one's effect).
///
/// # Errors
///
/// Propagates the first persistence failure; upserts committed before it
/// stay committed (accepted partial-success semantics).
pub fn run_diff(store: &mut SnapshotStore, entries: &[RawEntry]) -> Result<Vec<ChangeRecord>> {
    let mut changes = Vec::new();

    for raw in entries {
        let (_, change) = store.upsert(&raw.title, &raw.date_label, &raw.link)?;
        if let Some(change) = change {
            tracing::debug!(kind = %change.kind, title = %change.title, "change detected");
            changes.push(change);
        }
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitewatch_core::ChangeKind;

    #[test]
    fn test_diff_collects_only_real_changes() {
        let mut store = SnapshotStore::open_in_memory().unwrap();
        let pass = vec![
            RawEntry::new("A", "d", "id1"),
            RawEntry::new("B", "d", "id2"),
        ];

        let first = run_diff(&mut store, &pass).unwrap();
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|c| c.kind == ChangeKind::New));

        // Identical second pass: no changes, entries still present
        let second = run_diff(&mut store, &pass).unwrap();
        assert!(second.is_empty());
        assert_eq!(store.entry_count().unwrap(), 2);
    }

    #[test]
    fn test_duplicate_link_within_pass_last_write_wins() {
        let mut store = SnapshotStore::open_in_memory().unwrap();
        let pass = vec![
            RawEntry::new("First", "d", "id1"),
            RawEntry::new("Second", "d", "id1"),
        ];

        let changes = run_diff(&mut store, &pass).unwrap();
        // One new record plus one modified record from the overwrite
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].kind, ChangeKind::New);
        assert_eq!(changes[1].kind, ChangeKind::Modified);

        let entry = store.entry_by_link("id1").unwrap().unwrap();
        assert_eq!(entry.title, "Second");
    }
}
