// Test suite for snapshot upserts
// Covers new-entry insertion, modification detection, and idempotence

use sitewatch_core::ChangeKind;
use sitewatch_store::SnapshotStore;

#[test]
fn test_new_entry_produces_new_record() {
    let mut store = SnapshotStore::open_in_memory().unwrap();

    let (entry, change) = store
        .upsert("A", "2024-01-01", "https://example.org/n/1")
        .unwrap();

    assert_eq!(entry.title, "A");
    assert_eq!(entry.first_seen, entry.last_seen);

    let change = change.expect("first sighting must produce a change");
    assert_eq!(change.kind, ChangeKind::New);
    assert_eq!(change.entry_id, Some(entry.id));
    assert_eq!(change.old_content, None);
    assert_eq!(change.new_content.as_deref(), Some("A|2024-01-01"));
}

#[test]
fn test_upsert_idempotent_for_unchanged_content() {
    let mut store = SnapshotStore::open_in_memory().unwrap();

    let (first, _) = store
        .upsert("A", "2024-01-01", "https://example.org/n/1")
        .unwrap();
    let (second, change) = store
        .upsert("A", "2024-01-01", "https://example.org/n/1")
        .unwrap();

    // Only the last-observed timestamp moves; no second change record
    assert!(change.is_none());
    assert_eq!(second.id, first.id);
    assert_eq!(second.fingerprint, first.fingerprint);
    assert!(second.last_seen >= first.last_seen);
    assert_eq!(second.first_seen, first.first_seen);

    let changes = store.list_changes(10, None).unwrap();
    assert_eq!(changes.len(), 1);
}

#[test]
fn test_new_then_modify_sequence() {
    let mut store = SnapshotStore::open_in_memory().unwrap();

    let (_, first) = store.upsert("A", "2024-01-01", "id1").unwrap();
    assert_eq!(first.unwrap().kind, ChangeKind::New);

    let (entry, second) = store.upsert("A2", "2024-01-01", "id1").unwrap();
    let second = second.expect("title change must produce a record");

    assert_eq!(second.kind, ChangeKind::Modified);
    assert_eq!(second.old_content.as_deref(), Some("A|2024-01-01"));
    assert_eq!(second.new_content.as_deref(), Some("A2|2024-01-01"));

    // Stored fields follow the change
    assert_eq!(entry.title, "A2");
    let reloaded = store.entry_by_link("id1").unwrap().unwrap();
    assert_eq!(reloaded.title, "A2");
    assert_eq!(reloaded.fingerprint, entry.fingerprint);

    // Exactly one modified record exists
    let changes = store.list_changes(10, None).unwrap();
    assert_eq!(
        changes
            .iter()
            .filter(|c| c.kind == ChangeKind::Modified)
            .count(),
        1
    );
}

#[test]
fn test_date_label_change_is_a_modification() {
    let mut store = SnapshotStore::open_in_memory().unwrap();

    store.upsert("A", "1 Ocak 2024", "id1").unwrap();
    let (_, change) = store.upsert("A", "2 Ocak 2024", "id1").unwrap();

    let change = change.unwrap();
    assert_eq!(change.kind, ChangeKind::Modified);
    assert_eq!(change.old_content.as_deref(), Some("A|1 Ocak 2024"));
    assert_eq!(change.new_content.as_deref(), Some("A|2 Ocak 2024"));
}
