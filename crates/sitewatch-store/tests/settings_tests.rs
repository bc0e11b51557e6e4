// Test suite for settings persistence

use sitewatch_core::Settings;
use sitewatch_store::SnapshotStore;
use tempfile::TempDir;

#[test]
fn test_settings_default_on_first_open() {
    let store = SnapshotStore::open_in_memory().unwrap();
    assert_eq!(store.settings().unwrap(), Settings::default());
}

#[test]
fn test_settings_round_trip_across_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("watch.db");

    let mut updated = Settings::default();
    updated.refresh_interval_secs = 120;
    updated.scan_enabled = false;
    updated.notify.enabled = true;
    updated.notify.sender = "watcher@example.org".to_string();
    updated.notify.recipients = vec!["team@example.org".to_string()];

    {
        let mut store = SnapshotStore::open(&db_path).unwrap();
        store.update_settings(&updated).unwrap();
    }

    let store = SnapshotStore::open(&db_path).unwrap();
    assert_eq!(store.settings().unwrap(), updated);
}
