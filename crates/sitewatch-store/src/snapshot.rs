//! Snapshot store
//!
//! Durable mapping from an entry's canonical link to its last-known
//! fields and fingerprint, plus the append-only change history, the
//! scan-state singleton, and the persisted settings record.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row};
use sitewatch_core::model::content_summary;
use sitewatch_core::{fingerprint, ChangeKind, ChangeRecord, Entry, Result, ScanStatus, Settings};

use crate::errors::from_rusqlite;
use crate::migrations;

/// Durable snapshot store backed by SQLite
///
/// Every operation is individually atomic (one transaction per call).
/// Cross-operation atomicity is deliberately not provided: a scan pass
/// commits upsert-by-upsert, and changes written before a failure stay
/// committed.
pub struct SnapshotStore {
    conn: Connection,
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore").finish_non_exhaustive()
    }
}

impl SnapshotStore {
    /// Open (and if necessary create) the store at the given path
    ///
    /// Applies pending migrations, seeds the singleton rows, and forces
    /// the scanning flag off regardless of its on-disk value: a crash
    /// mid-scan must not leave the flag stuck.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path).map_err(from_rusqlite)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory store (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(from_rusqlite)?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(from_rusqlite)?;
        // WAL mode lets status reads proceed while a scan writes. The
        // pragma reports the resulting mode as a row; in-memory
        // connections keep their own journal mode.
        conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
            .map_err(from_rusqlite)?;

        migrations::apply_migrations(&mut conn)?;

        conn.execute(
            "INSERT OR IGNORE INTO scan_status (id, last_scan, scanning, error)
             VALUES (1, NULL, 0, NULL)",
            [],
        )
        .map_err(from_rusqlite)?;

        let default_config = serde_json::to_string(&Settings::default())?;
        conn.execute(
            "INSERT OR IGNORE INTO settings (id, config) VALUES (1, ?1)",
            [&default_config],
        )
        .map_err(from_rusqlite)?;

        // Crash-safe restart: never resume in the Scanning state
        conn.execute("UPDATE scan_status SET scanning = 0 WHERE id = 1", [])
            .map_err(from_rusqlite)?;

        Ok(Self { conn })
    }

    // ===== Entries and changes =====

    /// Insert or update an entry, returning it and any detected change
    ///
    /// New link: insert with first/last-seen stamped now and record a
    /// `new` change. Known link: touch `last_seen` unconditionally (this
    /// is what lets the store report "still present" accurately); when the
    /// freshly computed fingerprint differs, update the visible fields and
    /// record a `modified` change carrying both content summaries.
    pub fn upsert(
        &mut self,
        title: &str,
        date_label: &str,
        link: &str,
    ) -> Result<(Entry, Option<ChangeRecord>)> {
        let fp = fingerprint(title, date_label, link);
        // Truncate to the millisecond precision the DB stores, so the
        // returned entry round-trips equal to its persisted form
        let now_ms = Utc::now().timestamp_millis();
        let now = DateTime::from_timestamp_millis(now_ms).unwrap_or_else(Utc::now);

        let existing = self.entry_by_link(link)?;
        let tx = self.conn.transaction().map_err(from_rusqlite)?;

        let result = if let Some(mut entry) = existing {
            tx.execute(
                "UPDATE entries SET last_seen = ?1 WHERE id = ?2",
                rusqlite::params![now_ms, entry.id],
            )
            .map_err(from_rusqlite)?;
            entry.last_seen = now;

            let change = if entry.fingerprint != fp {
                tx.execute(
                    "UPDATE entries SET title = ?1, date_label = ?2, fingerprint = ?3
                     WHERE id = ?4",
                    rusqlite::params![title, date_label, fp, entry.id],
                )
                .map_err(from_rusqlite)?;

                let old_content = entry.content_summary();
                let new_content = content_summary(title, date_label);
                tx.execute(
                    "INSERT INTO changes (entry_id, kind, detected_at, title, old_content, new_content)
                     VALUES (?1, 'modified', ?2, ?3, ?4, ?5)",
                    rusqlite::params![entry.id, now_ms, title, old_content, new_content],
                )
                .map_err(from_rusqlite)?;
                let change_id = tx.last_insert_rowid();

                entry.title = title.to_string();
                entry.date_label = date_label.to_string();
                entry.fingerprint = fp;

                Some(ChangeRecord {
                    id: change_id,
                    entry_id: Some(entry.id),
                    kind: ChangeKind::Modified,
                    detected_at: now,
                    title: title.to_string(),
                    old_content: Some(old_content),
                    new_content: Some(new_content),
                })
            } else {
                None
            };

            (entry, change)
        } else {
            tx.execute(
                "INSERT INTO entries (title, date_label, link, fingerprint, first_seen, last_seen)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![title, date_label, link, fp, now_ms, now_ms],
            )
            .map_err(from_rusqlite)?;
            let entry_id = tx.last_insert_rowid();

            let new_content = content_summary(title, date_label);
            tx.execute(
                "INSERT INTO changes (entry_id, kind, detected_at, title, new_content)
                 VALUES (?1, 'new', ?2, ?3, ?4)",
                rusqlite::params![entry_id, now_ms, title, new_content],
            )
            .map_err(from_rusqlite)?;
            let change_id = tx.last_insert_rowid();

            let entry = Entry {
                id: entry_id,
                title: title.to_string(),
                date_label: date_label.to_string(),
                link: link.to_string(),
                fingerprint: fp,
                first_seen: now,
                last_seen: now,
            };
            let change = ChangeRecord {
                id: change_id,
                entry_id: Some(entry_id),
                kind: ChangeKind::New,
                detected_at: now,
                title: title.to_string(),
                old_content: None,
                new_content: Some(new_content),
            };
            (entry, Some(change))
        };

        tx.commit().map_err(from_rusqlite)?;
        Ok(result)
    }

    /// Record `removed` changes for tracked entries absent from the set
    ///
    /// Only entries with no prior `removed` record are reported, so
    /// repeated calls with the same absent set never double-report.
    pub fn mark_absent(&mut self, current_links: &HashSet<String>) -> Result<Vec<ChangeRecord>> {
        let links: Vec<&String> = current_links.iter().collect();
        let placeholders = links
            .iter()
            .enumerate()
            .map(|(i, _)| format!("?{}", i + 1))
            .collect::<Vec<_>>()
            .join(",");

        let query = if links.is_empty() {
            "SELECT id, title, date_label, link, fingerprint, first_seen, last_seen
             FROM entries
             WHERE id NOT IN (
                 SELECT entry_id FROM changes
                 WHERE kind = 'removed' AND entry_id IS NOT NULL
             )"
            .to_string()
        } else {
            format!(
                "SELECT id, title, date_label, link, fingerprint, first_seen, last_seen
                 FROM entries
                 WHERE link NOT IN ({})
                 AND id NOT IN (
                     SELECT entry_id FROM changes
                     WHERE kind = 'removed' AND entry_id IS NOT NULL
                 )",
                placeholders
            )
        };

        let absent: Vec<Entry> = {
            let mut stmt = self.conn.prepare(&query).map_err(from_rusqlite)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(links.iter()), map_entry_row)
                .map_err(from_rusqlite)?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(from_rusqlite)?;
            rows
        };

        let now = Utc::now();
        let now_ms = now.timestamp_millis();
        let tx = self.conn.transaction().map_err(from_rusqlite)?;

        let mut changes = Vec::with_capacity(absent.len());
        for entry in absent {
            let old_content = entry.content_summary();
            tx.execute(
                "INSERT INTO changes (entry_id, kind, detected_at, title, old_content)
                 VALUES (?1, 'removed', ?2, ?3, ?4)",
                rusqlite::params![entry.id, now_ms, entry.title, old_content],
            )
            .map_err(from_rusqlite)?;
            changes.push(ChangeRecord {
                id: tx.last_insert_rowid(),
                entry_id: Some(entry.id),
                kind: ChangeKind::Removed,
                detected_at: now,
                title: entry.title,
                old_content: Some(old_content),
                new_content: None,
            });
        }

        tx.commit().map_err(from_rusqlite)?;
        if !changes.is_empty() {
            tracing::debug!(count = changes.len(), "recorded removal changes");
        }
        Ok(changes)
    }

    /// Get an entry by its canonical link
    pub fn entry_by_link(&self, link: &str) -> Result<Option<Entry>> {
        self.conn
            .query_row(
                "SELECT id, title, date_label, link, fingerprint, first_seen, last_seen
                 FROM entries WHERE link = ?1",
                [link],
                map_entry_row,
            )
            .optional()
            .map_err(from_rusqlite)
    }

    /// List all tracked entries, newest `last_seen` first
    pub fn list_entries(&self) -> Result<Vec<Entry>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, title, date_label, link, fingerprint, first_seen, last_seen
                 FROM entries ORDER BY last_seen DESC, id DESC",
            )
            .map_err(from_rusqlite)?;

        let entries = stmt
            .query_map([], map_entry_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(entries)
    }

    /// List change records, newest first
    ///
    /// `since` filters to records detected strictly after the given
    /// timestamp.
    pub fn list_changes(
        &self,
        limit: u32,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ChangeRecord>> {
        let mut stmt;
        let rows = match since {
            Some(since) => {
                stmt = self
                    .conn
                    .prepare(
                        "SELECT id, entry_id, kind, detected_at, title, old_content, new_content
                         FROM changes
                         WHERE detected_at > ?1
                         ORDER BY detected_at DESC, id DESC
                         LIMIT ?2",
                    )
                    .map_err(from_rusqlite)?;
                stmt.query_map(
                    rusqlite::params![since.timestamp_millis(), limit],
                    map_change_row,
                )
                .map_err(from_rusqlite)?
            }
            None => {
                stmt = self
                    .conn
                    .prepare(
                        "SELECT id, entry_id, kind, detected_at, title, old_content, new_content
                         FROM changes
                         ORDER BY detected_at DESC, id DESC
                         LIMIT ?1",
                    )
                    .map_err(from_rusqlite)?;
                stmt.query_map([limit], map_change_row).map_err(from_rusqlite)?
            }
        };

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)
    }

    /// Number of tracked entries
    pub fn entry_count(&self) -> Result<u64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| {
                row.get::<_, i64>(0)
            })
            .map(|n| n as u64)
            .map_err(from_rusqlite)
    }

    /// Set of all tracked links
    pub fn tracked_links(&self) -> Result<HashSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT link FROM entries")
            .map_err(from_rusqlite)?;

        let links = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<HashSet<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(links)
    }

    // ===== Scan state =====

    /// Read the current scan status
    pub fn scan_status(&self) -> Result<ScanStatus> {
        let (last_scan_ms, scanning, error) = self
            .conn
            .query_row(
                "SELECT last_scan, scanning, error FROM scan_status WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, Option<i64>>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, Option<String>>(2)?,
                    ))
                },
            )
            .map_err(from_rusqlite)?;

        Ok(ScanStatus {
            last_scan: last_scan_ms.and_then(DateTime::from_timestamp_millis),
            scanning: scanning != 0,
            entry_count: self.entry_count()?,
            error,
        })
    }

    /// Mark a scan as started, clearing any previous error
    pub fn set_scanning(&mut self) -> Result<()> {
        self.conn
            .execute(
                "UPDATE scan_status SET scanning = 1, error = NULL WHERE id = 1",
                [],
            )
            .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Mark the scan as finished, stamping last-scan and the outcome
    pub fn set_idle(&mut self, error: Option<&str>) -> Result<()> {
        let now_ms = Utc::now().timestamp_millis();
        self.conn
            .execute(
                "UPDATE scan_status SET scanning = 0, last_scan = ?1, error = ?2 WHERE id = 1",
                rusqlite::params![now_ms, error],
            )
            .map_err(from_rusqlite)?;
        Ok(())
    }

    // ===== Settings =====

    /// Read the persisted settings record
    pub fn settings(&self) -> Result<Settings> {
        let config: String = self
            .conn
            .query_row("SELECT config FROM settings WHERE id = 1", [], |row| {
                row.get(0)
            })
            .map_err(from_rusqlite)?;

        Ok(serde_json::from_str(&config)?)
    }

    /// Replace the persisted settings record
    pub fn update_settings(&mut self, settings: &Settings) -> Result<()> {
        let config = serde_json::to_string(settings)?;
        self.conn
            .execute(
                "UPDATE settings SET config = ?1 WHERE id = 1",
                [&config],
            )
            .map_err(from_rusqlite)?;
        Ok(())
    }
}

fn map_entry_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    let first_seen_ms: i64 = row.get(5)?;
    let last_seen_ms: i64 = row.get(6)?;
    Ok(Entry {
        id: row.get(0)?,
        title: row.get(1)?,
        date_label: row.get(2)?,
        link: row.get(3)?,
        fingerprint: row.get(4)?,
        first_seen: DateTime::from_timestamp_millis(first_seen_ms).unwrap_or_else(Utc::now),
        last_seen: DateTime::from_timestamp_millis(last_seen_ms).unwrap_or_else(Utc::now),
    })
}

fn map_change_row(row: &Row<'_>) -> rusqlite::Result<ChangeRecord> {
    let kind_code: String = row.get(2)?;
    let detected_at_ms: i64 = row.get(3)?;
    Ok(ChangeRecord {
        id: row.get(0)?,
        entry_id: row.get(1)?,
        kind: ChangeKind::parse(&kind_code).unwrap_or(ChangeKind::Modified),
        detected_at: DateTime::from_timestamp_millis(detected_at_ms).unwrap_or_else(Utc::now),
        title: row.get(4)?,
        old_content: row.get(5)?,
        new_content: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory_seeds_singletons() {
        let store = SnapshotStore::open_in_memory().unwrap();
        let status = store.scan_status().unwrap();
        assert!(!status.scanning);
        assert!(status.last_scan.is_none());
        assert_eq!(status.entry_count, 0);

        let settings = store.settings().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_entry_by_link_missing() {
        let store = SnapshotStore::open_in_memory().unwrap();
        assert!(store.entry_by_link("https://example.org/none").unwrap().is_none());
    }
}
