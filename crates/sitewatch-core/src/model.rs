//! Domain models for the announcement watcher

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fingerprint::fingerprint;

/// A tracked announcement
///
/// Identity is the canonical link; the fingerprint is a deterministic
/// digest of the visible fields and is recomputed on every scan pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Row identifier assigned by the store
    pub id: i64,

    /// Source-provided title text
    pub title: String,

    /// Source-provided date label (display text, not a parsed date)
    pub date_label: String,

    /// Canonical link - unique across all live entries
    pub link: String,

    /// Content fingerprint over (title, date_label, link)
    pub fingerprint: String,

    /// Timestamp when this entry was first observed
    pub first_seen: DateTime<Utc>,

    /// Timestamp when this entry was last observed on the source
    pub last_seen: DateTime<Utc>,
}

impl Entry {
    /// Concatenation of the visible fields, used as a change-record summary
    pub fn content_summary(&self) -> String {
        content_summary(&self.title, &self.date_label)
    }

    /// Recompute the fingerprint from the current visible fields
    pub fn current_fingerprint(&self) -> String {
        fingerprint(&self.title, &self.date_label, &self.link)
    }
}

/// Build the `"{title}|{date_label}"` summary stored on change records
pub fn content_summary(title: &str, date_label: &str) -> String {
    format!("{}|{}", title, date_label)
}

/// Kind of detected transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    New,
    Modified,
    Removed,
}

impl ChangeKind {
    /// Stable string code stored on disk and exposed in APIs
    pub fn code(&self) -> &'static str {
        match self {
            ChangeKind::New => "new",
            ChangeKind::Modified => "modified",
            ChangeKind::Removed => "removed",
        }
    }

    /// Parse a stored code back into a kind
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "new" => Some(ChangeKind::New),
            "modified" => Some(ChangeKind::Modified),
            "removed" => Some(ChangeKind::Removed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// An immutable log record describing one detected transition
///
/// Exactly one record exists per transition; a `Removed` record is created
/// at most once per entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Auto-incrementing sequence number
    pub id: i64,

    /// Referenced entry (None for records whose entry was later purged)
    pub entry_id: Option<i64>,

    /// Transition kind
    pub kind: ChangeKind,

    /// Detection timestamp
    pub detected_at: DateTime<Utc>,

    /// Title snapshot at detection time
    pub title: String,

    /// Pre-change content summary (absent for New)
    pub old_content: Option<String>,

    /// Post-change content summary (absent for Removed)
    pub new_content: Option<String>,
}

/// Read snapshot of the scan state
///
/// Returned by value so status readers never race with in-place mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanStatus {
    /// Completion timestamp of the most recent scan, if any
    pub last_scan: Option<DateTime<Utc>>,

    /// Whether a scan is currently executing
    pub scanning: bool,

    /// Number of tracked entries
    pub entry_count: u64,

    /// Last recorded scan failure, cleared by the next successful scan
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_summary_format() {
        assert_eq!(content_summary("A", "2024-01-01"), "A|2024-01-01");
    }

    #[test]
    fn test_change_kind_codes_round_trip() {
        for kind in [ChangeKind::New, ChangeKind::Modified, ChangeKind::Removed] {
            assert_eq!(ChangeKind::parse(kind.code()), Some(kind));
        }
        assert_eq!(ChangeKind::parse("purged"), None);
    }

    #[test]
    fn test_change_kind_serde_lowercase() {
        let json = serde_json::to_string(&ChangeKind::Modified).unwrap();
        assert_eq!(json, "\"modified\"");
    }

    #[test]
    fn test_entry_current_fingerprint_tracks_fields() {
        let now = Utc::now();
        let mut entry = Entry {
            id: 1,
            title: "A".into(),
            date_label: "2024-01-01".into(),
            link: "https://example.org/a".into(),
            fingerprint: fingerprint("A", "2024-01-01", "https://example.org/a"),
            first_seen: now,
            last_seen: now,
        };
        assert_eq!(entry.current_fingerprint(), entry.fingerprint);

        entry.title = "A2".into();
        assert_ne!(entry.current_fingerprint(), entry.fingerprint);
    }
}
