//! Acquisition collaborator contract
//!
//! The raw-content extractor (browser automation, HTTP, a fixture file in
//! tests) lives behind this trait. A short or empty result is not
//! distinguishable from a genuine shrink of the source page, which is why
//! the engine applies removal-verification guards before trusting one.

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// One entry as observed on the source page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    /// Source-provided title text
    pub title: String,

    /// Source-provided date label
    pub date_label: String,

    /// Canonical link, the entry's identity
    pub link: String,
}

impl RawEntry {
    pub fn new(
        title: impl Into<String>,
        date_label: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            date_label: date_label.into(),
            link: link.into(),
        }
    }
}

/// Acquisition collaborator
///
/// Implementations may block for tens of seconds; the engine holds the
/// scan lock for the full call. Timeouts are the implementation's own
/// contract, not enforced here.
pub trait Acquirer: Send + Sync {
    /// Fetch the current ordered list of entries from the source
    ///
    /// # Errors
    ///
    /// Returns `Acquisition` when the source is unreachable or malformed.
    fn acquire(&self) -> Result<Vec<RawEntry>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_entry_serde() {
        let entry = RawEntry::new("Notice", "1 Ocak 2024", "https://example.org/n/1");
        let json = serde_json::to_string(&entry).unwrap();
        let back: RawEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
