//! Content fingerprinting
//!
//! Derives a stable content identity for an entry from its visible fields.

use sha2::{Digest, Sha256};

/// Compute the content fingerprint for an entry
///
/// Pure and deterministic: identical `(title, date_label, link)` triples
/// always produce identical values, and any visible-field change changes
/// the value. SHA-256 over the `|`-joined fields, hex-encoded (64 chars).
pub fn fingerprint(title: &str, date_label: &str, link: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(b"|");
    hasher.update(date_label.as_bytes());
    hasher.update(b"|");
    hasher.update(link.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_fingerprint_deterministic() {
        let a = fingerprint("Title", "1 Ocak 2024", "https://example.org/n/1");
        let b = fingerprint("Title", "1 Ocak 2024", "https://example.org/n/1");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_fingerprint_sensitive_to_each_field() {
        let base = fingerprint("t", "d", "l");
        assert_ne!(base, fingerprint("t2", "d", "l"));
        assert_ne!(base, fingerprint("t", "d2", "l"));
        assert_ne!(base, fingerprint("t", "d", "l2"));
    }

    #[test]
    fn test_fingerprint_no_collisions_over_sample() {
        // A few hundred distinct triples must hash to distinct values
        let mut seen = HashSet::new();
        for i in 0..300 {
            let fp = fingerprint(&format!("title-{}", i), "2024-01-01", "/n/1");
            assert!(seen.insert(fp), "collision at sample {}", i);
        }
    }

    proptest! {
        #[test]
        fn prop_fingerprint_deterministic(t in ".*", d in ".*", l in ".*") {
            prop_assert_eq!(fingerprint(&t, &d, &l), fingerprint(&t, &d, &l));
        }

        #[test]
        fn prop_distinct_titles_distinct_fingerprints(
            t1 in "[a-z]{1,16}",
            t2 in "[a-z]{1,16}",
            d in "[0-9 ]{1,12}",
            l in "/[a-z]{1,16}",
        ) {
            prop_assume!(t1 != t2);
            prop_assert_ne!(fingerprint(&t1, &d, &l), fingerprint(&t2, &d, &l));
        }
    }
}
