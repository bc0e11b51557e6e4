//! Change-digest rendering
//!
//! Produces the human-readable summary of a scan's changes that the
//! notification collaborator and the CLI display.

use crate::model::{ChangeKind, ChangeRecord};

/// Label shown for a change kind in a digest
fn kind_label(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::New => "NEW",
        ChangeKind::Modified => "CHANGED",
        ChangeKind::Removed => "REMOVED",
    }
}

/// Render a Markdown digest of the given changes
///
/// Generates:
/// - A header with the change count
/// - One line per change with kind label, title, and detection time
/// - The post-change content for new/modified records, the pre-change
///   content for removed records
pub fn change_digest(changes: &[ChangeRecord]) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {} change(s) detected\n\n", changes.len()));

    for change in changes {
        output.push_str(&format!(
            "- **{}** {} ({})\n",
            kind_label(change.kind),
            change.title,
            change.detected_at.format("%Y-%m-%d %H:%M:%S UTC"),
        ));

        let detail = match change.kind {
            ChangeKind::Removed => change.old_content.as_deref(),
            _ => change.new_content.as_deref(),
        };
        if let Some(detail) = detail {
            output.push_str(&format!("  {}\n", detail));
        }
    }

    output
}
