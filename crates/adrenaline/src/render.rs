//! Terminal and JSON output for annotated diffs

use anyhow::Result;
use fix_diff::{AnnotatedDiff, AnnotatedLineKind};

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const GREY: &str = "\x1b[90m";
const RESET: &str = "\x1b[0m";

/// Render the annotated document, one numbered line per row.
///
/// With `color`, old code is red, fixed code green and markers grey.
pub fn render_annotated(diff: &AnnotatedDiff, color: bool) -> String {
    let doc = diff.document();
    let kinds = diff.line_kinds();
    // The empty line after a final newline is not worth a row
    let rows = if diff.annotated().ends_with('\n') {
        kinds.len().saturating_sub(1)
    } else {
        kinds.len()
    };
    let width = rows.to_string().len();

    let mut out = String::new();
    for (i, (line, kind)) in doc.lines().zip(&kinds).take(rows).enumerate() {
        let paint = match kind {
            AnnotatedLineKind::Old => RED,
            AnnotatedLineKind::New => GREEN,
            AnnotatedLineKind::Marker => GREY,
            AnnotatedLineKind::Unchanged => "",
        };
        if color && !paint.is_empty() {
            out.push_str(&format!("{:>width$} {}{}{}\n", i, paint, line, RESET));
        } else {
            out.push_str(&format!("{:>width$} {}\n", i, line));
        }
    }
    out
}

/// One-line summary of a diff
pub fn summary(diff: &AnnotatedDiff) -> String {
    if !diff.has_changes() {
        return "No changes proposed".to_string();
    }
    format!(
        "{} hunk(s), {} line(s) added, {} line(s) removed",
        diff.hunk_count(),
        diff.added_lines(),
        diff.removed_lines()
    )
}

/// The merged code and its change regions as JSON
pub fn render_json(diff: &AnnotatedDiff) -> Result<String> {
    Ok(serde_json::to_string_pretty(&diff.to_reply())?)
}
