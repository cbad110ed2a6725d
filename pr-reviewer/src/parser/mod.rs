//! Unified-diff parsing for the review pipeline.
//!
//! Pure and deterministic: given diff text this module isolates one file's
//! sub-diff, reconstructs old/new file text from the change lines, and
//! produces a human-readable line-by-line annotation stream for prompts.
//! Degenerate inputs yield sentinel strings instead of empty output so
//! downstream prompt construction always has non-empty placeholders.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Hunk header: `@@ -<oldStart>[,<oldLen>] +<newStart>[,<newLen>] @@`.
    static ref HUNK_HEADER: Regex =
        Regex::new(r"@@\s*-(\d+)(?:,\d+)?\s*\+(\d+)(?:,\d+)?\s*@@").unwrap();
}

/// Sentinel for reconstructed old text when the diff removed nothing.
pub const NO_OLD_CODE: &str = "No old code found";
/// Sentinel for reconstructed new text when the diff added nothing.
pub const NO_NEW_CODE: &str = "No new code found";
/// Sentinel annotation when no classifiable lines were present.
pub const NO_MEANINGFUL_CHANGES: &str = "No meaningful changes found in diff";

/// Structured view of one file's diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedChanges {
    /// Reconstructed pre-change file text (or [`NO_OLD_CODE`]).
    pub old_code: String,
    /// Reconstructed post-change file text (or [`NO_NEW_CODE`]).
    pub new_code: String,
    /// Line-annotated change summary (or a sentinel).
    pub changes_summary: String,
    /// Raw added line contents, in diff order.
    pub added_lines: Vec<String>,
    /// Raw removed line contents, in diff order.
    pub removed_lines: Vec<String>,
    /// Raw context line contents, in diff order.
    pub context_lines: Vec<String>,
}

impl ParsedChanges {
    /// Number of added lines.
    pub fn additions(&self) -> usize {
        self.added_lines.len()
    }

    /// Number of removed lines.
    pub fn deletions(&self) -> usize {
        self.removed_lines.len()
    }
}

/// Extracts the sub-diff for one file from a multi-file unified diff.
///
/// Capturing begins at a `diff --git a/<path>` or `diff --git b/<path>`
/// header matching the target and stops at the next `diff --git` header.
/// Absence of a match yields an explicit sentinel, never an error.
pub fn extract_file_diff(full_diff: &str, filename: &str) -> String {
    if full_diff.is_empty() {
        return format!("No diff available for {filename}");
    }

    let header_a = format!("diff --git a/{filename}");
    let header_b = format!("diff --git b/{filename}");

    let mut file_diff: Vec<&str> = Vec::new();
    let mut in_file = false;

    for line in full_diff.lines() {
        if line.starts_with(&header_a) || line.starts_with(&header_b) {
            in_file = true;
        } else if line.starts_with("diff --git") && in_file {
            break;
        } else if in_file {
            file_diff.push(line);
        }
    }

    if file_diff.is_empty() {
        format!("No diff content found for {filename}")
    } else {
        file_diff.join("\n")
    }
}

/// Parses one file's diff into reconstructed texts and a line-annotated
/// change summary.
///
/// A hunk header resets the running new-file line counter and emits a hunk
/// marker. `-` lines (not `---`) go to old text only and do not advance the
/// counter; `+` lines (not `+++`) go to new text and advance it; space
/// prefixed lines are context, appended to both. Anything else is ignored
/// for reconstruction but does not abort parsing.
pub fn parse_changes(diff: &str) -> ParsedChanges {
    let mut changes: Vec<String> = Vec::new();
    let mut old_lines: Vec<String> = Vec::new();
    let mut new_lines: Vec<String> = Vec::new();
    let mut added_lines: Vec<String> = Vec::new();
    let mut removed_lines: Vec<String> = Vec::new();
    let mut context_lines: Vec<String> = Vec::new();

    if diff.is_empty() {
        return ParsedChanges {
            old_code: NO_OLD_CODE.into(),
            new_code: NO_NEW_CODE.into(),
            changes_summary: "No diff content available".into(),
            added_lines,
            removed_lines,
            context_lines,
        };
    }

    let mut line_number: u64 = 0;

    for line in diff.lines() {
        if line.starts_with("@@") {
            if let Some(caps) = HUNK_HEADER.captures(line) {
                // Group 2 is the new-file start; counters restart per hunk.
                let new_start: u64 = caps[2].parse().unwrap_or(0);
                changes.push(format!("\n=== Lines around {new_start} ==="));
                line_number = new_start;
            }
        } else if line.starts_with('-') && !line.starts_with("---") {
            let content = &line[1..];
            changes.push(format!("REMOVED (Line ~{line_number}): {content}"));
            old_lines.push(content.to_string());
            removed_lines.push(content.to_string());
        } else if line.starts_with('+') && !line.starts_with("+++") {
            let content = &line[1..];
            changes.push(format!("ADDED (Line {line_number}): {content}"));
            new_lines.push(content.to_string());
            added_lines.push(content.to_string());
            line_number += 1;
        } else if line.starts_with(' ') {
            let content = &line[1..];
            changes.push(format!("   CONTEXT (Line {line_number}): {content}"));
            old_lines.push(content.to_string());
            new_lines.push(content.to_string());
            context_lines.push(content.to_string());
            line_number += 1;
        }
        // Other lines (file headers, index lines, ...) are skipped.
    }

    let old_code = if old_lines.is_empty() {
        NO_OLD_CODE.into()
    } else {
        old_lines.join("\n")
    };
    let new_code = if new_lines.is_empty() {
        NO_NEW_CODE.into()
    } else {
        new_lines.join("\n")
    };
    let changes_summary = if changes.is_empty() {
        NO_MEANINGFUL_CHANGES.into()
    } else {
        changes.join("\n")
    };

    ParsedChanges {
        old_code,
        new_code,
        changes_summary,
        added_lines,
        removed_lines,
        context_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULTI_FILE_DIFF: &str = "\
diff --git a/a.py b/a.py
index 111..222 100644
--- a/a.py
+++ b/a.py
@@ -1,2 +1,2 @@
 import os
-print('a')
+print('A')
diff --git a/b.py b/b.py
index 333..444 100644
--- a/b.py
+++ b/b.py
@@ -1,1 +1,2 @@
 line1
+line2
diff --git a/c.py b/c.py
--- a/c.py
+++ b/c.py
@@ -5,1 +5,1 @@
-gone
+here
";

    #[test]
    fn context_only_diff_round_trips() {
        let diff = "@@ -1,3 +1,3 @@\n one\n two\n three";
        let parsed = parse_changes(diff);
        assert_eq!(parsed.old_code, "one\ntwo\nthree");
        assert_eq!(parsed.new_code, parsed.old_code);
        assert_eq!(parsed.additions(), 0);
        assert_eq!(parsed.deletions(), 0);
    }

    #[test]
    fn additive_case() {
        let diff = "@@ -1,1 +1,2 @@\n line1\n+line2";
        let parsed = parse_changes(diff);
        assert_eq!(parsed.new_code, "line1\nline2");
        assert_eq!(parsed.old_code, "line1");
        assert_eq!(parsed.added_lines, vec!["line2"]);
    }

    #[test]
    fn subtractive_case_annotates_pre_removal_counter() {
        let diff = "@@ -10,2 +10,1 @@\n keep\n-removed";
        let parsed = parse_changes(diff);
        assert!(parsed.old_code.contains("removed"));
        assert!(!parsed.new_code.contains("removed"));
        // Context advanced the counter from 10 to 11; removal reports ~11
        // and does not advance it further.
        assert!(parsed.changes_summary.contains("REMOVED (Line ~11): removed"));
    }

    #[test]
    fn hunk_header_resets_counter_and_emits_marker() {
        let diff = "@@ -1,1 +1,1 @@\n a\n@@ -40,1 +45,1 @@\n+fresh";
        let parsed = parse_changes(diff);
        assert!(parsed.changes_summary.contains("=== Lines around 1 ==="));
        assert!(parsed.changes_summary.contains("=== Lines around 45 ==="));
        assert!(parsed.changes_summary.contains("ADDED (Line 45): fresh"));
    }

    #[test]
    fn hunk_header_without_lengths_is_recognized() {
        let diff = "@@ -3 +7 @@\n+x";
        let parsed = parse_changes(diff);
        assert!(parsed.changes_summary.contains("=== Lines around 7 ==="));
    }

    #[test]
    fn file_isolation_excludes_neighbours() {
        let b = extract_file_diff(MULTI_FILE_DIFF, "b.py");
        assert!(b.contains("line2"));
        assert!(!b.contains("print('A')"));
        assert!(!b.contains("here"));

        let a = extract_file_diff(MULTI_FILE_DIFF, "a.py");
        assert!(a.contains("print('A')"));
        assert!(!a.contains("line2"));
    }

    #[test]
    fn missing_file_yields_sentinel() {
        assert_eq!(
            extract_file_diff(MULTI_FILE_DIFF, "nope.py"),
            "No diff content found for nope.py"
        );
        assert_eq!(
            extract_file_diff("", "nope.py"),
            "No diff available for nope.py"
        );
    }

    #[test]
    fn degenerate_inputs_yield_sentinels() {
        let parsed = parse_changes("");
        assert_eq!(parsed.old_code, NO_OLD_CODE);
        assert_eq!(parsed.new_code, NO_NEW_CODE);

        let noise = parse_changes("index 123..456\nBinary files differ");
        assert_eq!(noise.changes_summary, NO_MEANINGFUL_CHANGES);
        assert_eq!(noise.old_code, NO_OLD_CODE);
    }

    #[test]
    fn file_header_markers_are_not_changes() {
        let diff = "--- a/x.py\n+++ b/x.py\n@@ -1,1 +1,1 @@\n-old\n+new";
        let parsed = parse_changes(diff);
        assert_eq!(parsed.removed_lines, vec!["old"]);
        assert_eq!(parsed.added_lines, vec!["new"]);
    }
}
