//! Named truncation bounds used by prompt construction.
//!
//! Hoisted into one struct so tests can override them; the defaults match
//! the production behavior.

/// Truncation bounds for a review run.
#[derive(Debug, Clone, Copy)]
pub struct ReviewLimits {
    /// Maximum changed files analyzed per review.
    pub max_files: usize,
    /// Added lines included in the improvements prompt.
    pub max_added_lines: usize,
    /// Removed lines included in the improvements prompt.
    pub max_removed_lines: usize,
    /// Context lines included in the improvements prompt.
    pub max_context_lines: usize,
    /// Characters of raw sub-diff included in the analysis prompt.
    pub max_diff_chars: usize,
    /// Characters of PR description included in the overall prompt.
    pub max_description_chars: usize,
    /// Characters of overall review fed into summary generation.
    pub max_overall_chars: usize,
}

impl Default for ReviewLimits {
    fn default() -> Self {
        Self {
            max_files: 10,
            max_added_lines: 10,
            max_removed_lines: 10,
            max_context_lines: 5,
            max_diff_chars: 5000,
            max_description_chars: 1000,
            max_overall_chars: 1000,
        }
    }
}

/// Returns at most the first `max` characters of `s`.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_production_bounds() {
        let l = ReviewLimits::default();
        assert_eq!(l.max_files, 10);
        assert_eq!(l.max_added_lines, 10);
        assert_eq!(l.max_removed_lines, 10);
        assert_eq!(l.max_context_lines, 5);
        assert_eq!(l.max_diff_chars, 5000);
        assert_eq!(l.max_description_chars, 1000);
        assert_eq!(l.max_overall_chars, 1000);
    }

    #[test]
    fn truncate_is_char_based() {
        assert_eq!(truncate_chars("héllo", 3), "hél");
        assert_eq!(truncate_chars("ok", 10), "ok");
    }
}
