//! Quality-score extraction from overall review text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches "Overall Quality Score: 8/10" and close variants
    /// ("quality score - 8 / 10", case-insensitive).
    static ref QUALITY_SCORE: Regex =
        Regex::new(r"(?i)quality\s*score\s*[:\-]?\s*\*{0,2}(\d{1,2})\s*/\s*10\b").unwrap();
}

/// Parses the `X/10` quality score out of a review, if present.
///
/// Only 0..=10 counts as a score; anything else is treated as absent.
pub fn extract_quality_score(overall_review: &str) -> Option<i32> {
    let caps = QUALITY_SCORE.captures(overall_review)?;
    let score: i32 = caps[1].parse().ok()?;
    (0..=10).contains(&score).then_some(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_standard_form() {
        let text = "## 🎯 EXECUTIVE SUMMARY\n- Overall Quality Score: 8/10 with justification";
        assert_eq!(extract_quality_score(text), Some(8));
    }

    #[test]
    fn tolerates_spacing_case_and_bold() {
        assert_eq!(extract_quality_score("quality score - 7 / 10"), Some(7));
        assert_eq!(extract_quality_score("Quality Score: **9**/10"), None);
        assert_eq!(extract_quality_score("Quality Score: **9/10**"), Some(9));
        assert_eq!(extract_quality_score("QUALITY SCORE 10/10"), Some(10));
    }

    #[test]
    fn absent_or_out_of_range_is_none() {
        assert_eq!(extract_quality_score("Manual review recommended."), None);
        assert_eq!(extract_quality_score("Quality Score: 11/10"), None);
        assert_eq!(extract_quality_score("Quality Score: 8/100"), None);
    }
}
