//! String similarity scoring between a query term and a candidate label.
//!
//! Candidate labels in clinical vocabularies often carry a parenthetical
//! semantic qualifier ("Heart (disorder)") that should not count against
//! a match, so the qualifier is stripped before comparison. Scores are a
//! 0-100 normalized edit ratio, deterministic and case-insensitive.

use once_cell::sync::Lazy;
use regex::Regex;
use similar::TextDiff;

static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(.*?\)").expect("parenthetical regex is valid"));

/// Remove parenthetical qualifiers from a candidate label and trim
/// surrounding whitespace.
pub fn strip_qualifier(label: &str) -> String {
    PARENTHETICAL.replace_all(label, "").trim().to_string()
}

/// Compute the similarity between a query term and a candidate label.
///
/// Returns a ratio in `[0, 100]`: 100 for identical normalized strings,
/// 0 for no common characters or an empty candidate. The candidate has
/// any parenthetical qualifier stripped; both sides are lowercased.
pub fn score(query: &str, candidate: &str) -> f64 {
    let cleaned = strip_qualifier(candidate).to_lowercase();
    let query = query.to_lowercase();

    if cleaned.is_empty() && query.is_empty() {
        return 100.0;
    }
    if cleaned.is_empty() || query.is_empty() {
        return 0.0;
    }

    let ratio = TextDiff::from_chars(query.as_str(), cleaned.as_str()).ratio() as f64;
    (ratio * 100.0).clamp(0.0, 100.0)
}
