//! Keyword tables for the risk rule cascade.
//!
//! Order matters: within each tier the first listed phrase found anywhere in
//! the clause wins, so reordering a table changes classification results.

/// High-risk phrases that heavily favor the landlord or strip tenant rights.
pub const HIGH_RISK_PATTERNS: &[&str] = &[
    "tenant responsible for all",
    "regardless of fault",
    "waive any right",
    "landlord may enter at any time",
    "no refund",
    "tenant liable for",
    "cannot terminate",
    "automatic renewal",
];

/// Medium-risk phrases that signal extra costs or landlord discretion.
pub const MEDIUM_RISK_PATTERNS: &[&str] = &[
    "late fee",
    "additional charges",
    "landlord discretion",
    "may be charged",
    "tenant must pay",
    "non-refundable",
];

/// First pattern from `patterns` appearing anywhere in `text`, if any.
///
/// `text` must already be lowercased; the tables are lowercase by
/// construction.
pub fn first_match<'a>(text: &str, patterns: &[&'a str]) -> Option<&'a str> {
    patterns.iter().find(|p| text.contains(*p)).copied()
}

/// Truncate to at most `max_chars` characters (not bytes).
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
