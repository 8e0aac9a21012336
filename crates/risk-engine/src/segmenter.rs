//! Splits full document text into a bounded list of clause candidates.

use lease_types::Clause;
use rand::Rng;

use crate::classifier::ClauseClassifier;
use crate::patterns::truncate_chars;

/// Upper bound on clauses produced for one document.
pub const MAX_CLAUSES: usize = 20;
/// Lower bound of the random clause-count target.
pub const MIN_TARGET: usize = 15;
/// Clause text is truncated to this many characters.
pub const CLAUSE_CHAR_LIMIT: usize = 200;

/// Extract the candidate pool from raw text.
///
/// Splits on blank lines; if that yields fewer than 5 paragraphs, falls back
/// to sentence-splitting on periods. Empty or whitespace-only text yields an
/// empty pool.
pub fn clause_candidates(full_text: &str) -> Vec<String> {
    let paragraphs: Vec<String> = full_text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(ToString::to_string)
        .collect();

    if paragraphs.len() >= 5 {
        return paragraphs;
    }

    full_text
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Build numbered clauses from a candidate pool.
///
/// Produces `min(pool, target)` clauses, indexing candidates modulo the pool
/// size. Deterministic; the random target draw lives in [`generate_clauses`].
pub fn assemble_clauses(
    candidates: &[String],
    target: usize,
    classifier: &dyn ClauseClassifier,
) -> Vec<Clause> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let count = candidates.len().min(target);
    (0..count)
        .map(|i| {
            let clause_text = truncate_chars(&candidates[i % candidates.len()], CLAUSE_CHAR_LIMIT);
            let verdict = classifier.classify(&clause_text);
            Clause {
                clause_number: (i + 1) as u32,
                clause_text,
                risk_level: verdict.risk_level,
                analysis: verdict.analysis,
                suggestion: verdict.suggestion,
            }
        })
        .collect()
}

/// Segment a document and classify every clause with the given classifier.
///
/// The clause-count target is drawn uniformly from 15..=20 per call.
pub fn generate_clauses(full_text: &str, classifier: &dyn ClauseClassifier) -> Vec<Clause> {
    let candidates = clause_candidates(full_text);
    let target = rand::thread_rng().gen_range(MIN_TARGET..=MAX_CLAUSES);
    assemble_clauses(&candidates, target, classifier)
}
