//! Pulls structured facts (amounts, dates, parties) out of raw lease text.
//!
//! Best-effort regex extraction over OCR output. A fact only counts when it
//! appears in the right context window, e.g. a dollar amount near the word
//! "rent"; absent facts stay `None`.

use lazy_static::lazy_static;
use lease_types::KeyInfo;
use regex::Regex;

lazy_static! {
    static ref MONEY_RE: Regex = Regex::new(r"\$\s?\d{1,3}(?:,\d{3})*(?:\.\d{2})?").unwrap();
    // 01/15/2025, 2025-01-15, or "January 15, 2025".
    static ref DATE_RE: Regex = Regex::new(
        r"(?ix)
        \d{1,2}/\d{1,2}/\d{2,4}
        | \d{4}-\d{2}-\d{2}
        | (?:january|february|march|april|may|june|july|august|september|october|november|december)
          \s+\d{1,2},?\s+\d{4}"
    )
    .unwrap();
    // Case-insensitive on the label only; the name itself must be capitalized.
    static ref LANDLORD_RE: Regex =
        Regex::new(r#"(?i:landlord)[:\s]+"?([A-Z][A-Za-z.'-]+(?:\s+[A-Z][A-Za-z.'-]+){0,3})"#)
            .unwrap();
    static ref TENANT_RE: Regex =
        Regex::new(r#"(?i:tenant)[:\s]+"?([A-Z][A-Za-z.'-]+(?:\s+[A-Z][A-Za-z.'-]+){0,3})"#)
            .unwrap();
}

/// Find the money amount sitting closest to one of the given keywords.
///
/// Every amount in the text competes; each one is scored by the byte gap to
/// the nearest keyword within a ±60-char window, and the tightest binding
/// wins. A label preceding its amount ("deposit of $2,000") ranks one step
/// ahead of a keyword trailing it, so an amount never steals a label that
/// belongs to its neighbor.
fn amount_near(text: &str, keywords: &[&str]) -> Option<String> {
    let mut best: Option<(usize, &str)> = None;

    for m in MONEY_RE.find_iter(text) {
        // The window edges may land inside a multibyte char; snap to
        // boundaries before slicing.
        let start = floor_char_boundary(text, m.start().saturating_sub(60));
        let end = ceil_char_boundary(text, (m.end() + 60).min(text.len()));
        let before = text[start..m.start()].to_lowercase();
        let after = text[m.end()..end].to_lowercase();

        let mut gap: Option<usize> = None;
        for kw in keywords {
            if let Some(pos) = before.rfind(kw) {
                let d = before.len() - (pos + kw.len());
                gap = Some(gap.map_or(d, |g| g.min(d)));
            }
            if let Some(pos) = after.find(kw) {
                let d = pos + 1;
                gap = Some(gap.map_or(d, |g| g.min(d)));
            }
        }

        if let Some(d) = gap {
            if best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, m.as_str()));
            }
        }
    }

    best.map(|(_, amount)| amount.to_string())
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char_boundary(s: &str, mut i: usize) -> usize {
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Extract key facts from the full document text.
pub fn extract_key_info(text: &str) -> KeyInfo {
    let mut dates = DATE_RE.find_iter(text).map(|m| m.as_str().to_string());

    KeyInfo {
        monthly_rent: amount_near(text, &["rent", "per month", "monthly"]),
        security_deposit: amount_near(text, &["deposit"]),
        lease_start: dates.next(),
        lease_end: dates.next(),
        landlord: LANDLORD_RE
            .captures(text)
            .map(|c| c[1].trim_end_matches(['.', ',']).to_string()),
        tenant: TENANT_RE
            .captures(text)
            .map(|c| c[1].trim_end_matches(['.', ',']).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_rent_and_deposit() {
        let text = "Monthly rent is $1,850.00 due on the first. \
                    A security deposit of $2,000 is required at signing.";
        let info = extract_key_info(text);
        assert_eq!(info.monthly_rent.as_deref(), Some("$1,850.00"));
        assert_eq!(info.security_deposit.as_deref(), Some("$2,000"));
    }

    #[test]
    fn test_adjacent_amounts_bind_to_their_own_labels() {
        // The rent amount sits within 60 chars of the word "deposit"; each
        // amount must still resolve to its nearest label.
        let text = "Monthly rent is $1,850.00 due on the first of each month. \
                    A security deposit of $2,000 is required at signing.";
        let info = extract_key_info(text);
        assert_eq!(info.security_deposit.as_deref(), Some("$2,000"));
        assert_eq!(info.monthly_rent.as_deref(), Some("$1,850.00"));
    }

    #[test]
    fn test_preceding_label_outranks_trailing_keyword() {
        let text = "Security deposit: $2,000. Rent: $1,850 per month.";
        let info = extract_key_info(text);
        assert_eq!(info.security_deposit.as_deref(), Some("$2,000"));
        assert_eq!(info.monthly_rent.as_deref(), Some("$1,850"));
    }

    #[test]
    fn test_amount_without_context_is_ignored() {
        let info = extract_key_info("The property was appraised at $450,000 last year.");
        assert_eq!(info.monthly_rent, None);
        assert_eq!(info.security_deposit, None);
    }

    #[test]
    fn test_extracts_lease_dates_in_order() {
        let text = "Term begins 01/01/2025 and ends December 31, 2025.";
        let info = extract_key_info(text);
        assert_eq!(info.lease_start.as_deref(), Some("01/01/2025"));
        assert_eq!(info.lease_end.as_deref(), Some("December 31, 2025"));
    }

    #[test]
    fn test_extracts_parties() {
        let text = "This agreement is between Landlord: Jane Doe and Tenant: John Q. Public.";
        let info = extract_key_info(text);
        assert_eq!(info.landlord.as_deref(), Some("Jane Doe"));
        assert_eq!(info.tenant.as_deref(), Some("John Q. Public"));
    }

    #[test]
    fn test_empty_text_yields_empty_info() {
        let info = extract_key_info("");
        assert!(info.monthly_rent.is_none());
        assert!(info.lease_start.is_none());
        assert!(info.landlord.is_none());
    }
}
