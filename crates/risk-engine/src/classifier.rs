//! Risk classifiers for lease clauses.
//!
//! `KeywordClassifier` is the deterministic rule cascade used for
//! single-clause checks. `WeightedRandomClassifier` is the stand-in used for
//! bulk document scoring until a real model replaces it.

use lease_types::RiskLevel;
use rand::distributions::{Distribution, WeightedIndex};

use crate::patterns::{first_match, HIGH_RISK_PATTERNS, MEDIUM_RISK_PATTERNS};

/// Classification result for one clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub risk_level: RiskLevel,
    pub analysis: String,
    pub suggestion: String,
}

impl Verdict {
    fn new(risk_level: RiskLevel, analysis: &str, suggestion: &str) -> Self {
        Self {
            risk_level,
            analysis: analysis.to_string(),
            suggestion: suggestion.to_string(),
        }
    }
}

/// Assigns a risk tier plus human-readable rationale to a clause.
pub trait ClauseClassifier: Send + Sync {
    fn classify(&self, clause_text: &str) -> Verdict;
}

/// Deterministic two-tier keyword cascade.
///
/// High-risk phrases are checked before medium-risk ones; within a tier the
/// first pattern in table order that appears anywhere in the text wins. A
/// clause matching phrases from both tiers therefore always classifies as
/// danger, never caution.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl ClauseClassifier for KeywordClassifier {
    fn classify(&self, clause_text: &str) -> Verdict {
        let text = clause_text.to_lowercase();

        if first_match(&text, HIGH_RISK_PATTERNS).is_some() {
            // Disambiguate the generic high-risk hit into a more specific
            // rationale where the surrounding words allow it.
            if text.contains("all") && (text.contains("repair") || text.contains("maintenance")) {
                return Verdict::new(
                    RiskLevel::Danger,
                    "This clause shifts all maintenance responsibility to you, regardless of fault. This is unusual and potentially unfair.",
                    "Request to limit your responsibility to damages caused by tenant negligence only. Standard leases don't make tenants responsible for normal wear and tear or structural issues.",
                );
            }
            if text.contains("enter") && text.contains("any time") {
                return Verdict::new(
                    RiskLevel::Danger,
                    "This allows landlord unrestricted access to your apartment. Most jurisdictions require 24-48 hours notice except for emergencies.",
                    "Request specific language: 'Landlord may enter with 24-48 hours written notice, except in emergencies.'",
                );
            }
            if text.contains("waive") {
                return Verdict::new(
                    RiskLevel::Danger,
                    "Waiving rights can leave you without legal protection. This type of clause may not be enforceable in many states.",
                    "Consult a local tenant rights organization before signing. You may not be able to legally waive certain rights.",
                );
            }
            return Verdict::new(
                RiskLevel::Danger,
                "This clause contains language that may heavily favor landlord and limit your rights as a tenant.",
                "Have a lawyer review this specific clause before signing, or request it be removed or modified.",
            );
        }

        if first_match(&text, MEDIUM_RISK_PATTERNS).is_some() {
            if text.contains("late fee") {
                return Verdict::new(
                    RiskLevel::Caution,
                    "Late fees are common, but amounts should be reasonable. Check your state's laws on maximum late fee amounts.",
                    "Ensure there's a grace period (typically 3-5 days) and that fee doesn't exceed state limits (often $50 or 5% of rent).",
                );
            }
            if text.contains("non-refundable") {
                return Verdict::new(
                    RiskLevel::Caution,
                    "Non-refundable fees or deposits may not be legal in your state. Security deposits are typically refundable if you leave property in good condition.",
                    "Clarify what this fee covers and check local laws. Consider negotiating to make it refundable.",
                );
            }
            return Verdict::new(
                RiskLevel::Caution,
                "This clause may result in additional costs or give landlord significant discretion. Review carefully.",
                "Ask for specific dollar amounts instead of vague terms like 'additional charges' or 'as determined by landlord.'",
            );
        }

        Verdict::new(
            RiskLevel::Safe,
            "This clause appears standard and doesn't contain obvious red flags. However, it's always good to read the full context.",
            "Continue reviewing the complete lease for a comprehensive understanding. Our full analysis can check all clauses together.",
        )
    }
}

/// Stand-in bulk classifier: draws a tier with weights 0.5 / 0.35 / 0.15
/// for safe / caution / danger and returns a canned rationale per tier.
///
/// Intentionally ignores the clause text. Kept distinct from
/// [`KeywordClassifier`]; the two paths must not be unified.
pub struct WeightedRandomClassifier {
    weights: WeightedIndex<f64>,
}

impl WeightedRandomClassifier {
    pub fn new() -> Self {
        // Panic-free: the weight table is a compile-time constant.
        let weights = WeightedIndex::new([0.5, 0.35, 0.15]).expect("static weights are valid");
        Self { weights }
    }
}

impl Default for WeightedRandomClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ClauseClassifier for WeightedRandomClassifier {
    fn classify(&self, _clause_text: &str) -> Verdict {
        let mut rng = rand::thread_rng();
        let risk_level = match self.weights.sample(&mut rng) {
            0 => RiskLevel::Safe,
            1 => RiskLevel::Caution,
            _ => RiskLevel::Danger,
        };

        match risk_level {
            RiskLevel::Safe => Verdict::new(
                RiskLevel::Safe,
                "This is a standard clause that follows typical rental agreement practices.",
                "No action needed. This protects both parties fairly.",
            ),
            RiskLevel::Caution => Verdict::new(
                RiskLevel::Caution,
                "This clause contains some language that could be interpreted in multiple ways.",
                "Consider clarifying the terms with your landlord before signing.",
            ),
            RiskLevel::Danger => Verdict::new(
                RiskLevel::Danger,
                "This clause potentially shifts legal responsibilities away from the landlord.",
                "Negotiate to limit your liability or seek legal counsel before signing.",
            ),
        }
    }
}
