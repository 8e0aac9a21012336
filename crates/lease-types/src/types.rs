use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Risk tier assigned to a clause, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Safe,
    Caution,
    Danger,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Safe => write!(f, "safe"),
            RiskLevel::Caution => write!(f, "caution"),
            RiskLevel::Danger => write!(f, "danger"),
        }
    }
}

/// A bounded-length text segment extracted from a lease, with its assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clause {
    pub clause_number: u32,
    pub clause_text: String,
    pub risk_level: RiskLevel,
    pub analysis: String,
    pub suggestion: String,
}

/// A single recognized text line with its OCR confidence in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrLine {
    pub text: String,
    pub confidence: f64,
}

/// Aggregated OCR output across all pages of one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrOutput {
    pub full_text: String,
    pub lines: Vec<OcrLine>,
    pub page_count: u32,
}

/// Structured facts pulled out of the raw lease text.
///
/// Fields are optional; a scan that never mentions a deposit simply has no
/// deposit. Serialized as a flat JSON object and passed through to clients
/// unmodified.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_rent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_deposit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lease_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lease_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landlord: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
}

/// Full pipeline output for one analyzed document.
///
/// Immutable once stored. Holds every clause, including those a preview
/// response withholds; disclosure is applied at read time, never here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub analysis_id: String,
    pub full_text: String,
    pub key_info: KeyInfo,
    pub all_clauses: Vec<Clause>,
    pub lines: Vec<OcrLine>,
    pub processing_time: f64,
    pub page_count: u32,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Per-user access window over full reports.
///
/// `expires_at` is fixed when the grant is created and is never extended by
/// later analyses. `analysis_ids` keeps insertion order and set semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessGrant {
    pub user_id: String,
    pub analysis_ids: Vec<String>,
    pub expires_at: DateTime<Utc>,
}

/// Derived view of a user's access state; never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessStatus {
    pub has_access: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyses_count: Option<usize>,
}

impl AccessStatus {
    /// Status for a user with no active grant.
    pub fn denied() -> Self {
        Self {
            has_access: false,
            expires_at: None,
            days_remaining: None,
            analyses_count: None,
        }
    }
}
