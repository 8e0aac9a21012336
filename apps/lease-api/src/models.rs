//! Request and response models for the lease API.

use lease_types::{Clause, KeyInfo, OcrLine, RiskLevel};
use serde::{Deserialize, Serialize};

/// Success/soft-failure wrapper around every data-bearing response.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Well-formed failure payload: the request was handled, but no useful
    /// result could be produced (e.g. a blank scan).
    pub fn soft_failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Request to analyze an uploaded lease document.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub filename: String,
    pub file_base64: String,
    pub user_id: String,
}

/// Query parameters for full-report retrieval.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportParams {
    pub analysis_id: String,
    pub user_id: String,
}

/// Request to classify a single clause without an upload.
#[derive(Debug, Clone, Deserialize)]
pub struct QuickAnalyzeRequest {
    pub clause_text: String,
}

/// Analysis payload returned by both analyze and full-report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub analysis_id: String,
    pub full_text: String,
    pub key_info: KeyInfo,
    pub clauses: Vec<Clause>,
    pub total_clauses: usize,
    pub shown_clauses: usize,
    pub has_full_access: bool,
    pub user_id: String,
    pub lines: Vec<OcrLine>,
    pub processing_time: f64,
    pub page_count: u32,
}

/// Single-clause classification payload.
#[derive(Debug, Clone, Serialize)]
pub struct QuickAnalyzeData {
    pub clause_text: String,
    pub risk_level: RiskLevel,
    pub analysis: String,
    pub suggestion: String,
}

/// Health check payload.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub message: &'static str,
}
