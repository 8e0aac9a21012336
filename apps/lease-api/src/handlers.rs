//! HTTP handlers for the lease API.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use risk_engine::{ClauseClassifier, KeywordClassifier};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::models::*;
use crate::pipeline::{analyze_document, PipelineOutcome};
use crate::state::AppState;

/// Health check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "lease-ocr-api",
        message: "API is running correctly",
    })
}

/// Analyze an uploaded lease document.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<Envelope<ReportData>>, ApiError> {
    if req.user_id.trim().is_empty() {
        return Err(ApiError::Validation("user_id is required".to_string()));
    }
    let file_bytes = BASE64
        .decode(&req.file_base64)
        .map_err(|e| ApiError::Validation(format!("Invalid file base64: {e}")))?;

    match analyze_document(&state, file_bytes, &req.filename, &req.user_id).await? {
        PipelineOutcome::Success(data) => Ok(Json(Envelope::ok(*data))),
        PipelineOutcome::SoftFailure(message) => Ok(Json(Envelope::soft_failure(message))),
    }
}

/// Return the full stored clause set for an analysis.
///
/// Owners always get through; anyone else needs an active access grant.
/// Once access is established the disclosure filter does not apply.
pub async fn full_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> Result<Json<Envelope<ReportData>>, ApiError> {
    info!(
        "Requesting full report for analysis_id: {}, user_id: {}",
        params.analysis_id, params.user_id
    );

    let Some(record) = state.store.get(&params.analysis_id).await else {
        warn!("Analysis ID not found: {}", params.analysis_id);
        return Err(ApiError::AnalysisNotFound(params.analysis_id));
    };

    if record.user_id != params.user_id {
        let access = state.ledger.check_access(&params.user_id).await;
        if !access.has_access {
            warn!(
                "User {} does not have access to analysis {}",
                params.user_id, params.analysis_id
            );
            return Err(ApiError::AccessDenied);
        }
    }

    let has_full_access = state.ledger.check_access(&params.user_id).await.has_access;
    let total = record.all_clauses.len();

    Ok(Json(Envelope::ok(ReportData {
        analysis_id: record.analysis_id,
        full_text: record.full_text,
        key_info: record.key_info,
        clauses: record.all_clauses,
        total_clauses: total,
        shown_clauses: total,
        has_full_access,
        user_id: params.user_id,
        lines: record.lines,
        processing_time: record.processing_time,
        page_count: record.page_count,
    })))
}

/// Classify a single pasted clause. No upload, no identity, no storage;
/// always the deterministic keyword classifier.
pub async fn quick_analyze(
    Json(req): Json<QuickAnalyzeRequest>,
) -> Result<Json<Envelope<QuickAnalyzeData>>, ApiError> {
    let clause_text = req.clause_text.trim().to_string();

    if clause_text.is_empty() {
        return Err(ApiError::Validation("Clause text is required".to_string()));
    }
    if clause_text.chars().count() > 300 {
        return Err(ApiError::Validation(
            "Clause text too long (max 300 characters)".to_string(),
        ));
    }

    let verdict = KeywordClassifier.classify(&clause_text);

    Ok(Json(Envelope::ok(QuickAnalyzeData {
        clause_text,
        risk_level: verdict.risk_level,
        analysis: verdict.analysis,
        suggestion: verdict.suggestion,
    })))
}
