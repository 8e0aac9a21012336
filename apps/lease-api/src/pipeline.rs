//! End-to-end analyze pipeline: upload → rasterize → OCR → segment →
//! classify → disclosure → store.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use lease_ingest::{OcrEngine, Rasterizer};
use lease_types::{AnalysisRecord, OcrOutput};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::ReportData;
use crate::state::AppState;

/// Clauses disclosed to users without an active access grant.
pub const PREVIEW_CLAUSES: usize = 5;

/// Orchestrator result: either a full success payload, or a well-formed
/// "could not extract text" style failure that is not an HTTP error.
pub enum PipelineOutcome {
    Success(Box<ReportData>),
    SoftFailure(String),
}

/// Analyze one uploaded document for `user_id`.
///
/// The upload and any rasterized page images live in a scoped temp
/// directory whose drop removes them on every exit path.
pub async fn analyze_document(
    state: &AppState,
    file_bytes: Vec<u8>,
    filename: &str,
    user_id: &str,
) -> Result<PipelineOutcome, ApiError> {
    let start = Instant::now();
    info!("Starting lease analysis for file: {filename}, user_id: {user_id}");

    let workdir = tempfile::tempdir().context("failed to create temp dir")?;
    let upload_path = persist_upload(workdir.path(), filename, &file_bytes)?;

    // Rendered pages get their own subdirectory: the rasterizer discovers
    // its output by file name, and an upload named like a page image must
    // never be swept into the page list.
    let pages_dir = workdir.path().join("pages");
    std::fs::create_dir_all(&pages_dir).context("failed to create pages dir")?;

    let pages = match collect_pages(state, &upload_path, &pages_dir).await? {
        Ok(pages) => pages,
        Err(message) => return Ok(PipelineOutcome::SoftFailure(message)),
    };
    if pages.is_empty() {
        error!("No pages found in the document");
        return Err(ApiError::EmptyDocument);
    }
    info!("Found {} image(s) to process", pages.len());

    let ocr_result = match run_ocr(state, pages).await? {
        Ok(result) => result,
        Err(message) => return Ok(PipelineOutcome::SoftFailure(message)),
    };

    let full_text = ocr_result.full_text;
    if full_text.trim().is_empty() {
        error!("OCR returned empty text");
        return Ok(PipelineOutcome::SoftFailure(
            "No text extracted from document. The document may be empty, \
             contain only images, or have formatting issues."
                .to_string(),
        ));
    }
    info!("Extracted {} characters from document", full_text.len());

    let key_info = risk_engine::extract_key_info(&full_text);
    let all_clauses = risk_engine::generate_clauses(&full_text, state.bulk_classifier.as_ref());

    let access = state.ledger.check_access(user_id).await;
    let has_full_access = access.has_access;
    let shown: Vec<_> = if has_full_access {
        all_clauses.clone()
    } else {
        all_clauses.iter().take(PREVIEW_CLAUSES).cloned().collect()
    };

    let processing_time = round2(start.elapsed().as_secs_f64());
    let analysis_id = Uuid::new_v4().to_string();

    let record = AnalysisRecord {
        analysis_id: analysis_id.clone(),
        full_text: full_text.clone(),
        key_info: key_info.clone(),
        all_clauses: all_clauses.clone(),
        lines: ocr_result.lines.clone(),
        processing_time,
        page_count: ocr_result.page_count,
        user_id: user_id.to_string(),
        created_at: chrono::Utc::now(),
    };
    state.store.put(record).await;
    // Unconditional: a first analysis opens the access window even for
    // preview-only users.
    state.ledger.record_analysis(user_id, &analysis_id).await;

    info!("Lease analysis completed successfully in {processing_time:.2}s");

    Ok(PipelineOutcome::Success(Box::new(ReportData {
        analysis_id,
        full_text,
        key_info,
        total_clauses: all_clauses.len(),
        shown_clauses: shown.len(),
        clauses: shown,
        has_full_access,
        user_id: user_id.to_string(),
        lines: ocr_result.lines,
        processing_time,
        page_count: ocr_result.page_count,
    })))
}

/// Write the upload into the scoped work directory, keeping the original
/// file name so extension-based kind detection still works.
fn persist_upload(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, ApiError> {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    let path = dir.join(name);
    std::fs::write(&path, bytes).context("failed to persist upload")?;
    Ok(path)
}

/// Detect the document kind and produce the ordered page-image list.
///
/// Rasterizer failures come back as the `Err` side of the inner result: a
/// soft failure for the caller. An unsupported format is still a terminal
/// 400.
async fn collect_pages(
    state: &AppState,
    upload_path: &Path,
    out_dir: &Path,
) -> Result<Result<Vec<PathBuf>, String>, ApiError> {
    if state.rasterizer.is_pdf(upload_path) {
        info!("Processing PDF file");
        let rasterizer: Arc<dyn Rasterizer> = state.rasterizer.clone();
        let pdf = upload_path.to_path_buf();
        let dir = out_dir.to_path_buf();
        let pages = tokio::task::spawn_blocking(move || rasterizer.pdf_to_images(&pdf, &dir))
            .await
            .context("rasterizer task panicked")?;
        match pages {
            Ok(pages) => Ok(Ok(pages)),
            Err(e) => {
                error!("PDF rasterization failed: {e}");
                Ok(Err(format!("Failed to analyze lease: {e}")))
            }
        }
    } else if state.rasterizer.is_image(upload_path) {
        info!("Processing image file");
        Ok(Ok(vec![upload_path.to_path_buf()]))
    } else {
        error!("Unsupported file format: {}", upload_path.display());
        Err(ApiError::UnsupportedFormat)
    }
}

/// Run OCR on a blocking task with a bounded timeout.
///
/// Both the timeout and OCR-level failures come back as the `Err` side of
/// the inner result: soft failures for the caller, not HTTP errors. No
/// store or ledger lock is held here.
async fn run_ocr(
    state: &AppState,
    pages: Vec<PathBuf>,
) -> Result<Result<OcrOutput, String>, ApiError> {
    let ocr: Arc<dyn OcrEngine> = state.ocr.clone();
    let task = tokio::task::spawn_blocking(move || ocr.recognize_images(&pages));

    match tokio::time::timeout(state.ocr_timeout, task).await {
        Err(_) => {
            error!("OCR timed out after {:?}", state.ocr_timeout);
            Ok(Err(
                "Text recognition timed out. Try a smaller or clearer document.".to_string(),
            ))
        }
        Ok(joined) => match joined.context("OCR task panicked")? {
            Ok(result) => Ok(Ok(result)),
            Err(e) => {
                error!("OCR failed: {e}");
                Ok(Err(format!("Failed to analyze lease: {e}")))
            }
        },
    }
}

fn round2(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::round2;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(0.005), 0.01);
        assert_eq!(round2(2.0), 2.0);
    }
}
