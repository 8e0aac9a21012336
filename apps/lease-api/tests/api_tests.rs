//! End-to-end tests over the router with stub rasterizer/OCR collaborators.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use lease_api::store::{AccessLedger, AnalysisStore, MemoryAccessLedger, MemoryAnalysisStore};
use lease_api::{router, AppState};
use lease_ingest::{detect_kind, DocumentKind, IngestError, OcrEngine, Rasterizer};
use lease_types::{OcrLine, OcrOutput};
use risk_engine::KeywordClassifier;

/// Rasterizer stub: content-sniffing kind detection and fabricated page
/// files, discovered by name the way the poppler backend finds its output.
struct StubRasterizer {
    pages: u32,
}

impl StubRasterizer {
    fn sniff(&self, path: &Path) -> DocumentKind {
        let bytes = std::fs::read(path).unwrap_or_default();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        detect_kind(&bytes, name)
    }
}

impl Rasterizer for StubRasterizer {
    fn is_pdf(&self, path: &Path) -> bool {
        self.sniff(path) == DocumentKind::Pdf
    }

    fn is_image(&self, path: &Path) -> bool {
        self.sniff(path) == DocumentKind::Image
    }

    fn pdf_to_images(&self, _pdf: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
        for i in 1..=self.pages {
            std::fs::write(out_dir.join(format!("page-{i}.png")), b"fake image")?;
        }
        let mut pages: Vec<PathBuf> = std::fs::read_dir(out_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension().and_then(|e| e.to_str()) == Some("png")
                    && p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with("page-"))
            })
            .collect();
        pages.sort();
        Ok(pages)
    }
}

/// OCR stub returning canned output and recording the paths it saw.
struct StubOcr {
    output: Result<OcrOutput, String>,
    seen_paths: Arc<Mutex<Vec<PathBuf>>>,
}

impl OcrEngine for StubOcr {
    fn recognize_images(&self, images: &[PathBuf]) -> Result<OcrOutput, IngestError> {
        self.seen_paths.lock().unwrap().extend(images.iter().cloned());
        match &self.output {
            Ok(output) => Ok(OcrOutput {
                page_count: images.len() as u32,
                ..output.clone()
            }),
            Err(msg) => Err(IngestError::CommandFailed(msg.clone())),
        }
    }
}

struct TestHarness {
    app: Router,
    store: Arc<MemoryAnalysisStore>,
    ledger: Arc<MemoryAccessLedger>,
    seen_paths: Arc<Mutex<Vec<PathBuf>>>,
}

fn harness_with_text(full_text: &str, pdf_pages: u32) -> TestHarness {
    let store = Arc::new(MemoryAnalysisStore::new());
    let ledger = Arc::new(MemoryAccessLedger::new(30));
    let seen_paths = Arc::new(Mutex::new(Vec::new()));

    let ocr = StubOcr {
        output: Ok(OcrOutput {
            full_text: full_text.to_string(),
            lines: full_text
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(|l| OcrLine {
                    text: l.to_string(),
                    confidence: 0.95,
                })
                .collect(),
            page_count: 0,
        }),
        seen_paths: seen_paths.clone(),
    };

    let state = AppState::new(
        store.clone(),
        ledger.clone(),
        Arc::new(StubRasterizer { pages: pdf_pages }),
        Arc::new(ocr),
        Arc::new(KeywordClassifier::new()),
        Duration::from_secs(30),
    );

    TestHarness {
        app: router(Arc::new(state)),
        store,
        ledger,
        seen_paths,
    }
}

fn lease_text() -> String {
    (1..=10)
        .map(|i| {
            format!(
                "Section {i}. The tenant agrees to the standard terms described \
                 in this section of the residential lease agreement, including \
                 quiet enjoyment of the premises."
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn analyze_body(user_id: &str) -> Value {
    json!({
        "filename": "lease.pdf",
        "file_base64": BASE64.encode(b"%PDF-1.4 fake"),
        "user_id": user_id,
    })
}

#[tokio::test]
async fn health_reports_service() {
    let h = harness_with_text(&lease_text(), 2);
    let (status, body) = get(&h.app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "lease-ocr-api");
}

#[tokio::test]
async fn first_analysis_previews_five_clauses_and_opens_window() {
    let h = harness_with_text(&lease_text(), 2);
    let (status, body) = post_json(&h.app, "/api/analyze", analyze_body("user-1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["has_full_access"], false);
    assert_eq!(data["page_count"], 2);
    assert_eq!(data["total_clauses"], 10);
    assert_eq!(data["shown_clauses"], 5);
    assert_eq!(data["clauses"].as_array().unwrap().len(), 5);
    assert!(!data["lines"].as_array().unwrap().is_empty());

    // Exactly one record and one grant.
    assert_eq!(h.store.list_ids().await.len(), 1);
    let access = h.ledger.check_access("user-1").await;
    assert!(access.has_access);
    assert_eq!(access.analyses_count, Some(1));
}

#[tokio::test]
async fn second_analysis_discloses_everything() {
    let h = harness_with_text(&lease_text(), 2);
    post_json(&h.app, "/api/analyze", analyze_body("user-1")).await;
    let (_, body) = post_json(&h.app, "/api/analyze", analyze_body("user-1")).await;

    let data = &body["data"];
    assert_eq!(data["has_full_access"], true);
    assert_eq!(data["shown_clauses"], data["total_clauses"]);
}

#[tokio::test]
async fn unsupported_format_is_rejected() {
    let h = harness_with_text(&lease_text(), 2);
    let body = json!({
        "filename": "notes.txt",
        "file_base64": BASE64.encode(b"plain text"),
        "user_id": "user-1",
    });
    let (status, body) = post_json(&h.app, "/api/analyze", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn blank_scan_is_a_soft_failure_and_cleans_up() {
    let h = harness_with_text("   \n  \n", 2);
    let (status, body) = post_json(&h.app, "/api/analyze", analyze_body("user-1")).await;

    // Recoverable: well-formed body, not an HTTP error.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(!body["error"].as_str().unwrap().is_empty());
    assert!(h.store.list_ids().await.is_empty());

    // Temp page images were removed on the failure path too.
    let seen = h.seen_paths.lock().unwrap().clone();
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|p| !p.exists()));
}

#[tokio::test]
async fn ocr_failure_is_a_soft_failure() {
    let store = Arc::new(MemoryAnalysisStore::new());
    let ledger = Arc::new(MemoryAccessLedger::new(30));
    let ocr = StubOcr {
        output: Err("tesseract failed: boom".to_string()),
        seen_paths: Arc::new(Mutex::new(Vec::new())),
    };
    let state = AppState::new(
        store,
        ledger,
        Arc::new(StubRasterizer { pages: 1 }),
        Arc::new(ocr),
        Arc::new(KeywordClassifier::new()),
        Duration::from_secs(30),
    );
    let app = router(Arc::new(state));

    let (status, body) = post_json(&app, "/api/analyze", analyze_body("user-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Failed to analyze lease"));
}

/// OCR stub that blocks past any reasonable deadline.
struct SleepyOcr {
    delay: Duration,
}

impl OcrEngine for SleepyOcr {
    fn recognize_images(&self, images: &[PathBuf]) -> Result<OcrOutput, IngestError> {
        std::thread::sleep(self.delay);
        Ok(OcrOutput {
            full_text: "too late".to_string(),
            lines: Vec::new(),
            page_count: images.len() as u32,
        })
    }
}

#[tokio::test]
async fn ocr_timeout_is_a_soft_failure() {
    let store = Arc::new(MemoryAnalysisStore::new());
    let ledger = Arc::new(MemoryAccessLedger::new(30));
    let state = AppState::new(
        store.clone(),
        ledger,
        Arc::new(StubRasterizer { pages: 1 }),
        Arc::new(SleepyOcr {
            delay: Duration::from_millis(300),
        }),
        Arc::new(KeywordClassifier::new()),
        Duration::from_millis(10),
    );
    let app = router(Arc::new(state));

    let (status, body) = post_json(&app, "/api/analyze", analyze_body("user-1")).await;

    // Recoverable: well-formed body, not a 5xx.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("timed out"));
    assert!(store.list_ids().await.is_empty());
}

#[tokio::test]
async fn upload_named_like_a_page_image_is_not_swept_into_ocr() {
    let h = harness_with_text(&lease_text(), 2);
    let body = json!({
        // PDF content behind a page-image name: kind detection goes by
        // magic bytes, and the upload must stay out of the rendered set.
        "filename": "page-1.png",
        "file_base64": BASE64.encode(b"%PDF-1.4 fake"),
        "user_id": "user-1",
    });
    let (status, body) = post_json(&h.app, "/api/analyze", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["page_count"], 2);

    let seen = h.seen_paths.lock().unwrap().clone();
    assert_eq!(seen.len(), 2);
    // Only rendered pages reached OCR, never the upload itself.
    assert!(seen
        .iter()
        .all(|p| p.parent().unwrap().file_name().unwrap() == "pages"));
}

#[tokio::test]
async fn full_report_unknown_id_is_404() {
    let h = harness_with_text(&lease_text(), 2);
    let (status, body) = get(
        &h.app,
        "/api/full-report?analysis_id=missing&user_id=user-1",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn full_report_owner_gets_all_clauses() {
    let h = harness_with_text(&lease_text(), 2);
    let (_, body) = post_json(&h.app, "/api/analyze", analyze_body("user-1")).await;
    let analysis_id = body["data"]["analysis_id"].as_str().unwrap();

    let (status, body) = get(
        &h.app,
        &format!("/api/full-report?analysis_id={analysis_id}&user_id=user-1"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    // Full disclosure is unconditional once access is established.
    assert_eq!(body["data"]["shown_clauses"], body["data"]["total_clauses"]);
    assert_eq!(body["data"]["shown_clauses"], 10);
}

#[tokio::test]
async fn full_report_requires_grant_for_non_owner() {
    let h = harness_with_text(&lease_text(), 2);
    let (_, body) = post_json(&h.app, "/api/analyze", analyze_body("owner")).await;
    let analysis_id = body["data"]["analysis_id"].as_str().unwrap().to_string();

    // Stranger with no grant: denied.
    let (status, _) = get(
        &h.app,
        &format!("/api/full-report?analysis_id={analysis_id}&user_id=stranger"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The same stranger with an active grant may view it.
    h.ledger.record_analysis("stranger", "other-analysis").await;
    let (status, body) = get(
        &h.app,
        &format!("/api/full-report?analysis_id={analysis_id}&user_id=stranger"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["has_full_access"], true);
    assert_eq!(body["data"]["user_id"], "stranger");
}

#[tokio::test]
async fn quick_analyze_validates_input() {
    let h = harness_with_text(&lease_text(), 2);

    let (status, _) = post_json(
        &h.app,
        "/api/clause/quick-analyze",
        json!({ "clause_text": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        &h.app,
        "/api/clause/quick-analyze",
        json!({ "clause_text": "x".repeat(301) }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(
        &h.app,
        "/api/clause/quick-analyze",
        json!({ "clause_text": "x".repeat(300) }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["risk_level"], "safe");
}

#[tokio::test]
async fn quick_analyze_flags_dangerous_clause() {
    let h = harness_with_text(&lease_text(), 2);
    let (status, body) = post_json(
        &h.app,
        "/api/clause/quick-analyze",
        json!({ "clause_text": "Landlord may enter at any time without notice." }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["risk_level"], "danger");
    assert!(body["data"]["analysis"]
        .as_str()
        .unwrap()
        .contains("unrestricted access"));
}
