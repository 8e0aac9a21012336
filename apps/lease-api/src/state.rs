//! Application state for the lease API.

use std::sync::Arc;
use std::time::Duration;

use lease_ingest::{OcrEngine, PopplerRasterizer, Rasterizer, TesseractOcr};
use risk_engine::{ClauseClassifier, KeywordClassifier, WeightedRandomClassifier};

use crate::store::{AccessLedger, AnalysisStore, MemoryAccessLedger, MemoryAnalysisStore};

pub struct AppState {
    pub store: Arc<dyn AnalysisStore>,
    pub ledger: Arc<dyn AccessLedger>,
    pub rasterizer: Arc<dyn Rasterizer>,
    pub ocr: Arc<dyn OcrEngine>,
    pub bulk_classifier: Arc<dyn ClauseClassifier>,
    pub ocr_timeout: Duration,
}

impl AppState {
    /// Build state from the environment: `LEASE_ACCESS_DAYS` (default 30),
    /// `LEASE_OCR_TIMEOUT_SECS` (default 120), `LEASE_OCR_LANG` (default
    /// "eng"), and `LEASE_CLASSIFIER` ("weighted" or "keyword").
    pub fn from_env() -> Self {
        let access_days = env_parse("LEASE_ACCESS_DAYS", 30);
        let timeout_secs = env_parse("LEASE_OCR_TIMEOUT_SECS", 120);
        let language =
            std::env::var("LEASE_OCR_LANG").unwrap_or_else(|_| "eng".to_string());

        let bulk_classifier: Arc<dyn ClauseClassifier> =
            match std::env::var("LEASE_CLASSIFIER").as_deref() {
                Ok("keyword") => Arc::new(KeywordClassifier::new()),
                _ => Arc::new(WeightedRandomClassifier::new()),
            };

        Self::new(
            Arc::new(MemoryAnalysisStore::new()),
            Arc::new(MemoryAccessLedger::new(access_days)),
            Arc::new(PopplerRasterizer::new()),
            Arc::new(TesseractOcr::new(language)),
            bulk_classifier,
            Duration::from_secs(timeout_secs),
        )
    }

    pub fn new(
        store: Arc<dyn AnalysisStore>,
        ledger: Arc<dyn AccessLedger>,
        rasterizer: Arc<dyn Rasterizer>,
        ocr: Arc<dyn OcrEngine>,
        bulk_classifier: Arc<dyn ClauseClassifier>,
        ocr_timeout: Duration,
    ) -> Self {
        Self {
            store,
            ledger,
            rasterizer,
            ocr,
            bulk_classifier,
            ocr_timeout,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
