//! Lease OCR & risk analysis API.
//!
//! Wires the ingestion, segmentation, and classification crates into an
//! axum service with in-memory result storage and tiered disclosure.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod state;
pub mod store;

pub use state::AppState;

/// Build the application router with CORS and request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/full-report", get(handlers::full_report))
        .route("/api/clause/quick-analyze", post(handlers::quick_analyze))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
