//! Doccheck API - backend for document rule verification
//!
//! One endpoint does the work: `POST /api/check` takes a document upload
//! plus three natural-language rules and returns a verdict, excerpt,
//! justification, and confidence score for each rule.

pub mod error;
pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router.
pub fn app(state: Arc<AppState>) -> Router {
    // CORS configuration for web clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Body limit sits above the document bound so the precise
    // DocumentTooLarge error is the one callers see.
    let body_limit = state.config.max_document_bytes + 64 * 1024;

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/check", post(handlers::check))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
