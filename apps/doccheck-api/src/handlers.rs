//! HTTP handlers for the doccheck API

use axum::{
    extract::{Multipart, State},
    Json,
};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{decode_rules, CheckResponse, UploadedDocument};
use crate::orchestrator;
use crate::state::AppState;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Check an uploaded document against exactly three rules.
///
/// Multipart form: a `pdf` file field (the upload form's name; `document`
/// is accepted as an alias) and a `rules` field holding a JSON array of
/// three strings.
pub async fn check(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<CheckResponse>, ApiError> {
    let mut document: Option<UploadedDocument> = None;
    let mut raw_rules: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("malformed multipart body: {}", e)))?
    {
        match field.name() {
            Some("pdf") | Some("document") => {
                let filename = field.file_name().map(|s| s.to_string());
                let content_type = field.content_type().map(|s| s.to_string());
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::InvalidRequest(format!("failed to read document field: {}", e))
                })?;
                document = Some(UploadedDocument {
                    bytes: bytes.to_vec(),
                    filename,
                    content_type,
                });
            }
            Some("rules") => {
                let text = field.text().await.map_err(|e| {
                    ApiError::InvalidRequest(format!("failed to read rules field: {}", e))
                })?;
                raw_rules = Some(text);
            }
            _ => {} // unknown fields are ignored
        }
    }

    let document =
        document.ok_or_else(|| ApiError::InvalidRequest("missing document field".to_string()))?;
    let raw_rules =
        raw_rules.ok_or_else(|| ApiError::InvalidRequest("missing rules field".to_string()))?;

    // Cheap validation first: reject a bad rule list before touching the
    // document at all.
    let rules = rule_engine::normalize_rules(&decode_rules(&raw_rules)?)?;

    let request_id = Uuid::new_v4();
    let document_hash = hex::encode(Sha256::digest(&document.bytes));
    tracing::info!(
        "check {}: document {} ({} bytes, {:?}), {} rules",
        request_id,
        &document_hash[..12],
        document.bytes.len(),
        document.filename,
        rules.len()
    );

    // Extraction is CPU-bound; keep it off the async workers.
    let max_bytes = state.config.max_document_bytes;
    let content_type = document.content_type.clone();
    let bytes = document.bytes;
    let extracted = tokio::task::spawn_blocking(move || {
        doc_ingest::extract(&bytes, content_type.as_deref(), max_bytes)
    })
    .await
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("extraction task failed: {}", e)))??;

    if extracted.partial {
        tracing::warn!(
            "check {}: partial extraction, {} of {} pages readable",
            request_id,
            extracted.page_texts.iter().filter(|t| !t.is_empty()).count(),
            extracted.pages
        );
    }

    let text: Arc<str> = Arc::from(extracted.text.as_str());
    let results = orchestrator::evaluate_rules(
        state.engine.clone(),
        text,
        &rules,
        state.config.rule_timeout,
        state.config.request_timeout,
    )
    .await
    .map_err(|_| ApiError::Timeout)?;

    tracing::info!("check {}: completed, {} results", request_id, results.len());

    Ok(Json(CheckResponse { results }))
}
