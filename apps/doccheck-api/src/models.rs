//! Request/response models for the doccheck API

use serde::{Deserialize, Serialize};

use shared_types::EvaluationResult;

use crate::error::ApiError;

/// Successful check response: one result per rule, in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    pub results: Vec<EvaluationResult>,
}

/// Document parts pulled out of the multipart form.
#[derive(Debug)]
pub struct UploadedDocument {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

/// Decode the `rules` multipart field, a JSON-encoded array of strings
/// (the upload form sends `JSON.stringify(rules)`).
pub fn decode_rules(raw: &str) -> Result<Vec<String>, ApiError> {
    serde_json::from_str(raw).map_err(|e| {
        ApiError::InvalidRequest(format!("rules field is not a JSON string array: {}", e))
    })
}
