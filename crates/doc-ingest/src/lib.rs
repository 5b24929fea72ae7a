//! Document ingestion: raw upload bytes to normalized text.
//!
//! Pure transform with no side effects. Oversize payloads fail fast before
//! any parsing work; partially-malformed documents return best-effort text
//! with `partial: true` instead of failing outright.

pub mod error;
pub mod normalize;
pub mod parser;

pub use error::IngestError;
pub use shared_types::ExtractedDocument;

use parser::DocumentKind;

/// Extract text from raw document bytes.
///
/// `declared_type` is the content type the caller claimed for the payload;
/// it is a hint, the magic bytes win when they disagree.
pub fn extract(
    bytes: &[u8],
    declared_type: Option<&str>,
    max_bytes: usize,
) -> Result<ExtractedDocument, IngestError> {
    if bytes.len() > max_bytes {
        return Err(IngestError::TooLarge {
            size: bytes.len(),
            limit: max_bytes,
        });
    }
    if bytes.is_empty() {
        return Err(IngestError::Unreadable("empty document".to_string()));
    }

    match parser::sniff_kind(bytes, declared_type) {
        Some(DocumentKind::Pdf) => parser::extract_pdf(bytes),
        Some(DocumentKind::PlainText) => parser::extract_plain_text(bytes),
        None => Err(IngestError::Unreadable(
            "unsupported document format".to_string(),
        )),
    }
}
