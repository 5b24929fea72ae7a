//! Format detection and text extraction.
//!
//! PDF is the primary format. Whole-document extraction goes through
//! pdf-extract; when that fails on a document lopdf can still load, we fall
//! back to per-page extraction and keep whatever pages yield text.

use shared_types::ExtractedDocument;

use crate::error::IngestError;
use crate::normalize::{normalize_text, paginate};

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

/// Decide how to treat the payload from its magic bytes and declared type.
pub fn sniff_kind(bytes: &[u8], declared_type: Option<&str>) -> Option<DocumentKind> {
    if bytes.starts_with(PDF_MAGIC) {
        return Some(DocumentKind::Pdf);
    }

    let declared = declared_type.unwrap_or("").to_lowercase();
    if declared.contains("pdf") {
        // Claimed PDF without the magic header; let the parser reject it
        // with a precise error.
        return Some(DocumentKind::Pdf);
    }
    if declared.starts_with("text/") || declared.contains("json") || declared.contains("xml") {
        return Some(DocumentKind::PlainText);
    }

    // Undeclared payloads are accepted as text when they plausibly are text.
    if !bytes.contains(&0) && std::str::from_utf8(bytes).is_ok() {
        return Some(DocumentKind::PlainText);
    }

    None
}

pub fn extract_pdf(bytes: &[u8]) -> Result<ExtractedDocument, IngestError> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| IngestError::Unreadable(format!("failed to parse PDF: {}", e)))?;

    if doc.is_encrypted() {
        return Err(IngestError::Unreadable("PDF is encrypted".to_string()));
    }

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    if page_numbers.is_empty() {
        return Err(IngestError::Unreadable("PDF has no pages".to_string()));
    }

    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(raw) if !raw.trim().is_empty() => {
            let (text, page_texts) = paginate(&raw, page_numbers.len());
            Ok(ExtractedDocument {
                pages: page_numbers.len() as u32,
                text,
                page_texts,
                partial: false,
            })
        }
        whole => {
            if let Err(e) = &whole {
                tracing::debug!("whole-document extraction failed ({}), trying per page", e);
            }
            extract_pdf_per_page(&doc, &page_numbers)
        }
    }
}

/// Best-effort per-page extraction for documents pdf-extract chokes on.
fn extract_pdf_per_page(
    doc: &lopdf::Document,
    page_numbers: &[u32],
) -> Result<ExtractedDocument, IngestError> {
    let mut page_texts = Vec::with_capacity(page_numbers.len());
    let mut unreadable_pages = 0usize;

    for &page in page_numbers {
        match doc.extract_text(&[page]) {
            Ok(raw) => {
                let text = normalize_text(&raw);
                if text.is_empty() {
                    unreadable_pages += 1;
                }
                page_texts.push(text);
            }
            Err(e) => {
                tracing::debug!("page {} unreadable: {}", page, e);
                unreadable_pages += 1;
                page_texts.push(String::new());
            }
        }
    }

    if page_texts.iter().all(|t| t.is_empty()) {
        return Err(IngestError::Unreadable(
            "no text could be extracted from any page".to_string(),
        ));
    }

    let text = page_texts
        .iter()
        .filter(|t| !t.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");

    tracing::debug!(
        "per-page extraction recovered {}/{} pages",
        page_numbers.len() - unreadable_pages,
        page_numbers.len()
    );

    Ok(ExtractedDocument {
        pages: page_numbers.len() as u32,
        text,
        page_texts,
        partial: true,
    })
}

pub fn extract_plain_text(bytes: &[u8]) -> Result<ExtractedDocument, IngestError> {
    let raw = String::from_utf8_lossy(bytes);
    let text = normalize_text(&raw).replace('\u{000C}', "\n").trim().to_string();

    if text.is_empty() {
        return Err(IngestError::Unreadable(
            "document contains no text".to_string(),
        ));
    }

    Ok(ExtractedDocument::single_page(text))
}
