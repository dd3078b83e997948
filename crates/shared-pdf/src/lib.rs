//! Document text extraction
//!
//! Turns uploaded bytes into plain text for analysis. Extraction never fails
//! outward: callers get an empty string and decide how to report it, so an
//! unreadable upload is never confused with a document that has no findings.

use std::panic;

use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Not a PDF: missing %PDF header")]
    NotPdf,

    #[error("PDF parse error: {0}")]
    ParseError(String),

    #[error("PDF extractor panicked")]
    ExtractorPanic,
}

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    /// Detect the format from the file extension (case-insensitive)
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "txt" => Some(DocumentKind::Text),
            _ => None,
        }
    }
}

/// Check for the `%PDF` magic bytes
pub fn is_pdf(data: &[u8]) -> bool {
    data.len() > 4 && &data[0..4] == b"%PDF"
}

/// Extract text, returning an empty string on any failure
pub fn extract_text(data: &[u8], kind: DocumentKind) -> String {
    match kind {
        DocumentKind::Text => decode_text(data),
        DocumentKind::Pdf => match try_extract_pdf(data) {
            Ok(text) => text,
            Err(e) => {
                error!("Error extracting text from PDF: {}", e);
                String::new()
            }
        },
    }
}

/// Extract PDF text, surfacing the failure reason
pub fn try_extract_pdf(data: &[u8]) -> Result<String, ExtractionError> {
    if !is_pdf(data) {
        return Err(ExtractionError::NotPdf);
    }

    // pdf-extract panics on some malformed streams
    let result = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data))
        .map_err(|_| ExtractionError::ExtractorPanic)?;
    let text = result.map_err(|e| ExtractionError::ParseError(e.to_string()))?;

    debug!(bytes = data.len(), chars = text.len(), "extracted PDF text");
    Ok(text)
}

fn decode_text(data: &[u8]) -> String {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    match std::str::from_utf8(data) {
        Ok(text) => text.to_string(),
        Err(e) => {
            warn!("Upload is not valid UTF-8 ({}), decoding lossily", e);
            String::from_utf8_lossy(data).into_owned()
        }
    }
}
