//! CV document ingestion — turns an uploaded file into plain text.

use std::path::Path;

use tracing::{debug, info};

use crate::error::IngestError;

pub const MIME_TEXT: &str = "text/plain";
pub const MIME_MARKDOWN: &str = "text/markdown";
pub const MIME_PDF: &str = "application/pdf";

/// Guess a MIME type from the file extension.
pub fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "txt" | "text" => Some(MIME_TEXT),
        "md" | "markdown" => Some(MIME_MARKDOWN),
        "pdf" => Some(MIME_PDF),
        _ => None,
    }
}

/// Read a document from disk and return its text.
///
/// `mime` is the declared type; when absent it is inferred from the file
/// extension. The format is checked before the file is read.
pub async fn ingest_document(path: &Path, mime: Option<&str>) -> Result<String, IngestError> {
    let mime = match mime {
        Some(m) => m.to_string(),
        None => mime_from_extension(path)
            .ok_or_else(|| {
                IngestError::UnsupportedFormat(format!("cannot infer type of {}", path.display()))
            })?
            .to_string(),
    };
    check_supported(&mime)?;

    let bytes = tokio::fs::read(path).await?;
    let text = ingest_bytes(&bytes, &mime)?;
    info!(path = %path.display(), mime = %mime, chars = text.len(), "Ingested CV document");
    Ok(text)
}

/// Decode an in-memory document of the given MIME type.
pub fn ingest_bytes(bytes: &[u8], mime: &str) -> Result<String, IngestError> {
    check_supported(mime)?;
    let text = std::str::from_utf8(bytes).map_err(|_| IngestError::InvalidEncoding)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    debug!(bytes = bytes.len(), "Decoded text document");
    Ok(text.trim().to_string())
}

fn check_supported(mime: &str) -> Result<(), IngestError> {
    // Parameters such as "; charset=utf-8" are ignored.
    let essence = mime.split(';').next().unwrap_or_default().trim();
    if essence.eq_ignore_ascii_case(MIME_TEXT) || essence.eq_ignore_ascii_case(MIME_MARKDOWN) {
        Ok(())
    } else {
        Err(IngestError::UnsupportedFormat(mime.to_string()))
    }
}
