//! Document ingestion: turns uploaded files into plain text for the skill extractor.
//!
//! Extraction failures never reach the caller as errors: an unreadable file degrades to
//! empty text, which the parser reports as `parsed: false`. Only an unsupported file type
//! is rejected.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    PlainText,
}

impl DocumentFormat {
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "txt" | "md" => Some(DocumentFormat::PlainText),
            _ => None,
        }
    }
}

#[async_trait]
pub trait DocumentTextExtractor: Send + Sync {
    async fn extract(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, AppError>;
}

/// Picks the extraction strategy from the file extension.
pub struct FileTextExtractor;

#[async_trait]
impl DocumentTextExtractor for FileTextExtractor {
    async fn extract(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, AppError> {
        let format = DocumentFormat::from_file_name(file_name).ok_or_else(|| {
            AppError::UnsupportedFormat(format!(
                "'{file_name}' is not a supported document (expected .pdf, .txt or .md)"
            ))
        })?;

        let text = match format {
            DocumentFormat::PlainText => String::from_utf8_lossy(&bytes).into_owned(),
            DocumentFormat::Pdf => extract_pdf_text(file_name, bytes).await,
        };

        debug!(file_name, chars = text.len(), "Document text extracted");
        Ok(text)
    }
}

/// pdf-extract is CPU-bound and may panic on malformed input, so it runs on a blocking thread.
async fn extract_pdf_text(file_name: &str, bytes: Vec<u8>) -> String {
    let result =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await;

    match result {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!(file_name, "PDF text extraction failed: {e}");
            String::new()
        }
        Err(e) => {
            warn!(file_name, "PDF extraction task aborted: {e}");
            String::new()
        }
    }
}
