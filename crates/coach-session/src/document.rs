use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Magic bytes every PDF file starts with
pub const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("not a PDF file")]
    NotPdf,

    #[error("failed to extract text: {0}")]
    Extraction(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot attach a document while a reply is in progress")]
    Busy,
}

pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Text of an uploaded document, prefixed to every prompt until cleared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContext {
    pub name: String,
    pub text: String,
}

impl DocumentContext {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// An empty extraction keeps the name but adds nothing to prompts
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Turns raw file bytes into plain text
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, bytes: Vec<u8>) -> Result<String, DocumentError>;
}

/// Page-ordered text extraction for PDF files
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    async fn extract(&self, bytes: Vec<u8>) -> Result<String, DocumentError> {
        if !looks_like_pdf(&bytes) {
            return Err(DocumentError::NotPdf);
        }

        // Parsing is CPU bound and may panic on broken font tables
        let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| DocumentError::Extraction(format!("extraction task failed: {}", e)))?;

        extracted.map_err(|e| DocumentError::Extraction(e.to_string()))
    }
}

/// Read a file for upload, returning its display name and contents
pub async fn read_document(path: impl AsRef<Path>) -> Result<(String, Vec<u8>), DocumentError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|source| DocumentError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok((name, bytes))
}
