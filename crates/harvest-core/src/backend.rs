use std::path::Path;

use thiserror::Error;

use crate::PageColumns;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text extraction backends.
///
/// Implementors split every page at its horizontal midpoint and return the
/// text of each half as physical lines in top-to-bottom order. Line
/// classification and record assembly live in `harvest_parsing`.
pub trait PdfBackend: Send + Sync {
    /// Extract the two-column text of every page of a PDF file.
    fn extract_columns(&self, path: &Path) -> Result<Vec<PageColumns>, BackendError>;
}
