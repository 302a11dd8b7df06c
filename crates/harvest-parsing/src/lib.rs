//! Heritage-list reconstruction from two-column page text.
//!
//! Each page region is a loose sequence of lines: country headings in
//! capitals, site names, and ID/year and criteria columns wrapped across
//! several physical lines. The pipeline normalizes every line, classifies
//! it, and assembles a record from each candidate plus a lookahead window.

use std::path::Path;

use thiserror::Error;

pub mod assemble;
pub mod classify;
pub mod config;
pub mod dedup;
pub mod extractor;
pub mod normalize;
pub mod patterns;

pub use assemble::{Assembly, CriteriaBuckets, RejectReason, assemble_record};
pub use classify::{LineKind, classify_line};
pub use config::{ListOverride, ParsingConfig, ParsingConfigBuilder};
pub use dedup::dedup_records;
pub use extractor::{HeritageExtractor, LineOutcome, ScanState, Step};
pub use normalize::normalize_line;
// Re-export domain types from core (canonical definitions live there)
pub use harvest_core::{
    BackendError, ExtractionResult, HeritageRecord, HeritageType, PageColumns, PdfBackend,
    SkipStats,
};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("backend error: {0}")]
    Backend(#[from] harvest_core::BackendError),
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Extract heritage records from a PDF file using the given backend for text extraction.
///
/// Pipeline:
/// 1. Extract left/right column text per page via `backend`
/// 2. Normalize lines and drop page boilerplate
/// 3. Scan lines, tracking the current country heading
/// 4. Assemble a record from each candidate and its lookahead window
/// 5. Drop duplicate `(country, site_name)` pairs
pub fn extract_heritage(
    pdf_path: &Path,
    backend: &dyn PdfBackend,
) -> Result<ExtractionResult, ParsingError> {
    HeritageExtractor::new().extract_via_backend(pdf_path, backend)
}
