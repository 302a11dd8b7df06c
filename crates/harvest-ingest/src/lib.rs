use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

pub mod download;

// Re-export domain types for convenience
pub use harvest_core::{ExtractionResult, HeritageRecord, SkipStats};
use harvest_core::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_USER_AGENT, DEFAULT_Y_TOLERANCE};
use harvest_parsing::ParsingConfig;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status} while fetching {url}")]
    Status { status: u16, url: String },
    #[error("document not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF extraction error: {0}")]
    Parsing(#[from] harvest_parsing::ParsingError),
    #[error("extraction task failed: {0}")]
    Task(String),
    #[cfg(not(feature = "pdf"))]
    #[error("PDF support not compiled in (enable the `pdf` feature of harvest-ingest)")]
    NoPdfSupport,
}

/// Where the heritage list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Url(String),
}

impl Source {
    /// `http://` and `https://` strings are URLs; anything else is a path.
    pub fn parse(input: &str) -> Self {
        let lower = input.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(input.to_string())
        } else {
            Source::Path(PathBuf::from(input))
        }
    }
}

/// Knobs for one extraction run.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub parsing: ParsingConfig,
    pub y_tolerance: f32,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            parsing: ParsingConfig::default(),
            y_tolerance: DEFAULT_Y_TOLERANCE,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

/// Retrieve the document (downloading URLs to a temp file) and extract records.
///
/// Any retrieval or PDF failure aborts the run; no partial result is returned.
pub async fn extract_heritage(
    source: &Source,
    options: &IngestOptions,
) -> Result<ExtractionResult, IngestError> {
    match source {
        Source::Path(path) => {
            if !path.exists() {
                return Err(IngestError::NotFound(path.clone()));
            }
            run_blocking(path.clone(), options.clone()).await
        }
        Source::Url(url) => {
            let client = download::build_client(&options.user_agent, options.timeout)?;
            let file = download::download_to_temp(&client, url).await?;
            let result = run_blocking(file.path().to_path_buf(), options.clone()).await;
            drop(file);
            result
        }
    }
}

async fn run_blocking(
    path: PathBuf,
    options: IngestOptions,
) -> Result<ExtractionResult, IngestError> {
    tokio::task::spawn_blocking(move || extract_pdf(&path, &options))
        .await
        .map_err(|e| IngestError::Task(e.to_string()))?
}

#[cfg(feature = "pdf")]
fn extract_pdf(path: &Path, options: &IngestOptions) -> Result<ExtractionResult, IngestError> {
    let backend = harvest_pdf_mupdf::MupdfBackend::new().with_y_tolerance(options.y_tolerance);
    let extractor = harvest_parsing::HeritageExtractor::with_config(options.parsing.clone());
    let result = extractor.extract_via_backend(path, &backend)?;
    tracing::info!(
        path = %path.display(),
        pages = result.pages,
        records = result.records.len(),
        "heritage extraction complete"
    );
    Ok(result)
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_path: &Path, _options: &IngestOptions) -> Result<ExtractionResult, IngestError> {
    Err(IngestError::NoPdfSupport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_parse_distinguishes_urls() {
        assert_eq!(
            Source::parse("https://whc.unesco.org/archive/list00-eng.pdf"),
            Source::Url("https://whc.unesco.org/archive/list00-eng.pdf".to_string())
        );
        assert_eq!(
            Source::parse("HTTP://example.org/a.pdf"),
            Source::Url("HTTP://example.org/a.pdf".to_string())
        );
        assert_eq!(
            Source::parse("data/list.pdf"),
            Source::Path(PathBuf::from("data/list.pdf"))
        );
    }

    #[test]
    fn default_options_use_browser_agent() {
        let options = IngestOptions::default();
        assert!(options.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(options.timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn missing_local_file_is_fatal() {
        let source = Source::Path(PathBuf::from("/definitely/not/here.pdf"));
        let err = extract_heritage(&source, &IngestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::NotFound(_)));
    }
}
