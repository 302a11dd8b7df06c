//! Collection helpers that sit beside the heritage extractor: a homepage
//! snapshot, field extraction from that snapshot, a forum thread fetcher and
//! a hub dataset inspector. Each one writes to or reads from the data
//! directory and nothing else.

use std::time::Duration;

use thiserror::Error;

pub mod dataset;
pub mod fields;
pub mod snapshot;
pub mod thread;

pub use dataset::{DatasetSummary, inspect_dataset};
pub use fields::{MarketQuote, NewsItem, PageFields, extract_fields, write_fields};
pub use snapshot::{Snapshot, fetch_snapshot, isolate_sections};
pub use thread::{
    ForumComment, ForumPost, Thread, ThreadFiles, fetch_thread, parse_thread, write_thread,
};

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status} while fetching {url}")]
    Status { status: u16, url: String },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected response shape: {0}")]
    Shape(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Export(#[from] harvest_reporting::ExportError),
    #[error("parse task failed: {0}")]
    Task(String),
}

/// Build the shared HTTP client (browser User-Agent, fixed timeout).
pub fn build_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client, ScrapeError> {
    Ok(reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?)
}

/// GET `url` and return the body, treating any non-2xx status as an error.
pub(crate) async fn get_text(client: &reqwest::Client, url: &str) -> Result<String, ScrapeError> {
    let resp = client.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(resp.text().await?)
}
