use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;

use crate::IngestError;

/// Build the HTTP client used for document retrieval.
pub fn build_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client, IngestError> {
    Ok(reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?)
}

/// Download `url` into a temporary `.pdf` file that is removed on drop.
///
/// Any non-2xx status is an error; no retries.
pub async fn download_to_temp(
    client: &reqwest::Client,
    url: &str,
) -> Result<NamedTempFile, IngestError> {
    let resp = client.get(url).send().await?;

    if !resp.status().is_success() {
        return Err(IngestError::Status {
            status: resp.status().as_u16(),
            url: url.to_string(),
        });
    }

    let bytes = resp.bytes().await?;
    let mut file = tempfile::Builder::new()
        .prefix("harvest-")
        .suffix(".pdf")
        .tempfile()?;
    file.write_all(&bytes)?;
    file.flush()?;

    tracing::info!(url, bytes = bytes.len(), "downloaded document");
    Ok(file)
}
