use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::ScrapeError;

pub const DEFAULT_SNAPSHOT_URL: &str = "https://www.cnbc.com/world/?region=world";

pub(crate) static MARKETS_BANNER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#HomePageInternational-MarketsBanner-1").unwrap());
pub(crate) static LATEST_NEWS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".LatestNews-isHomePage").unwrap());

/// The two homepage sections worth keeping, as outer HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub markets_banner: Option<String>,
    pub latest_news: Option<String>,
}

impl Snapshot {
    /// Each present section on its own line.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for section in [&self.markets_banner, &self.latest_news].into_iter().flatten() {
            out.push_str(section);
            out.push('\n');
        }
        out
    }
}

/// Keep only the markets banner and the first latest-news block.
pub fn isolate_sections(html: &str) -> Snapshot {
    let document = Html::parse_document(html);
    let markets_banner = document.select(&MARKETS_BANNER).next().map(|el| el.html());
    let latest_news = document.select(&LATEST_NEWS).next().map(|el| el.html());

    if markets_banner.is_none() {
        tracing::warn!("markets banner not found in page");
    }
    if latest_news.is_none() {
        tracing::warn!("latest news section not found in page");
    }

    Snapshot {
        markets_banner,
        latest_news,
    }
}

/// `<data_dir>/raw_data/web_data.html`
pub fn snapshot_path(data_dir: &Path) -> PathBuf {
    data_dir.join("raw_data").join("web_data.html")
}

/// `<data_dir>/processed_data`
pub fn processed_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("processed_data")
}

pub async fn fetch_snapshot(client: &reqwest::Client, url: &str) -> Result<Snapshot, ScrapeError> {
    let body = crate::get_text(client, url).await?;
    tracing::info!(url, bytes = body.len(), "fetched page");

    // scraper's DOM is !Send
    tokio::task::spawn_blocking(move || isolate_sections(&body))
        .await
        .map_err(|e| ScrapeError::Task(e.to_string()))
}

/// Write the snapshot under `data_dir`, creating `raw_data/` and `processed_data/`.
pub fn write_snapshot(snapshot: &Snapshot, data_dir: &Path) -> Result<PathBuf, ScrapeError> {
    let path = snapshot_path(data_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::create_dir_all(processed_dir(data_dir))?;
    std::fs::write(&path, snapshot.to_markup())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <nav>menu</nav>
        <div id="HomePageInternational-MarketsBanner-1"><a href="/q/DJIA">DJIA</a></div>
        <div class="LatestNews-isHomePage"><ul><li>one</li></ul></div>
        <div class="LatestNews-isHomePage"><ul><li>two</li></ul></div>
    </body></html>"#;

    #[test]
    fn keeps_banner_and_first_news_block() {
        let snap = isolate_sections(PAGE);
        let banner = snap.markets_banner.as_deref().unwrap();
        assert!(banner.starts_with("<div id=\"HomePageInternational-MarketsBanner-1\""));
        let news = snap.latest_news.as_deref().unwrap();
        assert!(news.contains("one"));
        assert!(!news.contains("two"));

        let markup = snap.to_markup();
        assert_eq!(markup.lines().count(), 2);
        assert!(!markup.contains("menu"));
    }

    #[test]
    fn missing_sections_are_omitted() {
        let snap = isolate_sections("<html><body><p>nothing</p></body></html>");
        assert_eq!(snap, Snapshot::default());
        assert_eq!(snap.to_markup(), "");
    }

    #[test]
    fn write_creates_data_layout() {
        let dir = tempfile::tempdir().unwrap();
        let snap = isolate_sections(PAGE);
        let path = write_snapshot(&snap, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("raw_data").join("web_data.html"));
        assert!(dir.path().join("processed_data").is_dir());
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("MarketsBanner"));
    }
}
