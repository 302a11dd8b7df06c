use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::ScrapeError;
use crate::snapshot::{LATEST_NEWS, MARKETS_BANNER};

pub const MARKET_HEADER: [&str; 3] = ["Symbol", "StockPosition", "ChangePct"];
pub const NEWS_HEADER: [&str; 3] = ["Timestamp", "Headline", "Link"];

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static LIST_ITEM: Lazy<Selector> = Lazy::new(|| Selector::parse("li").unwrap());
static CARD_SYMBOL: Lazy<Selector> = Lazy::new(|| Selector::parse(".MarketCard-symbol").unwrap());
static CARD_POSITION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".MarketCard-stockPosition").unwrap());
static CARD_CHANGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".MarketCard-changesPct").unwrap());
static NEWS_HEADLINE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".LatestNews-headline").unwrap());
static NEWS_TIMESTAMP: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".LatestNews-timestamp").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketQuote {
    pub symbol: String,
    pub position: String,
    pub change_pct: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsItem {
    pub timestamp: String,
    pub headline: String,
    /// Empty when the headline carries no `href`.
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFields {
    pub quotes: Vec<MarketQuote>,
    pub news: Vec<NewsItem>,
}

/// Concatenate the element's text nodes, each trimmed, skipping blanks.
fn stripped_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).filter(|s| !s.is_empty()).collect()
}

fn first<'a>(el: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    el.select(sel).next()
}

fn market_quote(link: ElementRef<'_>) -> Option<MarketQuote> {
    let symbol = first(link, &CARD_SYMBOL)?;
    let position = first(link, &CARD_POSITION)?;
    let change = first(link, &CARD_CHANGE)?;
    Some(MarketQuote {
        symbol: stripped_text(symbol),
        position: stripped_text(position).replace('"', ""),
        change_pct: stripped_text(change),
    })
}

fn news_item(item: ElementRef<'_>) -> Option<NewsItem> {
    let headline = first(item, &NEWS_HEADLINE)?;
    let timestamp = first(item, &NEWS_TIMESTAMP)?;
    Some(NewsItem {
        timestamp: stripped_text(timestamp),
        headline: stripped_text(headline),
        link: headline.value().attr("href").unwrap_or_default().to_string(),
    })
}

/// Pull market quotes and news items out of a snapshot.
///
/// Entries missing any of their required parts are skipped. A missing
/// section simply yields no rows.
pub fn extract_fields(html: &str) -> PageFields {
    let document = Html::parse_document(html);
    let mut fields = PageFields::default();

    match document.select(&MARKETS_BANNER).next() {
        Some(banner) => {
            fields.quotes = banner.select(&ANCHOR).filter_map(market_quote).collect();
        }
        None => tracing::warn!("markets banner missing from snapshot"),
    }

    match document.select(&LATEST_NEWS).next() {
        Some(section) => {
            fields.news = section.select(&LIST_ITEM).filter_map(news_item).collect();
        }
        None => tracing::warn!("latest news section missing from snapshot"),
    }

    tracing::debug!(
        quotes = fields.quotes.len(),
        news = fields.news.len(),
        "snapshot fields extracted"
    );
    fields
}

/// Write `market_data.csv` and `news_data.csv` into `processed_dir`.
pub fn write_fields(
    fields: &PageFields,
    processed_dir: &Path,
) -> Result<(PathBuf, PathBuf), ScrapeError> {
    let market_path = processed_dir.join("market_data.csv");
    let news_path = processed_dir.join("news_data.csv");

    let market_rows: Vec<Vec<&str>> = fields
        .quotes
        .iter()
        .map(|q| vec![q.symbol.as_str(), q.position.as_str(), q.change_pct.as_str()])
        .collect();
    harvest_reporting::write_table_csv(&market_path, &MARKET_HEADER, &market_rows)?;

    let news_rows: Vec<Vec<&str>> = fields
        .news
        .iter()
        .map(|n| vec![n.timestamp.as_str(), n.headline.as_str(), n.link.as_str()])
        .collect();
    harvest_reporting::write_table_csv(&news_path, &NEWS_HEADER, &news_rows)?;

    Ok((market_path, news_path))
}
