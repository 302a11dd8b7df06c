use harvest_scrape::{extract_fields, parse_thread, write_fields, write_thread};

const SNAPSHOT: &str = include_str!("fixtures/homepage_snapshot.html");
const THREAD: &str = include_str!("fixtures/thread.json");

#[test]
fn market_quotes_from_snapshot() {
    let fields = extract_fields(SNAPSHOT);

    assert_eq!(fields.quotes.len(), 2);
    assert_eq!(fields.quotes[0].symbol, "DJIA");
    assert_eq!(fields.quotes[0].position, "46,138.10");
    assert_eq!(fields.quotes[0].change_pct, "+0.52%");
    assert_eq!(fields.quotes[1].symbol, "S&P 500");
    assert_eq!(fields.quotes[1].change_pct, "-0.11%");
}

#[test]
fn news_items_from_snapshot() {
    let fields = extract_fields(SNAPSHOT);

    assert_eq!(fields.news.len(), 2);
    assert_eq!(fields.news[0].timestamp, "32 Min Ago");
    assert_eq!(fields.news[0].headline, "Stocks edge higher ahead of Fed week");
    assert_eq!(
        fields.news[0].link,
        "https://www.cnbc.com/2025/09/21/markets.html"
    );
    assert_eq!(fields.news[1].link, "");
}

#[test]
fn field_csvs_are_written_with_headers() {
    let dir = tempfile::tempdir().unwrap();
    let fields = extract_fields(SNAPSHOT);
    let (market, news) = write_fields(&fields, dir.path()).unwrap();

    let market = std::fs::read_to_string(market).unwrap();
    let mut lines = market.lines();
    assert_eq!(lines.next(), Some("Symbol,StockPosition,ChangePct"));
    assert_eq!(lines.next(), Some("DJIA,\"46,138.10\",+0.52%"));

    let news = std::fs::read_to_string(news).unwrap();
    assert!(news.starts_with("Timestamp,Headline,Link\n"));
    assert!(news.contains("1 Hour Ago,\"Oil slips, \"\"demand\"\" worries linger\","));
}

#[test]
fn missing_sections_give_header_only_csvs() {
    let dir = tempfile::tempdir().unwrap();
    let fields = extract_fields("<html><body></body></html>");
    let (market, news) = write_fields(&fields, dir.path()).unwrap();
    assert_eq!(
        std::fs::read_to_string(market).unwrap(),
        "Symbol,StockPosition,ChangePct\n"
    );
    assert_eq!(
        std::fs::read_to_string(news).unwrap(),
        "Timestamp,Headline,Link\n"
    );
}

#[test]
fn comment_tree_is_walked_in_pre_order() {
    let response: serde_json::Value = serde_json::from_str(THREAD).unwrap();
    let thread = parse_thread(&response).unwrap();

    assert_eq!(thread.post.id, "1abcde");
    assert_eq!(thread.post.score, 42);
    assert_eq!(
        thread.post.permalink,
        "https://www.reddit.com/r/rust/comments/1abcde/parsing_twocolumn_pdfs/"
    );

    let ids: Vec<&str> = thread
        .comments
        .iter()
        .map(|c| c.comment_id.as_str())
        .collect();
    assert_eq!(ids, ["c1", "c2", "c3", "c4"]);

    let parents: Vec<&str> = thread
        .comments
        .iter()
        .map(|c| c.parent_id.as_str())
        .collect();
    assert_eq!(parents, ["1abcde", "c1", "c2", "1abcde"]);

    assert_eq!(thread.comments[2].depth, 2);
    // depth absent in the payload
    assert_eq!(thread.comments[3].depth, 0);
    assert!(thread.comments.iter().all(|c| c.post_id == "1abcde"));
}

#[test]
fn thread_files_keep_non_ascii() {
    let dir = tempfile::tempdir().unwrap();
    let response: serde_json::Value = serde_json::from_str(THREAD).unwrap();
    let thread = parse_thread(&response).unwrap();
    let files = write_thread(&thread, dir.path()).unwrap();

    let json = std::fs::read_to_string(&files.comments_json).unwrap();
    assert!(json.contains("naïvely"));
    assert!(json.starts_with("[\n  {"));

    let csv = std::fs::read_to_string(&files.comments_csv).unwrap();
    assert_eq!(csv.lines().count(), 5);
    assert!(csv.contains("\"Watch out for running headers, they repeat, every page.\""));

    let post = std::fs::read_to_string(&files.post_csv).unwrap();
    assert!(post.starts_with("id,subreddit,title,author,selftext,score,upvote_ratio"));
}
