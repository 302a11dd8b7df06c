use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::ScrapeError;

const SITE_ROOT: &str = "https://www.reddit.com";

pub const POST_HEADER: [&str; 11] = [
    "id",
    "subreddit",
    "title",
    "author",
    "selftext",
    "score",
    "upvote_ratio",
    "num_comments",
    "created_utc",
    "permalink",
    "url",
];

pub const COMMENT_HEADER: [&str; 9] = [
    "post_id",
    "comment_id",
    "parent_id",
    "author",
    "body",
    "score",
    "created_utc",
    "depth",
    "permalink",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForumPost {
    pub id: String,
    pub subreddit: String,
    pub title: String,
    pub author: String,
    pub selftext: String,
    pub score: i64,
    pub upvote_ratio: f64,
    pub num_comments: u64,
    pub created_utc: f64,
    pub permalink: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForumComment {
    pub post_id: String,
    pub comment_id: String,
    /// The post id for top-level comments, otherwise the parent comment id.
    pub parent_id: String,
    pub author: String,
    pub body: String,
    pub score: i64,
    pub created_utc: f64,
    pub depth: u64,
    pub permalink: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thread {
    pub post: ForumPost,
    /// Depth-first, pre-order.
    pub comments: Vec<ForumComment>,
}

/// The JSON listing URL for a post page.
pub fn json_url(post_url: &str) -> String {
    format!("{}/.json", post_url.trim_end_matches('/'))
}

fn str_field(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn i64_field(data: &Value, key: &str) -> i64 {
    data.get(key).and_then(Value::as_i64).unwrap_or_default()
}

fn f64_field(data: &Value, key: &str) -> f64 {
    data.get(key).and_then(Value::as_f64).unwrap_or_default()
}

fn absolute_permalink(data: &Value) -> String {
    match data.get("permalink").and_then(Value::as_str) {
        Some(p) if !p.is_empty() => format!("{SITE_ROOT}{p}"),
        _ => String::new(),
    }
}

fn listing_children(listing: &Value) -> &[Value] {
    listing
        .pointer("/data/children")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn parse_post(data: &Value) -> ForumPost {
    ForumPost {
        id: str_field(data, "id"),
        subreddit: str_field(data, "subreddit"),
        title: str_field(data, "title"),
        author: str_field(data, "author"),
        selftext: str_field(data, "selftext"),
        score: i64_field(data, "score"),
        upvote_ratio: f64_field(data, "upvote_ratio"),
        num_comments: data
            .get("num_comments")
            .and_then(Value::as_u64)
            .unwrap_or_default(),
        created_utc: f64_field(data, "created_utc"),
        permalink: absolute_permalink(data),
        url: str_field(data, "url"),
    }
}

/// Rebuild a post and its full comment tree from the two-listing response.
pub fn parse_thread(response: &Value) -> Result<Thread, ScrapeError> {
    let post_data = response
        .get(0)
        .map(listing_children)
        .and_then(|children| children.first())
        .and_then(|child| child.get("data"))
        .ok_or_else(|| ScrapeError::Shape("no post in first listing".to_string()))?;
    let post = parse_post(post_data);

    let top_level = response.get(1).map(listing_children).unwrap_or_default();

    // (node, parent id); children pushed in reverse to keep pre-order
    let mut stack: Vec<(&Value, String)> = top_level
        .iter()
        .rev()
        .map(|node| (node, post.id.clone()))
        .collect();
    let mut comments = Vec::new();

    while let Some((node, parent_id)) = stack.pop() {
        match node.get("kind").and_then(Value::as_str) {
            Some("t1") => {}
            Some("more") => {
                tracing::trace!(parent = %parent_id, "skipping collapsed replies");
                continue;
            }
            other => {
                tracing::warn!(kind = ?other, "skipping comment node of unknown kind");
                continue;
            }
        }
        let Some(data) = node.get("data") else {
            continue;
        };

        let comment = ForumComment {
            post_id: post.id.clone(),
            comment_id: str_field(data, "id"),
            parent_id,
            author: str_field(data, "author"),
            body: str_field(data, "body"),
            score: i64_field(data, "score"),
            created_utc: f64_field(data, "created_utc"),
            depth: data.get("depth").and_then(Value::as_u64).unwrap_or(0),
            permalink: absolute_permalink(data),
        };

        // "replies" is an empty string when there are none
        if let Some(replies) = data.get("replies").filter(|r| r.is_object()) {
            for child in listing_children(replies).iter().rev() {
                stack.push((child, comment.comment_id.clone()));
            }
        }
        comments.push(comment);
    }

    tracing::debug!(post = %post.id, comments = comments.len(), "thread parsed");
    Ok(Thread { post, comments })
}

pub async fn fetch_thread(client: &reqwest::Client, post_url: &str) -> Result<Thread, ScrapeError> {
    let url = json_url(post_url);
    let body = crate::get_text(client, &url).await?;
    let response: Value = serde_json::from_str(&body)?;
    let thread = parse_thread(&response)?;
    tracing::info!(
        url = %url,
        comments = thread.comments.len(),
        "fetched thread"
    );
    Ok(thread)
}

impl ForumPost {
    fn csv_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.subreddit.clone(),
            self.title.clone(),
            self.author.clone(),
            self.selftext.clone(),
            self.score.to_string(),
            self.upvote_ratio.to_string(),
            self.num_comments.to_string(),
            self.created_utc.to_string(),
            self.permalink.clone(),
            self.url.clone(),
        ]
    }
}

impl ForumComment {
    fn csv_row(&self) -> Vec<String> {
        vec![
            self.post_id.clone(),
            self.comment_id.clone(),
            self.parent_id.clone(),
            self.author.clone(),
            self.body.clone(),
            self.score.to_string(),
            self.created_utc.to_string(),
            self.depth.to_string(),
            self.permalink.clone(),
        ]
    }
}

/// Paths written by [`write_thread`].
#[derive(Debug, Clone)]
pub struct ThreadFiles {
    pub post_csv: PathBuf,
    pub post_json: PathBuf,
    pub comments_csv: PathBuf,
    pub comments_json: PathBuf,
}

/// Write the post and comments as CSV + JSON pairs into `out_dir`.
pub fn write_thread(thread: &Thread, out_dir: &Path) -> Result<ThreadFiles, ScrapeError> {
    let files = ThreadFiles {
        post_csv: out_dir.join("reddit_post.csv"),
        post_json: out_dir.join("reddit_post.json"),
        comments_csv: out_dir.join("reddit_comments.csv"),
        comments_json: out_dir.join("reddit_comments.json"),
    };

    harvest_reporting::write_table_csv(&files.post_csv, &POST_HEADER, &[thread.post.csv_row()])?;
    harvest_reporting::write_json(&files.post_json, &thread.post)?;

    let rows: Vec<Vec<String>> = thread.comments.iter().map(ForumComment::csv_row).collect();
    harvest_reporting::write_table_csv(&files.comments_csv, &COMMENT_HEADER, &rows)?;
    harvest_reporting::write_json(&files.comments_json, &thread.comments)?;

    Ok(files)
}
