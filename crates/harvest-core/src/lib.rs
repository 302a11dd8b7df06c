use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod backend;
pub mod config_file;
pub mod layout;

pub use backend::{BackendError, PdfBackend};
pub use layout::{DEFAULT_Y_TOLERANCE, Rect, TextFragment, group_fragments_into_lines};

/// Browser-like User-Agent; some hosts refuse the default client string.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36";

/// Request timeout for every outbound fetch.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Which half of a page a line was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Left,
    Right,
}

impl Column {
    /// 0 for the left half, 1 for the right half.
    pub fn index(self) -> usize {
        match self {
            Column::Left => 0,
            Column::Right => 1,
        }
    }
}

/// Text of one page, split at the horizontal midpoint into two regions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageColumns {
    /// 0-based page index.
    pub page: usize,
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl PageColumns {
    pub fn new(page: usize, left: Vec<String>, right: Vec<String>) -> Self {
        Self { page, left, right }
    }

    /// Regions in reading order: left half first, then right half.
    pub fn regions(&self) -> [(Column, &[String]); 2] {
        [
            (Column::Left, self.left.as_slice()),
            (Column::Right, self.right.as_slice()),
        ]
    }
}

/// A single physical line of text from one region of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLine {
    pub text: String,
    pub page: usize,
    pub column: Column,
    /// Position within the region's line sequence.
    pub index: usize,
}

/// Flatten pages into raw lines in reading order (page, then left/right, then top-down).
pub fn flatten_pages(pages: &[PageColumns]) -> Vec<RawLine> {
    let mut lines = Vec::new();
    for page in pages {
        for (column, region) in page.regions() {
            for (index, text) in region.iter().enumerate() {
                lines.push(RawLine {
                    text: text.clone(),
                    page: page.page,
                    column,
                    index,
                });
            }
        }
    }
    lines
}

/// Heritage category of an inscribed site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeritageType {
    Cultural,
    Natural,
    Mixed,
}

impl HeritageType {
    pub fn as_str(self) -> &'static str {
        match self {
            HeritageType::Cultural => "Cultural",
            HeritageType::Natural => "Natural",
            HeritageType::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for HeritageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeritageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cultural" => Ok(HeritageType::Cultural),
            "Natural" => Ok(HeritageType::Natural),
            "Mixed" => Ok(HeritageType::Mixed),
            other => Err(format!("unknown heritage type: {other}")),
        }
    }
}

/// A fully assembled heritage-list entry.
///
/// Constructed once per accepted candidate line and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeritageRecord {
    pub country: String,
    pub site_name: String,
    #[serde(rename = "type")]
    pub heritage_type: HeritageType,
    /// Earliest inscription year, always four digits in 1900–2099.
    pub year: String,
}

/// Counts of lines that did not become records, by reason.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipStats {
    pub total_lines: usize,
    pub header_footer: usize,
    pub country_headings: usize,
    pub marker_lines: usize,
    pub no_id_year: usize,
    pub no_year: usize,
    pub no_type: usize,
    pub bad_name: usize,
    pub no_country: usize,
    pub duplicates: usize,
}

impl SkipStats {
    /// Candidates that were assembled but rejected.
    pub fn rejected_candidates(&self) -> usize {
        self.no_id_year + self.no_year + self.no_type + self.bad_name + self.no_country
    }
}

/// Result of extracting heritage records from a document.
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    pub records: Vec<HeritageRecord>,
    pub skip_stats: SkipStats,
    pub pages: usize,
}
