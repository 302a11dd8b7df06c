use once_cell::sync::Lazy;
use regex::Regex;

use harvest_core::{HeritageRecord, HeritageType};

use crate::config::ParsingConfig;
use crate::patterns::{CRITERION_RE, ID_YEAR_RE, NAME_TYPE_BLOCK_RE, TYPE_BLOCK_RE, YEAR_RE};

/// Selection criteria collected from a type block, split by category letter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriaBuckets {
    /// Roman numerals following `C`, lowercased, in order of appearance.
    pub cultural: Vec<String>,
    /// Roman numerals following `N`, lowercased, in order of appearance.
    pub natural: Vec<String>,
}

impl CriteriaBuckets {
    pub fn heritage_type(&self) -> Option<HeritageType> {
        match (self.cultural.is_empty(), self.natural.is_empty()) {
            (false, false) => Some(HeritageType::Mixed),
            (false, true) => Some(HeritageType::Cultural),
            (true, false) => Some(HeritageType::Natural),
            (true, true) => None,
        }
    }
}

/// Why a candidate line did not become a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NoIdYear,
    NoYear,
    NoType,
    BadName,
    NoCountry,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::NoIdYear => "no_id_year",
            RejectReason::NoYear => "no_year",
            RejectReason::NoType => "no_type",
            RejectReason::BadName => "bad_name",
            RejectReason::NoCountry => "no_country",
        }
    }
}

/// Outcome of assembling one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assembly {
    Accepted(HeritageRecord),
    Rejected(RejectReason),
}

/// Assemble a record from a candidate line and the lines that follow it.
///
/// The identifier/year token is searched in the candidate plus the next
/// `id_window` lines; type blocks in the candidate plus the next
/// `type_window` lines. Nothing here fails: malformed input is a reject.
pub fn assemble_record(
    candidate: &str,
    country: Option<&str>,
    following: &[String],
    config: &ParsingConfig,
) -> Assembly {
    let id_text = window_text(candidate, following, config.id_window);
    let Some(caps) = ID_YEAR_RE.captures(&id_text) else {
        return Assembly::Rejected(RejectReason::NoIdYear);
    };
    let Some(year) = parse_year(&caps["year"]) else {
        return Assembly::Rejected(RejectReason::NoYear);
    };

    let type_text = window_text(candidate, following, config.type_window);
    let Some(heritage_type) = collect_criteria(&type_text).heritage_type() else {
        return Assembly::Rejected(RejectReason::NoType);
    };

    let site_name = clean_site_name(candidate);
    if !is_plausible_name(&site_name) {
        return Assembly::Rejected(RejectReason::BadName);
    }

    let Some(country) = country.filter(|c| !c.is_empty()) else {
        return Assembly::Rejected(RejectReason::NoCountry);
    };

    Assembly::Accepted(HeritageRecord {
        country: country.to_string(),
        site_name,
        heritage_type,
        year,
    })
}

/// Candidate plus up to `extra` following lines, newline-joined.
fn window_text(candidate: &str, following: &[String], extra: usize) -> String {
    let take = extra.min(following.len());
    let mut text = String::from(candidate);
    for line in &following[..take] {
        text.push('\n');
        text.push_str(line);
    }
    text
}

/// Earliest plausible year (1900–2099) in `year_text`.
pub fn parse_year(year_text: &str) -> Option<String> {
    YEAR_RE
        .captures_iter(year_text)
        .map(|c| c[1].to_string())
        .min()
}

/// Collect every `C (..)` / `N (..)` block in `text` into buckets.
pub fn collect_criteria(text: &str) -> CriteriaBuckets {
    let mut buckets = CriteriaBuckets::default();
    for block in TYPE_BLOCK_RE.captures_iter(text) {
        let whole = block.get(0).map_or("", |m| m.as_str());
        let criteria = CRITERION_RE
            .captures_iter(whole)
            .map(|c| c[1].to_lowercase());
        if block["t"].eq_ignore_ascii_case("c") {
            buckets.cultural.extend(criteria);
        } else {
            buckets.natural.extend(criteria);
        }
    }
    buckets
}

/// Strip stray ID/year numbers and edge punctuation from a name-column line.
pub fn clean_site_name(line: &str) -> String {
    static FOUR_DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}\b").unwrap());
    static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+\b").unwrap());

    let name = FOUR_DIGIT_RE.replace_all(line, "");
    let name = NUMBER_RE.replace_all(&name, "");
    let name = name.trim_matches([' ', ',', ';', '.', '-']);
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// At least two letters, and no type block hiding in the name.
fn is_plausible_name(name: &str) -> bool {
    static TWO_LETTERS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z].*[A-Za-z]").unwrap());
    TWO_LETTERS_RE.is_match(name) && !NAME_TYPE_BLOCK_RE.is_match(name)
}
