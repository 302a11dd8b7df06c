//! Named pattern constants behind every classification rule.
//!
//! Kept in one place so the rules can be audited and overridden through
//! [`crate::ParsingConfigBuilder`].

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Boilerplate that repeats on every page (running headers, column titles,
/// legends, footnotes). Matched case-insensitively anywhere in a line.
pub const HEADER_FOOTER_PATTERNS: &[&str] = &[
    r"world\s+heritage\s+centre",
    r"convention",
    r"name\s+of\s+property",
    r"criteria\s+for\s+the\s+inclusion",
    r"notes?:",
    r"sessions\s+of\s+the\s+world\s+heritage\s+committee",
    r"n:\s*natural\s+property",
    r"c:\s*cultural\s+property",
    r"contracting\s+state\s+party",
    r"id\.?\s*no\.",
    r"year\s+of\s+inscription",
];

/// Tokens that disqualify an all-caps line from being a country heading.
pub const RESERVED_COUNTRY_TOKENS: &[&str] = &[
    "HERITAGE",
    "CONVENTION",
    "CENTRE",
    "PROPERTY",
    "NOTES",
    "CRITERIA",
    "SESSION",
    "ID",
    "YEAR",
];

/// Uppercase letters plus space, hyphen, apostrophes, ampersand, slash and period.
pub const COUNTRY_LINE_PATTERN: &str = r"^\p{Lu}[\p{Lu} \-'’&/.]+$";

/// `<id> [rev] <year>[-<year>...] [(Note ...)]`, case-insensitive.
pub const ID_YEAR_PATTERN: &str =
    r"(?i)(?P<id>\d+)\s+(?P<year>(?:rev\s*)?\d{4}(?:-\d{4})*(?:\s*\(Note.*?\))?)";

/// Plausible inscription years.
pub const YEAR_PATTERN: &str = r"\b((?:19|20)\d{2})\b";

/// A category letter followed by one or more parenthesised roman numerals,
/// e.g. `C (iii)(iv)` or `N (ii)`.
pub const TYPE_BLOCK_PATTERN: &str = r"(?i)(?P<t>[CN])\s*\((?:[ivx]+(?:\)\(|\)))+";

/// One parenthesised criterion inside a type block.
pub const CRITERION_PATTERN: &str = r"(?i)\(([ivx]+)\)";

/// Start of a type block leaking into a site-name column (case-sensitive).
pub const NAME_TYPE_BLOCK_PATTERN: &str = r"[CN]\s*\([ivx]";

pub(crate) static DEFAULT_HEADER_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    HEADER_FOOTER_PATTERNS
        .iter()
        .map(|p| compile_header_pattern(p).unwrap())
        .collect()
});

pub(crate) static COUNTRY_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(COUNTRY_LINE_PATTERN).unwrap());
pub(crate) static ID_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(ID_YEAR_PATTERN).unwrap());
pub(crate) static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(YEAR_PATTERN).unwrap());
pub(crate) static TYPE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(TYPE_BLOCK_PATTERN).unwrap());
pub(crate) static CRITERION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(CRITERION_PATTERN).unwrap());
pub(crate) static NAME_TYPE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(NAME_TYPE_BLOCK_PATTERN).unwrap());

/// Compile a header/footer pattern; these always match case-insensitively.
pub(crate) fn compile_header_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_patterns_compile() {
        assert_eq!(DEFAULT_HEADER_RES.len(), HEADER_FOOTER_PATTERNS.len());
        Lazy::force(&COUNTRY_LINE_RE);
        Lazy::force(&ID_YEAR_RE);
        Lazy::force(&YEAR_RE);
        Lazy::force(&TYPE_BLOCK_RE);
        Lazy::force(&CRITERION_RE);
        Lazy::force(&NAME_TYPE_BLOCK_RE);
    }

    #[test]
    fn type_block_spans_chained_criteria() {
        let m = TYPE_BLOCK_RE.find("see C (iii)(iv) here").unwrap();
        assert_eq!(m.as_str(), "C (iii)(iv)");
        let m = TYPE_BLOCK_RE.find("N(ii)").unwrap();
        assert_eq!(m.as_str(), "N(ii)");
    }

    #[test]
    fn id_year_captures_range_and_note() {
        let caps = ID_YEAR_RE.captures("156 rev 1979-1982 (Note 3)").unwrap();
        assert_eq!(&caps["id"], "156");
        assert_eq!(&caps["year"], "rev 1979-1982 (Note 3)");
    }
}
