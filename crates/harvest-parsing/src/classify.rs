use crate::config::ParsingConfig;
use crate::patterns::COUNTRY_LINE_RE;

/// What a normalized line is, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Running header, footer, column title or legend.
    HeaderFooter,
    /// All-caps country heading; carries the title-cased name.
    Country(String),
    /// Criteria continuation or other all-caps residue.
    CriteriaMarker,
    /// Possible first line of a site entry.
    Candidate,
}

/// Classify one normalized line.
pub fn classify_line(line: &str, config: &ParsingConfig) -> LineKind {
    if is_header_footer(line, config) {
        LineKind::HeaderFooter
    } else if is_country_line(line, config) {
        LineKind::Country(title_case(line))
    } else if is_criteria_marker(line) {
        LineKind::CriteriaMarker
    } else {
        LineKind::Candidate
    }
}

pub fn is_header_footer(line: &str, config: &ParsingConfig) -> bool {
    config.header_patterns.iter().any(|re| re.is_match(line))
}

/// All-caps with limited punctuation and free of reserved boilerplate tokens.
pub fn is_country_line(line: &str, config: &ParsingConfig) -> bool {
    COUNTRY_LINE_RE.is_match(line)
        && !config
            .reserved_tokens
            .iter()
            .any(|tok| line.contains(tok.as_str()))
}

fn is_criteria_marker(line: &str) -> bool {
    line.contains("C (") || line.contains("N (") || is_all_upper(line)
}

/// At least one cased letter and no lowercase ones.
pub(crate) fn is_all_upper(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}

/// Uppercase the first letter of every word, lowercase the rest.
///
/// A letter starts a word when the previous character is not a letter, so
/// `"CÔTE D'IVOIRE"` becomes `"Côte D'Ivoire"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParsingConfigBuilder;

    fn cfg() -> ParsingConfig {
        ParsingConfig::default()
    }

    #[test]
    fn header_patterns_win_regardless_of_case() {
        for line in [
            "Year of Inscription",
            "YEAR OF INSCRIPTION",
            "ID No. Year",
            "WORLD HERITAGE CENTRE",
            "Notes: see below",
            "Contracting State Party",
            "C: Cultural property",
        ] {
            assert_eq!(classify_line(line, &cfg()), LineKind::HeaderFooter, "{line}");
        }
    }

    #[test]
    fn country_heading_is_title_cased() {
        assert_eq!(
            classify_line("BOSNIA AND HERZEGOVINA", &cfg()),
            LineKind::Country("Bosnia And Herzegovina".to_string())
        );
        assert_eq!(
            classify_line("CÔTE D'IVOIRE", &cfg()),
            LineKind::Country("Côte D'Ivoire".to_string())
        );
        assert_eq!(
            classify_line("ST. KITTS & NEVIS", &cfg()),
            LineKind::Country("St. Kitts & Nevis".to_string())
        );
    }

    #[test]
    fn reserved_tokens_block_country_headings() {
        assert!(!is_country_line("WORLD HERITAGE", &cfg()));
        assert!(!is_country_line("SESSIONS", &cfg()));
        // substring match: "ID" inside a word still disqualifies
        assert!(!is_country_line("CANDIDATE", &cfg()));
    }

    #[test]
    fn country_heading_charset_is_limited() {
        assert!(!is_country_line("GERMANY 1", &cfg()));
        assert!(!is_country_line("Germany", &cfg()));
        assert!(!is_country_line("C (III)", &cfg()));
        assert!(!is_country_line("A", &cfg()));
        assert!(is_country_line("GUINEA-BISSAU", &cfg()));
    }

    #[test]
    fn country_lines_only_contain_allowed_characters() {
        let allowed = |c: char| c.is_uppercase() || " -'’&/.".contains(c);
        for line in ["FRANCE", "SAO TOME/PRINCIPE", "X-Y'Z.&", "NOTES", "ITALY2"] {
            if is_country_line(line, &cfg()) {
                assert!(line.chars().all(allowed), "{line}");
                for tok in crate::patterns::RESERVED_COUNTRY_TOKENS {
                    assert!(!line.contains(tok), "{line}");
                }
            }
        }
    }

    #[test]
    fn custom_reserved_token() {
        let config = ParsingConfigBuilder::new()
            .add_reserved_token("ANNEX".to_string())
            .build()
            .unwrap();
        assert!(!is_country_line("ANNEX", &config));
        assert!(is_country_line("ANNEX", &cfg()));
    }

    #[test]
    fn criteria_markers_are_skipped() {
        assert_eq!(classify_line("C (iii)(iv)", &cfg()), LineKind::CriteriaMarker);
        assert_eq!(classify_line("Site N (ii)", &cfg()), LineKind::CriteriaMarker);
        assert_eq!(classify_line("(III)(IV) 1987", &cfg()), LineKind::CriteriaMarker);
    }

    #[test]
    fn everything_else_is_a_candidate() {
        assert_eq!(
            classify_line("Historic Centre 660 1987", &cfg()),
            LineKind::Candidate
        );
        assert_eq!(classify_line("123", &cfg()), LineKind::Candidate);
    }

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("UNITED KINGDOM"), "United Kingdom");
        assert_eq!(title_case("GUINEA-BISSAU"), "Guinea-Bissau");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn all_upper_needs_a_cased_letter() {
        assert!(is_all_upper("ABC 12"));
        assert!(!is_all_upper("123"));
        assert!(!is_all_upper("ABc"));
    }
}
