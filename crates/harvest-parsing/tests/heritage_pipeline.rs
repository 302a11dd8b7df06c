//! End-to-end runs of the heritage pipeline over synthetic page text.
//!
//! A fake backend stands in for MuPDF so no PDF is needed.

use std::path::Path;

use harvest_parsing::{
    BackendError, HeritageExtractor, HeritageType, PageColumns, ParsingConfigBuilder, PdfBackend,
    extract_heritage,
};

struct FakeBackend {
    pages: Vec<PageColumns>,
}

impl PdfBackend for FakeBackend {
    fn extract_columns(&self, _path: &Path) -> Result<Vec<PageColumns>, BackendError> {
        Ok(self.pages.clone())
    }
}

struct BrokenBackend;

impl PdfBackend for BrokenBackend {
    fn extract_columns(&self, _path: &Path) -> Result<Vec<PageColumns>, BackendError> {
        Err(BackendError::OpenError("not a PDF".into()))
    }
}

fn lines(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn sample_document() -> Vec<PageColumns> {
    vec![
        PageColumns::new(
            0,
            lines(&[
                "Wwwwooorrrlllddd  Heritage  Centre",
                "Contracting State Party   Name of Property   ID No.   Year of Inscription",
                "AUSTRALIA",
                "Kakadu National Park",
                "147 rev 1981-1987-1992",
                "C (i)(vi)",
                "N (ii)(iii)(iv)",
                "",
                "Great Barrier Reef",
                "154 1981",
                "N (i)(ii)(iii)(iv)",
            ]),
            lines(&[
                "Willandra Lakes Region",
                "167 1981",
                "C (iii)",
                "N (i)",
                "",
                "BELGIUM",
                "Flemish Béguinages",
                "855 1998",
                "C (ii)(iii)(iv)",
            ]),
        ),
        PageColumns::new(
            1,
            lines(&[
                "Notes: (1) Extension of the property",
                "Flemish Béguinages",
                "855 1998",
                "C (ii)(iii)(iv)",
            ]),
            lines(&[
                "YEAR OF INSCRIPTION",
                "a wrapped continuation of a long title",
                "without any identifier",
                "Page footer text",
            ]),
        ),
    ]
}

#[test]
fn extracts_records_in_document_order() {
    let result = HeritageExtractor::new().extract_from_pages(&sample_document());

    let rows: Vec<(&str, &str, HeritageType, &str)> = result
        .records
        .iter()
        .map(|r| {
            (
                r.country.as_str(),
                r.site_name.as_str(),
                r.heritage_type,
                r.year.as_str(),
            )
        })
        .collect();

    assert_eq!(
        rows,
        vec![
            ("Australia", "Kakadu National Park", HeritageType::Mixed, "1981"),
            ("Australia", "Great Barrier Reef", HeritageType::Natural, "1981"),
            ("Australia", "Willandra Lakes Region", HeritageType::Mixed, "1981"),
            ("Belgium", "Flemish Béguinages", HeritageType::Cultural, "1998"),
        ]
    );
    assert_eq!(result.pages, 2);
}

#[test]
fn duplicates_across_pages_keep_the_first() {
    let result = HeritageExtractor::new().extract_from_pages(&sample_document());
    assert_eq!(result.skip_stats.duplicates, 1);
    let count = result
        .records
        .iter()
        .filter(|r| r.site_name == "Flemish Béguinages")
        .count();
    assert_eq!(count, 1);
}

#[test]
fn boilerplate_and_wrapped_lines_produce_nothing() {
    let result = HeritageExtractor::new().extract_from_pages(&sample_document());
    assert!(result.skip_stats.header_footer >= 4);
    assert!(result.skip_stats.no_id_year >= 2);
    assert!(
        result
            .records
            .iter()
            .all(|r| !r.site_name.to_lowercase().contains("inscription"))
    );
}

#[test]
fn header_line_never_becomes_country_or_candidate() {
    let pages = vec![PageColumns::new(
        0,
        lines(&["YEAR OF INSCRIPTION", "year of inscription 12 1990", "C (i)"]),
        vec![],
    )];
    let result = HeritageExtractor::new().extract_from_pages(&pages);
    assert!(result.records.is_empty());
    assert_eq!(result.skip_stats.country_headings, 0);
    assert_eq!(result.skip_stats.header_footer, 2);
    assert_eq!(result.skip_stats.rejected_candidates(), 0);
}

#[test]
fn wider_id_window_reaches_distant_identifier() {
    let pages = vec![PageColumns::new(
        0,
        lines(&[
            "PERU",
            "City of Cuzco",
            "continued",
            "continued",
            "continued",
            "continued",
            "continued",
            "273 1983",
            "C (iii)(iv)",
        ]),
        vec![],
    )];

    let narrow = HeritageExtractor::new().extract_from_pages(&pages);
    assert!(narrow.records.iter().all(|r| r.site_name != "City of Cuzco"));

    let config = ParsingConfigBuilder::new()
        .id_window(7)
        .type_window(8)
        .build()
        .unwrap();
    let wide = HeritageExtractor::with_config(config).extract_from_pages(&pages);
    assert_eq!(wide.records[0].site_name, "City of Cuzco");
    assert_eq!(wide.records[0].year, "1983");
}

#[test]
fn backend_pages_flow_through_extract_heritage() -> anyhow::Result<()> {
    let backend = FakeBackend {
        pages: sample_document(),
    };
    let result = extract_heritage(Path::new("list.pdf"), &backend)?;
    assert_eq!(result.records.len(), 4);
    Ok(())
}

#[test]
fn backend_failure_is_fatal() {
    let err = extract_heritage(Path::new("list.pdf"), &BrokenBackend).unwrap_err();
    assert!(err.to_string().contains("not a PDF"));
}
