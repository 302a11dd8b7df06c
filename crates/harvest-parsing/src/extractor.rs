use std::path::Path;

use harvest_core::{
    ExtractionResult, HeritageRecord, PageColumns, PdfBackend, RawLine, SkipStats, flatten_pages,
};

use crate::assemble::{Assembly, RejectReason, assemble_record};
use crate::classify::{LineKind, classify_line, is_header_footer};
use crate::config::ParsingConfig;
use crate::dedup::dedup_records;
use crate::normalize::normalize_line;
use crate::ParsingError;

/// The only state carried across lines: the country heading in force.
///
/// Lives for one document and persists across regions and pages, since a
/// country's entries routinely continue into the next column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    pub current_country: Option<String>,
}

/// What happened at one cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    HeaderFooter,
    Country(String),
    Marker,
    Record(HeritageRecord),
    Rejected(RejectReason),
}

/// One scan step: the outcome and how far the cursor moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub outcome: LineOutcome,
    pub advance: usize,
}

/// A configurable heritage-list extraction pipeline.
///
/// Holds a [`ParsingConfig`] and exposes each pipeline step as a method.
pub struct HeritageExtractor {
    config: ParsingConfig,
}

impl Default for HeritageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl HeritageExtractor {
    /// Create an extractor with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParsingConfig::default(),
        }
    }

    /// Create an extractor with a custom configuration.
    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the current config.
    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Normalize a region's lines, dropping blanks and page boilerplate (step 1).
    pub fn prepare_region<'a>(
        &self,
        raw: impl IntoIterator<Item = &'a str>,
        stats: &mut SkipStats,
    ) -> Vec<String> {
        let mut lines = Vec::new();
        for text in raw {
            stats.total_lines += 1;
            let line = normalize_line(text);
            if line.is_empty() {
                continue;
            }
            if is_header_footer(&line, &self.config) {
                stats.header_footer += 1;
                continue;
            }
            lines.push(line);
        }
        lines
    }

    /// Decide what the line at `cursor` is and how far to advance (step 2).
    pub fn step(&self, state: &ScanState, lines: &[String], cursor: usize) -> Step {
        let line = &lines[cursor];
        let outcome = match classify_line(line, &self.config) {
            LineKind::HeaderFooter => LineOutcome::HeaderFooter,
            LineKind::Country(name) => LineOutcome::Country(name),
            LineKind::CriteriaMarker => LineOutcome::Marker,
            LineKind::Candidate => {
                match assemble_record(
                    line,
                    state.current_country.as_deref(),
                    &lines[cursor + 1..],
                    &self.config,
                ) {
                    Assembly::Accepted(record) => LineOutcome::Record(record),
                    Assembly::Rejected(reason) => LineOutcome::Rejected(reason),
                }
            }
        };
        let advance = match outcome {
            LineOutcome::Record(_) => self.config.accept_advance,
            _ => 1,
        };
        Step { outcome, advance }
    }

    /// Scan one region's prepared lines, appending emitted records.
    pub fn scan_region(
        &self,
        lines: &[String],
        state: &mut ScanState,
        stats: &mut SkipStats,
        records: &mut Vec<HeritageRecord>,
    ) {
        let mut cursor = 0;
        while cursor < lines.len() {
            let step = self.step(state, lines, cursor);
            match step.outcome {
                LineOutcome::HeaderFooter => stats.header_footer += 1,
                LineOutcome::Country(name) => {
                    tracing::debug!(country = %name, "country heading");
                    stats.country_headings += 1;
                    state.current_country = Some(name);
                }
                LineOutcome::Marker => stats.marker_lines += 1,
                LineOutcome::Record(record) => records.push(record),
                LineOutcome::Rejected(reason) => {
                    tracing::trace!(line = %lines[cursor], reason = reason.as_str(), "candidate rejected");
                    match reason {
                        RejectReason::NoIdYear => stats.no_id_year += 1,
                        RejectReason::NoYear => stats.no_year += 1,
                        RejectReason::NoType => stats.no_type += 1,
                        RejectReason::BadName => stats.bad_name += 1,
                        RejectReason::NoCountry => stats.no_country += 1,
                    }
                }
            }
            cursor += step.advance;
        }
    }

    /// Run the pipeline over raw lines already in reading order.
    ///
    /// Lookahead windows never cross a region boundary; the country context does.
    pub fn extract_from_lines(&self, lines: &[RawLine]) -> ExtractionResult {
        let mut stats = SkipStats::default();
        let mut state = ScanState::default();
        let mut records = Vec::new();

        for region in lines.chunk_by(|a, b| a.page == b.page && a.column == b.column) {
            let prepared = self.prepare_region(region.iter().map(|l| l.text.as_str()), &mut stats);
            let before = records.len();
            self.scan_region(&prepared, &mut state, &mut stats, &mut records);
            tracing::debug!(
                page = region[0].page,
                column = region[0].column.index(),
                lines = prepared.len(),
                records = records.len() - before,
                "region scanned"
            );
        }

        let (records, duplicates) = dedup_records(records);
        stats.duplicates = duplicates;
        let pages = lines
            .iter()
            .map(|l| l.page)
            .collect::<std::collections::BTreeSet<_>>()
            .len();

        ExtractionResult {
            records,
            skip_stats: stats,
            pages,
        }
    }

    /// Run the pipeline over per-page column text.
    pub fn extract_from_pages(&self, pages: &[PageColumns]) -> ExtractionResult {
        let mut result = self.extract_from_lines(&flatten_pages(pages));
        result.pages = pages.len();
        result
    }

    /// Extract column text via `backend`, then run the pipeline.
    pub fn extract_via_backend(
        &self,
        path: &Path,
        backend: &dyn PdfBackend,
    ) -> Result<ExtractionResult, ParsingError> {
        let pages = backend.extract_columns(path)?;
        tracing::debug!(path = %path.display(), pages = pages.len(), "extracted page text");
        Ok(self.extract_from_pages(&pages))
    }
}
