use std::io::Write;
use std::path::Path;

use harvest_core::{ExtractionResult, SkipStats};
use harvest_scrape::{DatasetSummary, PageFields, Thread};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the extraction summary after PDF parsing.
pub fn print_extraction_summary(
    w: &mut dyn Write,
    source_name: &str,
    result: &ExtractionResult,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "Extracting heritage sites from {}...", source_name)?;
    writeln!(
        w,
        "Found {} sites across {} pages",
        result.records.len(),
        result.pages
    )?;

    let stats = &result.skip_stats;
    let skipped = stats.header_footer + stats.rejected_candidates() + stats.duplicates;
    if skipped > 0 {
        let line = skip_line(stats);
        if color.enabled() {
            writeln!(w, "{}", line.dimmed())?;
        } else {
            writeln!(w, "{}", line)?;
        }
    }
    Ok(())
}

fn skip_line(stats: &SkipStats) -> String {
    format!(
        "(Skipped {} header/footer lines, {} rejected candidates, {} duplicates)",
        stats.header_footer,
        stats.rejected_candidates(),
        stats.duplicates
    )
}

/// Per-reason reject counts, shown with `-v`.
pub fn print_reject_breakdown(w: &mut dyn Write, stats: &SkipStats) -> std::io::Result<()> {
    writeln!(w, "  lines scanned:     {}", stats.total_lines)?;
    writeln!(w, "  country headings:  {}", stats.country_headings)?;
    writeln!(w, "  criteria markers:  {}", stats.marker_lines)?;
    writeln!(w, "  no id/year:        {}", stats.no_id_year)?;
    writeln!(w, "  no year:           {}", stats.no_year)?;
    writeln!(w, "  no type:           {}", stats.no_type)?;
    writeln!(w, "  bad name:          {}", stats.bad_name)?;
    writeln!(w, "  no country:        {}", stats.no_country)?;
    Ok(())
}

pub fn print_saved(
    w: &mut dyn Write,
    rows: usize,
    path: &Path,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(
            w,
            "Saved {} clean rows to {}",
            rows.green().bold(),
            path.display()
        )
    } else {
        writeln!(w, "Saved {} clean rows to {}", rows, path.display())
    }
}

pub fn print_created(w: &mut dyn Write, label: &str, path: &Path, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", format!("{label}:").cyan(), path.display())
    } else {
        writeln!(w, "{}: {}", label, path.display())
    }
}

pub fn print_fields_summary(w: &mut dyn Write, fields: &PageFields) -> std::io::Result<()> {
    writeln!(
        w,
        "Filtered {} market quotes and {} news items",
        fields.quotes.len(),
        fields.news.len()
    )
}

pub fn print_thread_summary(
    w: &mut dyn Write,
    thread: &Thread,
    color: ColorMode,
) -> std::io::Result<()> {
    let title = if color.enabled() {
        thread.post.title.bold().to_string()
    } else {
        thread.post.title.clone()
    };
    writeln!(w, "r/{}: {}", thread.post.subreddit, title)?;
    writeln!(
        w,
        "Collected {} comments (post reports {})",
        thread.comments.len(),
        thread.post.num_comments
    )
}

pub fn print_dataset_summary(
    w: &mut dyn Write,
    summary: &DatasetSummary,
    color: ColorMode,
) -> std::io::Result<()> {
    let heading = format!(
        "{} ({} / {})",
        summary.dataset, summary.config, summary.split
    );
    if color.enabled() {
        writeln!(w, "{}", heading.bold())?;
    } else {
        writeln!(w, "{}", heading)?;
    }

    writeln!(w, "Features:")?;
    for feature in &summary.features {
        writeln!(w, "  {}: {}", feature.name, feature.type_label())?;
    }

    writeln!(w, "First {} rows:", summary.head.len())?;
    for (i, row) in summary.head.iter().enumerate() {
        let rendered = serde_json::to_string(row).unwrap_or_default();
        writeln!(w, "  [{}] {}", i, rendered)?;
    }

    writeln!(w, "Total number of rows: {}", summary.num_rows)
}
