use std::path::Path;

use mupdf::{Document, TextPageFlags};

use harvest_core::{
    BackendError, DEFAULT_Y_TOLERANCE, PageColumns, PdfBackend, Rect, TextFragment,
    group_fragments_into_lines,
};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// so that non-PDF code paths do not transitively depend on it.
///
/// Each page is split at its horizontal midpoint. A character belongs to the
/// half that contains its origin, so a MuPDF line that straddles the gutter
/// contributes one fragment to each half. Fragments are then regrouped into
/// physical lines with a vertical tolerance, which rejoins table cells that
/// MuPDF emits as separate lines on the same baseline.
pub struct MupdfBackend {
    /// Maximum distance in points between fragment centres on one line.
    y_tolerance: f32,
}

impl Default for MupdfBackend {
    fn default() -> Self {
        Self {
            y_tolerance: DEFAULT_Y_TOLERANCE,
        }
    }
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line-grouping tolerance. Negative values are treated as zero.
    pub fn with_y_tolerance(mut self, tolerance: f32) -> Self {
        self.y_tolerance = tolerance.max(0.0);
        self
    }
}

impl PdfBackend for MupdfBackend {
    fn extract_columns(&self, path: &Path) -> Result<Vec<PageColumns>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut pages = Vec::new();

        for (page_index, page_result) in document
            .pages()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?
            .enumerate()
        {
            let page = page_result.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

            let bounds = page
                .bounds()
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let (left_region, _) =
                Rect::new(bounds.x0, bounds.y0, bounds.x1, bounds.y1).split_at_midpoint();

            let mut left = Vec::new();
            let mut right = Vec::new();

            for block in text_page.blocks() {
                for line in block.lines() {
                    let line_bounds = line.bounds();
                    let y = (line_bounds.y0 + line_bounds.y1) / 2.0;

                    let mut left_text = String::new();
                    let mut right_text = String::new();
                    let mut left_x = None;
                    let mut right_x = None;

                    for c in line.chars() {
                        let ch = c.char().unwrap_or('\u{FFFD}');
                        let x = c.origin().x;
                        if left_region.contains_x(x) || x < left_region.x0 {
                            left_x.get_or_insert(x);
                            left_text.push(ch);
                        } else {
                            right_x.get_or_insert(x);
                            right_text.push(ch);
                        }
                    }

                    if let Some(x) = left_x {
                        left.push(TextFragment::new(x, y, left_text));
                    }
                    if let Some(x) = right_x {
                        right.push(TextFragment::new(x, y, right_text));
                    }
                }
            }

            let columns = PageColumns::new(
                page_index,
                group_fragments_into_lines(left, self.y_tolerance),
                group_fragments_into_lines(right, self.y_tolerance),
            );
            tracing::trace!(
                page = page_index,
                left = columns.left.len(),
                right = columns.right.len(),
                "page split into columns"
            );
            pages.push(columns);
        }

        Ok(pages)
    }
}
