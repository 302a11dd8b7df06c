//! Page geometry and line grouping for two-column documents.
//!
//! Backends hand over positioned text fragments; everything here is pure
//! so the grouping rules can be tested without a PDF.

/// Fragments whose vertical centres differ by no more than this share a line.
pub const DEFAULT_Y_TOLERANCE: f32 = 2.0;

/// Axis-aligned bounding box in page coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn mid_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }

    /// Split into left `(x0, y0, mid, y1)` and right `(mid, y0, x1, y1)` halves.
    pub fn split_at_midpoint(&self) -> (Rect, Rect) {
        let mid = self.mid_x();
        (
            Rect::new(self.x0, self.y0, mid, self.y1),
            Rect::new(mid, self.y0, self.x1, self.y1),
        )
    }

    /// Half-open on the right edge so a point on the midpoint lands in exactly one half.
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.x0 && x < self.x1
    }
}

/// A run of text at a known position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    /// Left edge.
    pub x: f32,
    /// Vertical centre.
    pub y: f32,
    pub text: String,
}

impl TextFragment {
    pub fn new(x: f32, y: f32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }
}

/// Group fragments into physical lines, top to bottom.
///
/// A line starts at its topmost fragment; every following fragment whose
/// centre lies within `y_tolerance` of that anchor joins it. Fragments in a
/// line are ordered left to right and joined with a single space. Blank
/// lines are dropped.
pub fn group_fragments_into_lines(mut fragments: Vec<TextFragment>, y_tolerance: f32) -> Vec<String> {
    fragments.retain(|f| !f.text.trim().is_empty());
    fragments.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let mut lines = Vec::new();
    let mut current: Vec<TextFragment> = Vec::new();
    let mut anchor_y = f32::NEG_INFINITY;

    for fragment in fragments {
        if !current.is_empty() && fragment.y - anchor_y > y_tolerance {
            lines.push(join_line(std::mem::take(&mut current)));
        }
        if current.is_empty() {
            anchor_y = fragment.y;
        }
        current.push(fragment);
    }
    if !current.is_empty() {
        lines.push(join_line(current));
    }

    lines
}

fn join_line(mut fragments: Vec<TextFragment>) -> String {
    fragments.sort_by(|a, b| a.x.total_cmp(&b.x));
    fragments
        .iter()
        .map(|f| f.text.trim())
        .collect::<Vec<_>>()
        .join(" ")
}
