//! Text layout geometry.
//!
//! The gutter does not assume a fixed line height: it asks a [`TextLayout`] for the vertical
//! extent of each logical line, so line numbers stay aligned with rendered rows even when lines
//! wrap or a platform layout engine uses per-token font metrics.
//!
//! [`MonospaceLayout`] is the headless implementation: every visual row has the same height
//! (`font_size * line_height_factor`) and logical lines soft-wrap at a cell width computed with
//! UAX #11 character widths.

use crate::line_index::LineIndex;
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

/// Default tab width (in cells).
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Vertical extent of one logical line, in content coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineRect {
    /// Top edge.
    pub y: f32,
    /// Height of all visual rows of the line.
    pub height: f32,
}

impl LineRect {
    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Layout geometry capability.
pub trait TextLayout {
    /// Recompute geometry for a new text, line index or font size.
    fn relayout(&mut self, text: &str, line_index: &LineIndex, font_size: f32);

    /// Bounding rect of logical `line` (0-based); `None` past the last laid-out line.
    fn line_rect(&self, line: usize) -> Option<LineRect>;

    /// Number of laid-out logical lines.
    fn line_count(&self) -> usize;

    /// Total content height.
    fn content_height(&self) -> f32 {
        self.line_count()
            .checked_sub(1)
            .and_then(|last| self.line_rect(last))
            .map(|rect| rect.bottom())
            .unwrap_or(0.0)
    }
}

/// Options for [`MonospaceLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Row height as a multiple of the font size.
    pub line_height_factor: f32,
    /// Soft-wrap width in cells; `None` disables wrapping.
    pub wrap_width: Option<usize>,
    /// Tab width in cells.
    pub tab_width: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_height_factor: 1.25,
            wrap_width: None,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

/// Headless fixed-row-height layout with optional soft wrapping.
#[derive(Debug, Clone)]
pub struct MonospaceLayout {
    config: LayoutConfig,
    row_height: f32,
    /// `row_starts[i]` = index of the first visual row of logical line `i`; one extra trailing
    /// entry holds the total row count.
    row_starts: Vec<usize>,
}

impl MonospaceLayout {
    /// Create an empty layout.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            row_height: 0.0,
            row_starts: vec![0],
        }
    }

    /// Layout options.
    pub fn config(&self) -> LayoutConfig {
        self.config
    }

    /// Height of a single visual row.
    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    /// Number of visual rows of logical `line`.
    pub fn visual_rows(&self, line: usize) -> usize {
        match (self.row_starts.get(line), self.row_starts.get(line + 1)) {
            (Some(start), Some(end)) => end - start,
            _ => 0,
        }
    }
}

impl Default for MonospaceLayout {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl TextLayout for MonospaceLayout {
    fn relayout(&mut self, text: &str, line_index: &LineIndex, font_size: f32) {
        self.row_height = font_size * self.config.line_height_factor;
        self.row_starts.clear();
        self.row_starts.reserve(line_index.line_count() + 1);

        let mut rows = 0usize;
        for line in text.split('\n') {
            self.row_starts.push(rows);
            rows += match self.config.wrap_width {
                Some(width) => visual_row_count(line, width, self.config.tab_width),
                None => 1,
            };
        }
        self.row_starts.push(rows);
        debug_assert_eq!(self.row_starts.len(), line_index.line_count() + 1);
    }

    fn line_rect(&self, line: usize) -> Option<LineRect> {
        if line + 1 >= self.row_starts.len() {
            return None;
        }
        let rows = self.visual_rows(line);
        Some(LineRect {
            y: self.row_starts[line] as f32 * self.row_height,
            height: rows as f32 * self.row_height,
        })
    }

    fn line_count(&self) -> usize {
        self.row_starts.len() - 1
    }
}

/// Visual width of a character (UAX #11), advancing tabs to the next tab stop.
pub fn cell_width_at(ch: char, cell_offset_in_line: usize, tab_width: usize) -> usize {
    if ch == '\t' {
        let tab_width = tab_width.max(1);
        tab_width - cell_offset_in_line % tab_width
    } else {
        UnicodeWidthChar::width(ch).unwrap_or(1)
    }
}

/// Number of visual rows `line` occupies when wrapped at `width` cells (at least 1).
pub fn visual_row_count(line: &str, width: usize, tab_width: usize) -> usize {
    let width = width.max(1);
    let mut rows = 1usize;
    let mut x = 0usize;
    for ch in line.chars() {
        if ch == '\r' {
            continue;
        }
        let w = cell_width_at(ch, x, tab_width);
        if x > 0 && x + w > width {
            rows += 1;
            // Tabs restart at column 0 on the continuation row.
            x = cell_width_at(ch, 0, tab_width);
        } else {
            x += w;
        }
    }
    rows
}
