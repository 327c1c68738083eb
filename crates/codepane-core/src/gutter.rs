//! Line-number gutter.
//!
//! The gutter never owns the buffer: every call borrows the current [`LineIndex`] and
//! [`TextLayout`], and vertical positions come from the layout's line rects rather than a fixed
//! line height.
//!
//! It also owns the jump flash state machine (`Normal → Flashing → Normal`). A flash is removed
//! unconditionally once its deadline passes, whatever happened to the buffer in between.

use crate::layout::TextLayout;
use crate::line_index::{LineIndex, LineRange};
use crate::lint::{LintMessage, LintOverlay, LintSeverity};
use std::time::{Duration, Instant};

/// Default duration of the jump flash.
pub const DEFAULT_FLASH_DURATION: Duration = Duration::from_millis(500);

/// Minimum number of digit columns reserved for line numbers.
const MIN_GUTTER_DIGITS: usize = 3;

/// The visible part of the content, in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Content y at the top edge of the view.
    pub scroll_y: f32,
    /// Visible height.
    pub height: f32,
}

impl Viewport {
    /// Create a viewport.
    pub fn new(scroll_y: f32, height: f32) -> Self {
        Self { scroll_y, height }
    }

    /// Content y at the bottom edge of the view.
    pub fn bottom(&self) -> f32 {
        self.scroll_y + self.height
    }
}

/// Draw instruction for one gutter row.
#[derive(Debug, Clone, PartialEq)]
pub struct GutterLine {
    /// 1-based line number.
    pub number: usize,
    /// Top edge relative to the viewport.
    pub y: f32,
    /// Height of the line (all wrapped rows).
    pub height: f32,
    /// Worst lint severity on this line.
    pub lint: Option<LintSeverity>,
    /// Whether the primary caret is on this line.
    pub is_current: bool,
}

/// Everything needed to paint the gutter once.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GutterFrame {
    /// Visible lines, top to bottom.
    pub lines: Vec<GutterLine>,
    /// Digit columns to reserve for line numbers.
    pub digits: usize,
}

/// Flash state of the gutter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashState {
    /// No flash visible.
    Normal,
    /// Line `line` (1-based) is flashing until `until`.
    Flashing {
        /// 1-based line number of the jump target.
        line: usize,
        /// When the flash is removed.
        until: Instant,
    },
}

/// Line-number gutter renderer and jump flash timer.
#[derive(Debug, Clone)]
pub struct GutterRenderer {
    flash_duration: Duration,
    flash: FlashState,
}

impl GutterRenderer {
    /// Create a renderer with the given flash duration.
    pub fn new(flash_duration: Duration) -> Self {
        Self {
            flash_duration,
            flash: FlashState::Normal,
        }
    }

    /// Current flash state.
    pub fn flash_state(&self) -> FlashState {
        self.flash
    }

    /// Compute the draw instructions for the lines intersecting `viewport`.
    pub fn render(
        &self,
        line_index: &LineIndex,
        layout: &dyn TextLayout,
        viewport: Viewport,
        lint: &[LintMessage],
        caret_line: usize,
    ) -> GutterFrame {
        let line_count = line_index.line_count().min(layout.line_count());
        let first = first_line_at_or_below(layout, line_count, viewport.scroll_y);

        let mut lines = Vec::new();
        for line in first..line_count {
            let Some(rect) = layout.line_rect(line) else {
                break;
            };
            if rect.y >= viewport.bottom() {
                break;
            }
            lines.push(GutterLine {
                number: line + 1,
                y: rect.y - viewport.scroll_y,
                height: rect.height,
                lint: LintOverlay::severity_on_line(lint, line + 1),
                is_current: line == caret_line,
            });
        }

        GutterFrame {
            lines,
            digits: digit_count(line_index.line_count()).max(MIN_GUTTER_DIGITS),
        }
    }

    /// Map a click at viewport-relative `click_y` to a 1-based line number.
    ///
    /// Clicks above the first line resolve to line 1, clicks below the last line to the last
    /// line.
    pub fn hit_test(
        &self,
        line_index: &LineIndex,
        layout: &dyn TextLayout,
        viewport: Viewport,
        click_y: f32,
    ) -> usize {
        let line_count = line_index.line_count().min(layout.line_count()).max(1);
        let content_y = viewport.scroll_y + click_y.max(0.0);
        first_line_at_or_below(layout, line_count, content_y) + 1
    }

    /// Width of the gutter for `line_count` lines, given the width of one digit.
    ///
    /// Reserves at least three digit columns plus one column of padding on each side.
    pub fn gutter_width(line_count: usize, digit_width: f32) -> f32 {
        let digits = digit_count(line_count).max(MIN_GUTTER_DIGITS);
        (digits as f32 + 2.0) * digit_width
    }

    /// Enter the flashing state for `line` (1-based) and return the range to decorate.
    ///
    /// A new jump while flashing restarts the timer on the new line.
    pub fn start_flash(&mut self, line_index: &LineIndex, line: usize, now: Instant) -> LineRange {
        let line = line.clamp(1, line_index.line_count());
        self.flash = FlashState::Flashing {
            line,
            until: now + self.flash_duration,
        };
        line_index.range_for_line(line - 1)
    }

    /// Leave the flashing state once its deadline has passed.
    ///
    /// Returns the line that finished flashing.
    pub fn expire_flash(&mut self, now: Instant) -> Option<usize> {
        match self.flash {
            FlashState::Flashing { line, until } if now >= until => {
                self.flash = FlashState::Normal;
                Some(line)
            }
            _ => None,
        }
    }

    /// When the current flash ends, if one is showing.
    pub fn flash_deadline(&self) -> Option<Instant> {
        match self.flash {
            FlashState::Flashing { until, .. } => Some(until),
            FlashState::Normal => None,
        }
    }
}

impl Default for GutterRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_FLASH_DURATION)
    }
}

/// Index of the line whose rect contains `y` (binary search; rects are monotonic).
fn first_line_at_or_below(layout: &dyn TextLayout, line_count: usize, y: f32) -> usize {
    if line_count == 0 {
        return 0;
    }
    let (mut low, mut high) = (0usize, line_count);
    while low < high {
        let mid = (low + high) / 2;
        match layout.line_rect(mid) {
            Some(rect) if rect.bottom() <= y => low = mid + 1,
            _ => high = mid,
        }
    }
    low.min(line_count - 1)
}

fn digit_count(n: usize) -> usize {
    n.max(1).ilog10() as usize + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutConfig, MonospaceLayout};

    fn setup(text: &str, config: LayoutConfig) -> (LineIndex, MonospaceLayout) {
        let index = LineIndex::from_text(text);
        let mut layout = MonospaceLayout::new(config);
        // font 16 * 1.25 = 20px rows
        layout.relayout(text, &index, 16.0);
        (index, layout)
    }

    #[test]
    fn test_render_visible_lines_only() {
        let text = (1..=10).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let (index, layout) = setup(&text, LayoutConfig::default());
        let gutter = GutterRenderer::default();

        let frame = gutter.render(&index, &layout, Viewport::new(30.0, 50.0), &[], 2);
        let numbers: Vec<_> = frame.lines.iter().map(|l| l.number).collect();
        // Line 5 starts exactly at the bottom edge and is not visible.
        assert_eq!(numbers, vec![2, 3, 4]);
        assert_eq!(frame.lines[0].y, -10.0);
        assert!(frame.lines[1].is_current);
        assert_eq!(frame.digits, 3);
    }

    #[test]
    fn test_render_uses_layout_heights() {
        let config = LayoutConfig {
            wrap_width: Some(2),
            ..LayoutConfig::default()
        };
        let (index, layout) = setup("abcdef\nx", config);
        let frame = GutterRenderer::default().render(
            &index,
            &layout,
            Viewport::new(0.0, 500.0),
            &[LintMessage::warning(2, "w")],
            0,
        );
        assert_eq!(frame.lines[0].height, 60.0);
        assert_eq!(frame.lines[1].y, 60.0);
        assert_eq!(frame.lines[1].lint, Some(LintSeverity::Warning));
    }

    #[test]
    fn test_hit_test() {
        let (index, layout) = setup("a\nb\nc", LayoutConfig::default());
        let gutter = GutterRenderer::default();
        let viewport = Viewport::new(0.0, 100.0);
        assert_eq!(gutter.hit_test(&index, &layout, viewport, 5.0), 1);
        assert_eq!(gutter.hit_test(&index, &layout, viewport, 20.0), 2);
        assert_eq!(gutter.hit_test(&index, &layout, viewport, 45.0), 3);
        assert_eq!(gutter.hit_test(&index, &layout, viewport, 900.0), 3);
        assert_eq!(gutter.hit_test(&index, &layout, viewport, -4.0), 1);
        assert_eq!(
            gutter.hit_test(&index, &layout, Viewport::new(20.0, 100.0), 5.0),
            2
        );
    }

    #[test]
    fn test_gutter_width() {
        assert_eq!(GutterRenderer::gutter_width(9, 8.0), 40.0);
        assert_eq!(GutterRenderer::gutter_width(12_345, 8.0), 56.0);
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(1000), 4);
    }

    #[test]
    fn test_flash_cycle() {
        let (index, _) = setup("a\nb\nc\n", LayoutConfig::default());
        let mut gutter = GutterRenderer::default();
        let t0 = Instant::now();

        let range = gutter.start_flash(&index, 2, t0);
        assert_eq!(range, LineRange::new(2, 3));
        assert_eq!(gutter.flash_deadline(), Some(t0 + DEFAULT_FLASH_DURATION));

        assert_eq!(gutter.expire_flash(t0 + Duration::from_millis(499)), None);
        assert_eq!(gutter.expire_flash(t0 + Duration::from_millis(500)), Some(2));
        assert_eq!(gutter.flash_state(), FlashState::Normal);
        assert_eq!(gutter.expire_flash(t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_flash_clamps_line() {
        let (index, _) = setup("a\nb", LayoutConfig::default());
        let mut gutter = GutterRenderer::default();
        assert_eq!(gutter.start_flash(&index, 0, Instant::now()), LineRange::new(0, 1));
        assert_eq!(gutter.start_flash(&index, 42, Instant::now()), LineRange::new(2, 3));
    }
}
