//! Outbound notifications.
//!
//! The controller reports everything its collaborators need through a single typed port:
//! hosts [`subscribe`](crate::EditorController::subscribe) callbacks and receive
//! [`EditorEvent`]s. There is no global broadcast mechanism.

use crate::config::DisplayConfig;
use crate::decorations::DecorationLayerId;
use crate::delta::TextDelta;
use crate::scheduler::Generation;
use codepane_lang::Language;
use std::sync::Arc;

/// A notification emitted by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// A user edit, undo or redo changed the buffer; the document model should persist `text`.
    ///
    /// Not emitted for [`set_text`](crate::EditorController::set_text), whose text already
    /// comes from the document model.
    TextChanged {
        /// Buffer revision after the change.
        revision: u64,
        /// The new text.
        text: Arc<str>,
        /// The edit relative to the previous text.
        delta: TextDelta,
    },
    /// A lint pass should run against `text`.
    LintRequested {
        /// Revision the result should be reported for.
        revision: u64,
        /// Text to lint.
        text: Arc<str>,
        /// Language of `text`.
        language: Language,
    },
    /// A highlight result was spliced into the rendered content.
    HighlightApplied {
        /// Generation of the applied pass.
        generation: Generation,
    },
    /// A decoration layer changed.
    DecorationsChanged {
        /// The layer that changed.
        layer: DecorationLayerId,
    },
    /// Line geometry or gutter markers changed; repaint the gutter.
    GutterRepaint,
    /// The selection changed.
    SelectionChanged,
    /// The scroll position changed.
    ScrollChanged {
        /// New content y at the top of the view.
        scroll_y: f32,
    },
    /// Font size or theme changed.
    DisplayConfigChanged(DisplayConfig),
    /// A jump to `line` (1-based) started flashing.
    JumpStarted {
        /// Jump target.
        line: usize,
    },
    /// The flash for a jump to `line` (1-based) was removed.
    JumpFinished {
        /// Jump target.
        line: usize,
    },
}

/// Event callback type.
pub type EditorEventCallback = Box<dyn FnMut(&EditorEvent)>;
