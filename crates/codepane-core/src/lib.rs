#![warn(missing_docs)]
//! Codepane Core - Incremental Code Editing Engine
//!
//! # Overview
//!
//! `codepane-core` is the headless engine behind a code-editing pane: it keeps one document's
//! text, selection, syntax styling, lint markers and line-number gutter consistent while the
//! user types. It does not draw anything and does not tokenize anything itself; both are
//! capabilities the host plugs in ([`TextLayout`] and [`Highlighter`]).
//!
//! # Core Features
//!
//! - **Debounced highlighting**: at most one pass per quiet period, stale results discarded by
//!   generation
//! - **Selection preservation**: highlight results never move the caret
//! - **Lint overlay**: 1-based line messages mapped to underline decorations, idempotently
//! - **Line-number gutter**: viewport-bounded rendering, click hit testing, jump-to-line flash
//! - **Display settings**: clamped font size, theme switching with immediate re-highlight
//! - **Undo/redo**: bounded whole-text history
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  EditorController + EditorEvent             │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Composition (styling + decoration layers)  │  ← Rendering Data
//! ├─────────────────────────────────────────────┤
//! │  HighlightScheduler / LintOverlay / Gutter  │  ← Incremental Pipeline
//! ├─────────────────────────────────────────────┤
//! │  TextLayout (MonospaceLayout)               │  ← Line Geometry
//! ├─────────────────────────────────────────────┤
//! │  Buffer + LineIndex                         │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use codepane_core::{EditorController, LintMessage, PlainHighlighter, SchedulerState};
//! use codepane_lang::Language;
//! use std::time::{Duration, Instant};
//!
//! let mut editor = EditorController::new(Box::new(PlainHighlighter));
//! let t0 = Instant::now();
//!
//! editor.set_text("let x = 1\nlet y = 2\n", Language::Swift, t0);
//! editor.on_edit("let x = 1\nlet y = 22\n", t0 + Duration::from_millis(10));
//! assert_eq!(editor.scheduler_state(), SchedulerState::Pending);
//!
//! // Nothing happens until the debounce interval has passed.
//! editor.tick(t0 + Duration::from_millis(310));
//! assert_eq!(editor.scheduler_state(), SchedulerState::Idle);
//!
//! editor.on_lint_result(vec![LintMessage::new(2, "unused variable")]);
//! assert_eq!(editor.decorations().len(), 1);
//!
//! let line = editor.jump_to_line(2, t0 + Duration::from_millis(400));
//! assert_eq!(line, 2);
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - Document text with a lazily rebuilt line index
//! - [`line_index`] - Offset ↔ line mapping
//! - [`highlight`] - Highlighter capability and plain fallback
//! - [`scheduler`] - Debounce and stale-result detection
//! - [`lint`] - Lint messages and their overlay
//! - [`decorations`] - Decoration layers (lint underlines, jump flash)
//! - [`compose`] - Styling and decorations merged into render spans
//! - [`layout`] - Layout capability and the headless monospace layout
//! - [`gutter`] - Line-number gutter and flash state machine
//! - [`controller`] - Orchestration and the event port
//!
//! # Unicode Support
//!
//! - All offsets are `char` offsets (Unicode scalar values)
//! - Only `'\n'` ends a line; a `'\r'` before it stays on the preceding line
//! - [`MonospaceLayout`] measures wide characters with `unicode-width`

pub mod buffer;
pub mod compose;
pub mod config;
pub mod controller;
pub mod decorations;
pub mod delta;
pub mod events;
pub mod gutter;
pub mod highlight;
pub mod history;
pub mod layout;
pub mod line_index;
pub mod lint;
pub mod scheduler;
pub mod selection;
pub mod style;
mod text;

pub use buffer::Buffer;
pub use compose::compose;
pub use config::{ConfigError, DisplayConfig, EngineConfig, MAX_FONT_SIZE, MIN_FONT_SIZE};
pub use controller::EditorController;
pub use decorations::{Decoration, DecorationKind, DecorationLayerId, DecorationLayers};
pub use delta::TextDelta;
pub use events::{EditorEvent, EditorEventCallback};
pub use gutter::{FlashState, GutterFrame, GutterLine, GutterRenderer, Viewport};
pub use highlight::{
    HighlightError, HighlightRequest, Highlighter, PlainHighlighter, highlight_or_plain,
};
pub use history::{HistoryEntry, UndoHistory};
pub use layout::{LayoutConfig, LineRect, MonospaceLayout, TextLayout};
pub use line_index::{LineIndex, LineRange};
pub use lint::{LintMessage, LintOverlay, LintSeverity};
pub use scheduler::{
    Completion, Generation, HighlightJob, HighlightScheduler, ScheduleOutcome, SchedulerState,
};
pub use selection::{Selection, SelectionSet};
pub use style::{
    Color, StyleAttributes, StyledSpan, StyledText, Theme, ThemeId, TokenKind, UnderlineStyle,
};
