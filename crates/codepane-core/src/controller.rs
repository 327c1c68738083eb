//! Editor controller: the single writer of per-editor state.
//!
//! [`EditorController`] owns the buffer, selection, display settings, highlight scheduler,
//! decoration layers and gutter state of one editor. Collaborators (document model, linter,
//! theme provider, host UI) talk to it through plain method calls and receive notifications
//! through [`EditorController::subscribe`].
//!
//! The controller is driven cooperatively: every timed transition (debounce deadline, flash
//! expiry) happens inside [`EditorController::tick`] against the `Instant` the host passes in.
//! Hosts that want to highlight off the interactive path can instead pull jobs with
//! [`EditorController::poll_highlight_job`] and report results with
//! [`EditorController::on_highlight_complete`].

use crate::buffer::Buffer;
use crate::compose::compose;
use crate::config::{DisplayConfig, EngineConfig};
use crate::decorations::{Decoration, DecorationLayerId, DecorationLayers};
use crate::delta::TextDelta;
use crate::events::{EditorEvent, EditorEventCallback};
use crate::gutter::{FlashState, GutterFrame, GutterRenderer, Viewport};
use crate::highlight::{
    HighlightRequest, Highlighter, highlight_or_plain, plain_text, theme_or_default,
};
use crate::history::{HistoryEntry, UndoHistory};
use crate::layout::{MonospaceLayout, TextLayout};
use crate::lint::{LintMessage, LintOverlay};
use crate::scheduler::{
    Completion, Generation, HighlightJob, HighlightScheduler, ScheduleOutcome, SchedulerState,
};
use crate::selection::{Selection, SelectionSet};
use crate::style::{StyledSpan, StyledText, Theme, ThemeId};
use codepane_lang::Language;
use std::time::Instant;

/// Orchestrates one editor.
pub struct EditorController {
    config: EngineConfig,
    buffer: Buffer,
    selections: SelectionSet,
    display: DisplayConfig,
    theme: Theme,
    scheduler: HighlightScheduler,
    highlighter: Box<dyn Highlighter>,
    layout: Box<dyn TextLayout>,
    gutter: GutterRenderer,
    /// Styled content currently shown; shifted across edits until the next pass replaces it.
    styled: StyledText,
    decorations: DecorationLayers,
    /// Latest lint messages and the revision they were reported for.
    lint_messages: Vec<LintMessage>,
    lint_revision: Option<u64>,
    viewport: Viewport,
    history: UndoHistory,
    callbacks: Vec<EditorEventCallback>,
}

impl EditorController {
    /// Create a controller with the default configuration.
    pub fn new(highlighter: Box<dyn Highlighter>) -> Self {
        Self::with_config(EngineConfig::default(), highlighter)
    }

    /// Create a controller with `config`.
    pub fn with_config(config: EngineConfig, highlighter: Box<dyn Highlighter>) -> Self {
        let config = config.normalized();
        let display = config.display.clone();
        let theme = theme_or_default(highlighter.as_ref(), &display.theme_id);
        let buffer = Buffer::new("", Language::Plain);
        let mut layout: Box<dyn TextLayout> = Box::new(MonospaceLayout::new(config.layout));
        layout.relayout(buffer.text(), buffer.line_index(), display.font_size);

        Self {
            scheduler: HighlightScheduler::new(config.debounce()),
            gutter: GutterRenderer::new(config.flash_duration()),
            history: UndoHistory::new(config.undo_limit),
            styled: StyledText::uniform(0, theme.plain),
            selections: SelectionSet::default(),
            decorations: DecorationLayers::new(),
            lint_messages: Vec::new(),
            lint_revision: None,
            viewport: Viewport::default(),
            callbacks: Vec::new(),
            config,
            buffer,
            display,
            theme,
            highlighter,
            layout,
        }
    }

    /// Replace the text layout implementation.
    pub fn with_layout(mut self, layout: Box<dyn TextLayout>) -> Self {
        self.layout = layout;
        self.relayout();
        self
    }

    /// Register a callback for [`EditorEvent`]s.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&EditorEvent) + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    fn emit(&mut self, event: EditorEvent) {
        for callback in &mut self.callbacks {
            callback(&event);
        }
    }

    // ---------------------------------------------------------------------
    // Text
    // ---------------------------------------------------------------------

    /// Load a document from outside (document model).
    ///
    /// Clears undo history and lint state and schedules an immediate highlight pass.
    pub fn set_text(&mut self, text: &str, language: Language, now: Instant) {
        let changed = self.buffer.replace(text).is_some();
        self.buffer.set_language(language);
        self.history.clear();
        self.lint_messages.clear();
        self.lint_revision = None;
        self.decorations.clear(DecorationLayerId::LINT);

        if changed {
            self.styled = plain_text(self.buffer.text(), &self.theme);
            self.decorations.clear(DecorationLayerId::FLASH);
            self.selections = SelectionSet::default();
            self.relayout();
            self.emit(EditorEvent::SelectionChanged);
        }
        tracing::debug!(
            revision = self.buffer.revision(),
            language = %language,
            "Document loaded"
        );

        self.scheduler.reset();
        self.schedule_highlight(now, true);
        self.request_lint();
        self.emit(EditorEvent::DecorationsChanged {
            layer: DecorationLayerId::LINT,
        });
        self.emit(EditorEvent::GutterRepaint);
    }

    /// Handle a user edit that replaced the text with `new_text`.
    ///
    /// The selection is carried across the edit. Returns `false` if the text did not change.
    pub fn on_edit(&mut self, new_text: &str, now: Instant) -> bool {
        self.edit(new_text, None, now)
    }

    /// Handle a user edit that also moved the selection (e.g. typing moves the caret).
    pub fn on_edit_with_selection(
        &mut self,
        new_text: &str,
        selections: SelectionSet,
        now: Instant,
    ) -> bool {
        self.edit(new_text, Some(selections), now)
    }

    fn edit(&mut self, new_text: &str, selections: Option<SelectionSet>, now: Instant) -> bool {
        let before = self.history_entry();
        let Some(delta) = self.buffer.replace(new_text) else {
            if let Some(selections) = selections {
                self.set_selections(selections);
            }
            return false;
        };
        self.history.record(before);
        self.after_text_change(delta, selections, now);
        true
    }

    fn after_text_change(
        &mut self,
        delta: TextDelta,
        selections: Option<SelectionSet>,
        now: Instant,
    ) {
        let len = self.buffer.len();
        self.styled = self.styled.apply_delta(&delta, self.theme.plain);
        self.decorations.apply_delta(&delta);
        self.selections = selections
            .unwrap_or_else(|| self.selections.mapped(&delta))
            .clamped(len);
        self.relayout();

        self.schedule_highlight(now, false);
        let text = self.buffer.snapshot();
        self.emit(EditorEvent::TextChanged {
            revision: self.buffer.revision(),
            text,
            delta,
        });
        self.request_lint();
        self.emit(EditorEvent::SelectionChanged);
        self.emit(EditorEvent::GutterRepaint);
    }

    fn request_lint(&mut self) {
        let event = EditorEvent::LintRequested {
            revision: self.buffer.revision(),
            text: self.buffer.snapshot(),
            language: self.buffer.language(),
        };
        self.emit(event);
    }

    fn history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            text: self.buffer.snapshot(),
            selections: self.selections.clone(),
        }
    }

    /// Revert the last edit. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, now: Instant) -> bool {
        let current = self.history_entry();
        match self.history.undo(current) {
            Some(entry) => {
                self.restore(entry, now);
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone edit. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self, now: Instant) -> bool {
        let current = self.history_entry();
        match self.history.redo(current) {
            Some(entry) => {
                self.restore(entry, now);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, entry: HistoryEntry, now: Instant) {
        match self.buffer.replace(&entry.text) {
            Some(delta) => self.after_text_change(delta, Some(entry.selections), now),
            None => self.set_selections(entry.selections),
        }
    }

    // ---------------------------------------------------------------------
    // Highlighting
    // ---------------------------------------------------------------------

    fn highlight_request(&self) -> HighlightRequest {
        HighlightRequest::new(
            self.buffer.snapshot(),
            self.buffer.language(),
            self.display.theme_id.clone(),
        )
    }

    fn schedule_highlight(&mut self, now: Instant, immediate: bool) {
        let request = self.highlight_request();
        let outcome = if immediate {
            self.scheduler.schedule_now(request, now)
        } else {
            self.scheduler.schedule(request, now)
        };
        if let ScheduleOutcome::Scheduled(generation) = outcome {
            tracing::trace!(generation = generation.0, immediate, "Highlight scheduled");
        }
    }

    /// Take the due highlight job, if any, to run it outside the controller.
    ///
    /// The result must be handed back with [`EditorController::on_highlight_complete`].
    pub fn poll_highlight_job(&mut self, now: Instant) -> Option<HighlightJob> {
        self.scheduler.poll(now)
    }

    /// Apply the result of the highlight pass for `generation`.
    ///
    /// A stale result (a newer request exists) changes nothing. Otherwise the styled content is
    /// replaced, the selection is kept, and the latest lint messages are re-applied.
    pub fn on_highlight_complete(
        &mut self,
        styled: StyledText,
        generation: Generation,
    ) -> Completion {
        let completion = self.scheduler.complete(generation);
        if completion == Completion::Stale {
            return completion;
        }

        let selections = self.selections.clone();
        self.styled =
            StyledText::normalized(styled.spans().to_vec(), self.buffer.len(), self.theme.plain);
        self.selections = selections.clamped(self.buffer.len());
        self.apply_lint();
        tracing::debug!(
            generation = generation.0,
            spans = self.styled.spans().len(),
            "Highlight applied"
        );

        self.emit(EditorEvent::HighlightApplied { generation });
        self.emit(EditorEvent::DecorationsChanged {
            layer: DecorationLayerId::LINT,
        });
        self.emit(EditorEvent::GutterRepaint);
        completion
    }

    /// Advance timed state to `now`: expire the jump flash and run a due highlight pass with the
    /// owned highlighter.
    pub fn tick(&mut self, now: Instant) {
        if let Some(line) = self.gutter.expire_flash(now) {
            self.decorations.clear(DecorationLayerId::FLASH);
            tracing::debug!(line, "Jump flash finished");
            self.emit(EditorEvent::DecorationsChanged {
                layer: DecorationLayerId::FLASH,
            });
            self.emit(EditorEvent::JumpFinished { line });
        }

        if let Some(job) = self.scheduler.poll(now) {
            let styled = highlight_or_plain(self.highlighter.as_ref(), &job.request);
            self.on_highlight_complete(styled, job.generation);
        }
    }

    /// The earliest instant at which [`EditorController::tick`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.scheduler.next_deadline(), self.gutter.flash_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // ---------------------------------------------------------------------
    // Lint
    // ---------------------------------------------------------------------

    /// Store lint messages for the current text.
    ///
    /// They are applied right away when no highlight pass is pending or running; otherwise they
    /// are folded into the next completed pass.
    pub fn on_lint_result(&mut self, messages: Vec<LintMessage>) {
        self.lint_messages = messages;
        self.lint_revision = Some(self.buffer.revision());

        if self.scheduler.is_busy() {
            tracing::trace!(
                messages = self.lint_messages.len(),
                "Lint result deferred until highlight completes"
            );
            return;
        }
        self.apply_lint();
        self.emit(EditorEvent::DecorationsChanged {
            layer: DecorationLayerId::LINT,
        });
        self.emit(EditorEvent::GutterRepaint);
    }

    /// Store lint messages computed for `revision`, ignoring results for any other revision.
    ///
    /// Returns `true` if the messages were accepted.
    pub fn on_lint_result_for(&mut self, revision: u64, messages: Vec<LintMessage>) -> bool {
        if revision != self.buffer.revision() {
            tracing::trace!(
                revision,
                current = self.buffer.revision(),
                "Discarding stale lint result"
            );
            return false;
        }
        self.on_lint_result(messages);
        true
    }

    fn apply_lint(&mut self) {
        let decorations = LintOverlay::apply(self.buffer.line_index(), &self.lint_messages);
        self.decorations.replace(DecorationLayerId::LINT, decorations);
    }

    // ---------------------------------------------------------------------
    // Display
    // ---------------------------------------------------------------------

    /// Grow the font by the configured step.
    pub fn increase_font_size(&mut self) -> bool {
        self.set_font_size(self.config.font_size_step)
    }

    /// Shrink the font by the configured step.
    pub fn decrease_font_size(&mut self) -> bool {
        self.set_font_size(-self.config.font_size_step)
    }

    /// Change the font size by `delta` points, clamped to the allowed range.
    ///
    /// Relayouts without re-highlighting. Returns `false` if the size did not change.
    pub fn set_font_size(&mut self, delta: f32) -> bool {
        if !self.display.adjust_font_size(delta) {
            return false;
        }
        self.relayout();
        self.clamp_scroll();
        let display = self.display.clone();
        self.emit(EditorEvent::DisplayConfigChanged(display));
        self.emit(EditorEvent::GutterRepaint);
        true
    }

    /// Switch theme and re-highlight on the next tick.
    pub fn set_theme(&mut self, theme_id: ThemeId, now: Instant) {
        if theme_id == self.display.theme_id {
            return;
        }
        self.theme = theme_or_default(self.highlighter.as_ref(), &theme_id);
        self.display.theme_id = theme_id;
        let display = self.display.clone();
        self.emit(EditorEvent::DisplayConfigChanged(display));
        self.schedule_highlight(now, true);
    }

    /// Switch language and re-highlight on the next tick.
    pub fn set_language(&mut self, language: Language, now: Instant) {
        if language == self.buffer.language() {
            return;
        }
        self.buffer.set_language(language);
        self.schedule_highlight(now, true);
        self.request_lint();
    }

    // ---------------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------------

    /// Select line `line` (1-based, clamped), scroll it into view and flash it.
    ///
    /// Returns the line actually jumped to.
    pub fn jump_to_line(&mut self, line: usize, now: Instant) -> usize {
        let line = line.clamp(1, self.buffer.line_index().line_count());
        let range = self.gutter.start_flash(self.buffer.line_index(), line, now);

        self.selections = SelectionSet::single(Selection::new(range.start, range.end));
        self.decorations.replace(
            DecorationLayerId::FLASH,
            vec![Decoration::flash(range.to_range())],
        );
        self.scroll_to_line(line - 1);
        tracing::debug!(line, start = range.start, end = range.end, "Jumped to line");

        self.emit(EditorEvent::SelectionChanged);
        self.emit(EditorEvent::DecorationsChanged {
            layer: DecorationLayerId::FLASH,
        });
        self.emit(EditorEvent::JumpStarted { line });
        line
    }

    /// Resolve a gutter click at viewport-relative `click_y` and jump to that line.
    pub fn on_gutter_click(&mut self, click_y: f32, now: Instant) -> usize {
        let line = self.gutter.hit_test(
            self.buffer.line_index(),
            self.layout.as_ref(),
            self.viewport,
            click_y,
        );
        self.jump_to_line(line, now)
    }

    fn scroll_to_line(&mut self, line: usize) {
        let Some(rect) = self.layout.line_rect(line) else {
            return;
        };
        let scroll_y = if rect.y < self.viewport.scroll_y {
            rect.y
        } else if rect.bottom() > self.viewport.bottom() {
            (rect.bottom() - self.viewport.height).min(rect.y)
        } else {
            return;
        };
        self.set_scroll_y(scroll_y);
    }

    /// Replace the selection with a single range.
    pub fn set_selection(&mut self, selection: Selection) {
        self.set_selections(SelectionSet::single(selection));
    }

    /// Replace the whole selection set.
    pub fn set_selections(&mut self, selections: SelectionSet) {
        let selections = selections.clamped(self.buffer.len());
        if selections == self.selections {
            return;
        }
        self.selections = selections;
        self.emit(EditorEvent::SelectionChanged);
    }

    /// Set the visible height of the editor.
    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport.height = height.max(0.0);
        self.clamp_scroll();
        self.emit(EditorEvent::GutterRepaint);
    }

    /// Scroll so that content y `scroll_y` is at the top of the view (clamped to the content).
    pub fn set_scroll_y(&mut self, scroll_y: f32) {
        let max = (self.layout.content_height() - self.viewport.height).max(0.0);
        let scroll_y = scroll_y.clamp(0.0, max);
        if scroll_y == self.viewport.scroll_y {
            return;
        }
        self.viewport.scroll_y = scroll_y;
        self.emit(EditorEvent::ScrollChanged { scroll_y });
        self.emit(EditorEvent::GutterRepaint);
    }

    fn clamp_scroll(&mut self) {
        self.set_scroll_y(self.viewport.scroll_y);
    }

    fn relayout(&mut self) {
        self.layout.relayout(
            self.buffer.text(),
            self.buffer.line_index(),
            self.display.font_size,
        );
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// Current text.
    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Document language.
    pub fn language(&self) -> Language {
        self.buffer.language()
    }

    /// Buffer revision.
    pub fn revision(&self) -> u64 {
        self.buffer.revision()
    }

    /// Current selections.
    pub fn selections(&self) -> &SelectionSet {
        &self.selections
    }

    /// Primary selection.
    pub fn selection(&self) -> Selection {
        self.selections.primary()
    }

    /// Styled content currently shown (without decorations).
    pub fn styled(&self) -> &StyledText {
        &self.styled
    }

    /// Decoration layers.
    pub fn decorations(&self) -> &DecorationLayers {
        &self.decorations
    }

    /// Latest lint messages.
    pub fn lint_messages(&self) -> &[LintMessage] {
        &self.lint_messages
    }

    /// Revision the latest lint messages were reported for.
    pub fn lint_revision(&self) -> Option<u64> {
        self.lint_revision
    }

    /// Display settings.
    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    /// Active theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Text layout.
    pub fn layout(&self) -> &dyn TextLayout {
        self.layout.as_ref()
    }

    /// Scheduler state.
    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Jump flash state.
    pub fn flash_state(&self) -> FlashState {
        self.gutter.flash_state()
    }

    /// Whether undo is possible.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether redo is possible.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Styled content with every decoration layer composed on top.
    pub fn rendered_spans(&self) -> Vec<StyledSpan> {
        compose(&self.styled, &self.decorations, &self.theme)
    }

    /// Draw instructions for the visible gutter rows.
    pub fn gutter(&self) -> GutterFrame {
        let line_index = self.buffer.line_index();
        let caret_line = line_index.line_for_offset(self.selections.primary().end);
        self.gutter.render(
            line_index,
            self.layout.as_ref(),
            self.viewport,
            &self.lint_messages,
            caret_line,
        )
    }

    /// Width of the gutter for the current document, given the width of one digit.
    pub fn gutter_width(&self, digit_width: f32) -> f32 {
        GutterRenderer::gutter_width(self.buffer.line_index().line_count(), digit_width)
    }
}

impl std::fmt::Debug for EditorController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorController")
            .field("revision", &self.buffer.revision())
            .field("language", &self.buffer.language())
            .field("selections", &self.selections)
            .field("display", &self.display)
            .field("scheduler", &self.scheduler.state())
            .field("callbacks", &self.callbacks.len())
            .finish_non_exhaustive()
    }
}
