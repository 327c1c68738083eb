//! Lint overlay.
//!
//! Lint results arrive from an external linter as structured, line-addressed records. The
//! overlay resolves them to character ranges through the [`LineIndex`] and turns them into
//! underline [`Decoration`]s. Messages pointing outside the document are dropped silently: the
//! linter may be reporting on a slightly older revision of the text.

use crate::decorations::Decoration;
use crate::line_index::LineIndex;

/// Lint severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum LintSeverity {
    /// Warning.
    Warning,
    /// Error.
    #[default]
    Error,
}

/// A single lint result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LintMessage {
    /// 1-based line number.
    pub line: usize,
    /// Message text.
    pub text: String,
    /// Severity (defaults to [`LintSeverity::Error`]).
    pub severity: LintSeverity,
}

impl LintMessage {
    /// An error on `line` (1-based).
    pub fn new(line: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
            severity: LintSeverity::Error,
        }
    }

    /// A warning on `line` (1-based).
    pub fn warning(line: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
            severity: LintSeverity::Warning,
        }
    }
}

/// Maps lint messages onto underline decorations.
#[derive(Debug, Clone, Copy, Default)]
pub struct LintOverlay;

impl LintOverlay {
    /// Compute the underline decorations for `messages` against `line_index`.
    ///
    /// The result is recomputed from scratch and sorted by range, so applying the same input
    /// twice yields the same decorations.
    pub fn apply(line_index: &LineIndex, messages: &[LintMessage]) -> Vec<Decoration> {
        let mut decorations: Vec<Decoration> = messages
            .iter()
            .filter_map(|message| {
                let Some(range) = message
                    .line
                    .checked_sub(1)
                    .and_then(|line| line_index.try_range_for_line(line))
                else {
                    tracing::trace!(
                        line = message.line,
                        line_count = line_index.line_count(),
                        "Dropping lint message outside the document"
                    );
                    return None;
                };
                Some(Decoration::underline(
                    range.to_range(),
                    message.severity,
                    Some(message.text.clone()),
                ))
            })
            .collect();
        decorations.sort_by(|a, b| {
            (a.range.start, a.range.end, a.kind, &a.tooltip)
                .cmp(&(b.range.start, b.range.end, b.kind, &b.tooltip))
        });
        decorations
    }

    /// Worst severity reported on `line` (1-based), for gutter markers.
    pub fn severity_on_line(messages: &[LintMessage], line: usize) -> Option<LintSeverity> {
        messages
            .iter()
            .filter(|m| m.line == line)
            .map(|m| m.severity)
            .max()
    }

    /// Messages reported on `line` (1-based).
    pub fn messages_on_line(messages: &[LintMessage], line: usize) -> Vec<&LintMessage> {
        messages.iter().filter(|m| m.line == line).collect()
    }
}
