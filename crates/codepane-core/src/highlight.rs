//! Syntax highlighting capability.
//!
//! The engine does not tokenize anything itself. It talks to a [`Highlighter`] through a narrow,
//! pure contract: given `(text, language, theme)` return a [`StyledText`] covering the whole
//! text. Implementations live in other crates (e.g. `codepane-highlight-simple`).
//!
//! Failures never reach the user: [`highlight_or_plain`] degrades any error to unstyled text for
//! that pass, and the next edit or theme change simply tries again.

use crate::style::{StyledText, Theme, ThemeId};
use codepane_lang::Language;
use std::sync::Arc;
use thiserror::Error;

/// Input of a highlighting pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HighlightRequest {
    /// Full text snapshot.
    pub text: Arc<str>,
    /// Language of the snapshot.
    pub language: Language,
    /// Theme used to resolve token styles.
    pub theme_id: ThemeId,
}

impl HighlightRequest {
    /// Create a request.
    pub fn new(text: impl Into<Arc<str>>, language: Language, theme_id: ThemeId) -> Self {
        Self {
            text: text.into(),
            language,
            theme_id,
        }
    }
}

/// Errors reported by a [`Highlighter`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HighlightError {
    /// The requested theme is not known to the highlighter.
    #[error("unknown theme `{0}`")]
    UnknownTheme(ThemeId),
    /// The highlighter could not produce output.
    #[error("highlighting failed: {0}")]
    Failed(String),
}

/// A pure syntax highlighting capability.
///
/// Implementations must be deterministic in their three inputs; the engine relies on this to
/// skip redundant passes and to run them away from the interactive path. Unsupported languages
/// should produce plain output, not an error.
pub trait Highlighter {
    /// Highlight the request, returning a token stream covering `[0, len(text))`.
    fn highlight(&self, request: &HighlightRequest) -> Result<StyledText, HighlightError>;

    /// Resolve a theme by id. Used for overlay colors and the plain fallback style.
    fn theme(&self, id: &ThemeId) -> Option<Theme> {
        Theme::builtin(id.as_str())
    }
}

/// A highlighter that never styles anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, request: &HighlightRequest) -> Result<StyledText, HighlightError> {
        let theme = self
            .theme(&request.theme_id)
            .ok_or_else(|| HighlightError::UnknownTheme(request.theme_id.clone()))?;
        Ok(plain_text(&request.text, &theme))
    }
}

/// Unstyled output for `text`: a single plain span covering it.
pub fn plain_text(text: &str, theme: &Theme) -> StyledText {
    StyledText::uniform(crate::text::char_len(text), theme.plain)
}

/// Resolve a theme, falling back to the built-in light theme.
pub fn theme_or_default(highlighter: &dyn Highlighter, id: &ThemeId) -> Theme {
    highlighter.theme(id).unwrap_or_else(Theme::light)
}

/// Run `highlighter`, degrading failures to plain text.
///
/// The output is normalized against the request length, so a misbehaving implementation can
/// never hand the engine a stream with gaps, overlaps or the wrong length.
pub fn highlight_or_plain(highlighter: &dyn Highlighter, request: &HighlightRequest) -> StyledText {
    let theme = theme_or_default(highlighter, &request.theme_id);
    let len = crate::text::char_len(&request.text);
    match highlighter.highlight(request) {
        Ok(styled) => {
            if styled.len() != len {
                tracing::warn!(
                    expected = len,
                    actual = styled.len(),
                    "Highlighter output length mismatch; normalizing"
                );
            }
            StyledText::normalized(styled.spans().to_vec(), len, theme.plain)
        }
        Err(err) => {
            tracing::warn!(
                language = %request.language,
                theme = %request.theme_id,
                error = %err,
                "Highlighting unavailable; falling back to plain text"
            );
            plain_text(&request.text, &theme)
        }
    }
}
