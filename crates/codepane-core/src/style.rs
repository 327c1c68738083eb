//! Styling model: colors, attributes, themes and styled token streams.
//!
//! A highlighter resolves token kinds through a [`Theme`] and returns a [`StyledText`]: ordered,
//! non-overlapping [`StyledSpan`]s that cover the whole document without gaps. Overlays (lint
//! underlines, jump flashes) are layered on top during composition and never touch the
//! attributes assigned here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// A color with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Underline appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnderlineStyle {
    /// A straight single line.
    Single,
    /// A wavy "squiggle" line, used for lint messages.
    Squiggle,
}

/// Visual attributes of a character run.
///
/// `None`/`false` fields mean "inherit the view default".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleAttributes {
    /// Text color.
    pub foreground: Option<Color>,
    /// Background color.
    pub background: Option<Color>,
    /// Bold weight.
    pub bold: bool,
    /// Italic slant.
    pub italic: bool,
    /// Underline, if any.
    pub underline: Option<UnderlineStyle>,
    /// Underline color (defaults to the foreground when unset).
    pub underline_color: Option<Color>,
}

impl StyleAttributes {
    /// Plain text with the given foreground.
    pub const fn fg(color: Color) -> Self {
        Self {
            foreground: Some(color),
            background: None,
            bold: false,
            italic: false,
            underline: None,
            underline_color: None,
        }
    }

    /// Builder: bold.
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Builder: italic.
    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

/// Coarse token classes produced by highlighters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Unstyled text.
    Plain,
    /// Language keyword.
    Keyword,
    /// String literal.
    String,
    /// Comment.
    Comment,
    /// Numeric literal.
    Number,
    /// Type name.
    Type,
    /// Function or command name.
    Function,
    /// Variable reference (e.g. `$HOME`).
    Variable,
    /// Attribute / decorator.
    Attribute,
    /// Markdown heading.
    Heading,
    /// Markdown emphasis (`*em*`, `**strong**`).
    Emphasis,
    /// Markdown inline or fenced code.
    Code,
    /// Markdown link.
    Link,
}

/// Theme identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeId(pub String);

impl ThemeId {
    /// Identifier of the built-in light theme.
    pub const LIGHT: &'static str = "light";
    /// Identifier of the built-in dark theme.
    pub const DARK: &'static str = "dark";

    /// Create a theme id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ThemeId {
    fn default() -> Self {
        Self::new(Self::LIGHT)
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ThemeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A color theme.
///
/// Themes are plain data and can be loaded from JSON, e.g. to register custom themes with a
/// highlighter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Theme identifier.
    pub id: ThemeId,
    /// Default text style (used for [`TokenKind::Plain`] and unstyled gaps).
    pub plain: StyleAttributes,
    /// Per-token overrides; kinds not listed fall back to `plain`.
    pub tokens: Vec<(TokenKind, StyleAttributes)>,
    /// Underline color for lint errors.
    pub lint_error: Color,
    /// Underline color for lint warnings.
    pub lint_warning: Color,
    /// Background of the transient jump flash.
    pub flash_background: Color,
}

impl Theme {
    /// Resolve a token kind to attributes.
    pub fn style_for(&self, kind: TokenKind) -> StyleAttributes {
        self.tokens
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, style)| *style)
            .unwrap_or(self.plain)
    }

    /// Look up one of the built-in themes.
    pub fn builtin(id: &str) -> Option<Self> {
        match id {
            ThemeId::LIGHT => Some(Self::light()),
            ThemeId::DARK => Some(Self::dark()),
            _ => None,
        }
    }

    /// The built-in light theme.
    pub fn light() -> Self {
        let ink = Color::rgb(0x1f, 0x1f, 0x24);
        Self {
            id: ThemeId::new(ThemeId::LIGHT),
            plain: StyleAttributes::fg(ink),
            tokens: vec![
                (TokenKind::Keyword, StyleAttributes::fg(Color::rgb(0x9b, 0x23, 0x93)).bold()),
                (TokenKind::String, StyleAttributes::fg(Color::rgb(0xc4, 0x1a, 0x16))),
                (TokenKind::Comment, StyleAttributes::fg(Color::rgb(0x5d, 0x6c, 0x79)).italic()),
                (TokenKind::Number, StyleAttributes::fg(Color::rgb(0x1c, 0x00, 0xcf))),
                (TokenKind::Type, StyleAttributes::fg(Color::rgb(0x0b, 0x4f, 0x79))),
                (TokenKind::Function, StyleAttributes::fg(Color::rgb(0x32, 0x6d, 0x74))),
                (TokenKind::Variable, StyleAttributes::fg(Color::rgb(0x3f, 0x6e, 0x74))),
                (TokenKind::Attribute, StyleAttributes::fg(Color::rgb(0x81, 0x5f, 0x03))),
                (TokenKind::Heading, StyleAttributes::fg(ink).bold()),
                (TokenKind::Emphasis, StyleAttributes::fg(ink).italic()),
                (TokenKind::Code, StyleAttributes::fg(Color::rgb(0x64, 0x38, 0x20))),
                (TokenKind::Link, StyleAttributes::fg(Color::rgb(0x0e, 0x0e, 0xff))),
            ],
            lint_error: Color::rgb(0xff, 0x3b, 0x30),
            lint_warning: Color::rgb(0xff, 0x95, 0x00),
            flash_background: Color::rgba(0xff, 0xd6, 0x0a, 0x80),
        }
    }

    /// The built-in dark theme.
    pub fn dark() -> Self {
        let ink = Color::rgb(0xdf, 0xdf, 0xe0);
        Self {
            id: ThemeId::new(ThemeId::DARK),
            plain: StyleAttributes::fg(ink),
            tokens: vec![
                (TokenKind::Keyword, StyleAttributes::fg(Color::rgb(0xfc, 0x5f, 0xa3)).bold()),
                (TokenKind::String, StyleAttributes::fg(Color::rgb(0xfc, 0x6a, 0x5d))),
                (TokenKind::Comment, StyleAttributes::fg(Color::rgb(0x6c, 0x79, 0x86)).italic()),
                (TokenKind::Number, StyleAttributes::fg(Color::rgb(0xd0, 0xbf, 0x69))),
                (TokenKind::Type, StyleAttributes::fg(Color::rgb(0x5d, 0xd8, 0xff))),
                (TokenKind::Function, StyleAttributes::fg(Color::rgb(0x67, 0xb7, 0xa4))),
                (TokenKind::Variable, StyleAttributes::fg(Color::rgb(0x41, 0xa1, 0xc0))),
                (TokenKind::Attribute, StyleAttributes::fg(Color::rgb(0xbf, 0x85, 0x55))),
                (TokenKind::Heading, StyleAttributes::fg(ink).bold()),
                (TokenKind::Emphasis, StyleAttributes::fg(ink).italic()),
                (TokenKind::Code, StyleAttributes::fg(Color::rgb(0xa1, 0x67, 0xe6))),
                (TokenKind::Link, StyleAttributes::fg(Color::rgb(0x54, 0x82, 0xff))),
            ],
            lint_error: Color::rgb(0xff, 0x45, 0x3a),
            lint_warning: Color::rgb(0xff, 0x9f, 0x0a),
            flash_background: Color::rgba(0x7f, 0x6a, 0x00, 0x90),
        }
    }
}

/// A styled character run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    /// Half-open character range.
    pub range: Range<usize>,
    /// Attributes for every character in `range`.
    pub style: StyleAttributes,
}

impl StyledSpan {
    /// Create a span.
    pub fn new(range: Range<usize>, style: StyleAttributes) -> Self {
        Self { range, style }
    }
}

/// A token stream covering `[0, len)` without gaps or overlaps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledText {
    spans: Vec<StyledSpan>,
    len: usize,
}

impl StyledText {
    /// A single span of `style` covering `len` characters (no spans for an empty text).
    pub fn uniform(len: usize, style: StyleAttributes) -> Self {
        let spans = if len == 0 {
            Vec::new()
        } else {
            vec![StyledSpan::new(0..len, style)]
        };
        Self { spans, len }
    }

    /// Build from token intervals, resolving kinds through `theme`.
    ///
    /// Intervals may arrive unsorted and overlapping: earlier-starting intervals win and later
    /// ones are clipped. Uncovered characters get the theme's plain style.
    pub fn from_tokens(
        len: usize,
        tokens: impl IntoIterator<Item = (Range<usize>, TokenKind)>,
        theme: &Theme,
    ) -> Self {
        let spans = tokens
            .into_iter()
            .map(|(range, kind)| StyledSpan::new(range, theme.style_for(kind)))
            .collect();
        Self::normalized(spans, len, theme.plain)
    }

    /// Repair an arbitrary span list so that it satisfies the token-stream contract.
    ///
    /// Spans are sorted, clipped to `[0, len)`, overlaps are resolved in favour of the span
    /// that starts first, gaps are filled with `fill`, and adjacent spans with equal attributes
    /// are merged.
    pub fn normalized(mut spans: Vec<StyledSpan>, len: usize, fill: StyleAttributes) -> Self {
        spans.retain(|span| span.range.start < span.range.end && span.range.start < len);
        spans.sort_by_key(|span| (span.range.start, span.range.end));

        let mut out: Vec<StyledSpan> = Vec::with_capacity(spans.len() * 2 + 1);
        let mut cursor = 0usize;
        for span in spans {
            let start = span.range.start.max(cursor);
            let end = span.range.end.min(len);
            if start >= end {
                continue;
            }
            if start > cursor {
                push_merged(&mut out, StyledSpan::new(cursor..start, fill));
            }
            push_merged(&mut out, StyledSpan::new(start..end, span.style));
            cursor = end;
        }
        if cursor < len {
            push_merged(&mut out, StyledSpan::new(cursor..len, fill));
        }

        Self { spans: out, len }
    }

    /// Document length this stream covers.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the stream covers an empty document.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The spans, in order.
    pub fn spans(&self) -> &[StyledSpan] {
        &self.spans
    }

    /// Attributes at `offset`, if inside the covered range.
    pub fn style_at(&self, offset: usize) -> Option<StyleAttributes> {
        let idx = self
            .spans
            .partition_point(|span| span.range.end <= offset);
        self.spans
            .get(idx)
            .filter(|span| span.range.start <= offset && offset < span.range.end)
            .map(|span| span.style)
    }

    /// Carry the stream across an edit made before it was recomputed.
    ///
    /// Spans follow the surrounding text; the inserted characters take the style of the span
    /// they were typed into (or `fill` at a boundary), keeping the stream gap-free until the
    /// next highlight pass replaces it.
    pub fn apply_delta(&self, delta: &crate::delta::TextDelta, fill: StyleAttributes) -> Self {
        let new_len = self.len - delta.deleted_len + delta.inserted_len;
        let insert_style = self
            .spans
            .iter()
            .find(|span| span.range.start < delta.start && delta.start <= span.range.end)
            .map(|span| span.style)
            .unwrap_or(fill);

        let mut spans: Vec<StyledSpan> = self
            .spans
            .iter()
            .filter_map(|span| {
                let (start, end) = delta.map_range(span.range.start, span.range.end);
                (start < end).then(|| StyledSpan::new(start..end, span.style))
            })
            .collect();
        if delta.inserted_len > 0 {
            spans.push(StyledSpan::new(delta.start..delta.new_end(), insert_style));
        }
        Self::normalized(spans, new_len, fill)
    }
}

fn push_merged(out: &mut Vec<StyledSpan>, span: StyledSpan) {
    if let Some(last) = out.last_mut()
        && last.range.end == span.range.start
        && last.style == span.style
    {
        last.range.end = span.range.end;
        return;
    }
    out.push(span);
}
