#![warn(missing_docs)]
//! `codepane-lang` - language identifiers and per-language configuration for `codepane`.
//!
//! This crate intentionally stays lightweight and does **not** depend on any parsing or
//! highlighting systems. It provides the closed set of languages the engine understands and the
//! small amount of static data (comment tokens, file extensions) that highlighters and hosts
//! need to behave in a language-aware way.

use std::fmt;
use std::str::FromStr;

/// The languages understood by the engine.
///
/// Anything outside this set degrades to [`Language::Plain`]; parsing a tag never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    /// Swift source.
    Swift,
    /// Python source.
    Python,
    /// Bash / POSIX shell scripts.
    Bash,
    /// Markdown documents.
    Markdown,
    /// Unstyled text.
    #[default]
    Plain,
}

impl Language {
    /// All languages, in a stable order.
    pub const ALL: [Language; 5] = [
        Language::Swift,
        Language::Python,
        Language::Bash,
        Language::Markdown,
        Language::Plain,
    ];

    /// Parse a language tag (case-insensitive). Unknown tags map to [`Language::Plain`].
    ///
    /// A few common aliases are accepted (`py`, `sh`, `shell`, `zsh`, `md`, `text`, `txt`).
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "swift" => Self::Swift,
            "python" | "py" | "python3" => Self::Python,
            "bash" | "sh" | "shell" | "zsh" => Self::Bash,
            "markdown" | "md" => Self::Markdown,
            _ => Self::Plain,
        }
    }

    /// Guess a language from a file extension (with or without the leading dot).
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext.as_str()))
            .unwrap_or(Self::Plain)
    }

    /// Guess a language from a file path by looking at its extension.
    pub fn from_path(path: &str) -> Self {
        match path.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.contains('/') => {
                Self::from_extension(ext)
            }
            _ => Self::Plain,
        }
    }

    /// Canonical tag for this language.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Swift => "swift",
            Self::Python => "python",
            Self::Bash => "bash",
            Self::Markdown => "markdown",
            Self::Plain => "plain",
        }
    }

    /// File extensions conventionally associated with this language.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Swift => &["swift"],
            Self::Python => &["py", "pyw"],
            Self::Bash => &["sh", "bash", "zsh"],
            Self::Markdown => &["md", "markdown"],
            Self::Plain => &["txt"],
        }
    }

    /// Comment tokens for this language.
    pub fn comment_config(self) -> CommentConfig {
        match self {
            Self::Swift => CommentConfig::line_and_block("//", "/*", "*/"),
            Self::Python | Self::Bash => CommentConfig::line("#"),
            Self::Markdown => CommentConfig::block("<!--", "-->"),
            Self::Plain => CommentConfig::default(),
        }
    }

    /// Returns `true` if highlighting this language produces no styling.
    pub fn is_plain(self) -> bool {
        matches!(self, Self::Plain)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(s))
    }
}

/// Comment tokens/config for a given language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentConfig {
    /// Line comment token (e.g. `//`, `#`).
    pub line: Option<String>,
    /// Block comment start token (e.g. `/*`).
    pub block_start: Option<String>,
    /// Block comment end token (e.g. `*/`).
    pub block_end: Option<String>,
}

impl CommentConfig {
    /// Create a config that supports only line comments.
    pub fn line(token: impl Into<String>) -> Self {
        Self {
            line: Some(token.into()),
            block_start: None,
            block_end: None,
        }
    }

    /// Create a config that supports only block comments.
    pub fn block(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            line: None,
            block_start: Some(start.into()),
            block_end: Some(end.into()),
        }
    }

    /// Create a config that supports both line and block comments.
    pub fn line_and_block(
        line: impl Into<String>,
        block_start: impl Into<String>,
        block_end: impl Into<String>,
    ) -> Self {
        Self {
            line: Some(line.into()),
            block_start: Some(block_start.into()),
            block_end: Some(block_end.into()),
        }
    }

    /// Returns `true` if a line comment token is configured.
    pub fn has_line(&self) -> bool {
        self.line.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Returns `true` if both block comment tokens are configured.
    pub fn has_block(&self) -> bool {
        self.block_start.as_deref().is_some_and(|s| !s.is_empty())
            && self.block_end.as_deref().is_some_and(|s| !s.is_empty())
    }
}
