//! `codepane-highlight-simple` - Simple (regex-based) syntax highlighting for `codepane-core`.
//!
//! This crate provides a [`Highlighter`] for the languages in [`codepane_lang::Language`]
//! built from small per-language regex grammars. It is *not* a parser: it recognizes comments,
//! strings, keywords, numbers and a handful of other token classes, which is enough for a
//! lightweight editing pane.
//!
//! Rules are matched over the whole text, so block comments and multi-line strings work.
//! The text is scanned left to right: at each position the match that starts first wins, ties
//! go to the rule listed first, and scanning resumes after the winner. This is what keeps `//`
//! inside a string literal from starting a comment.

use codepane_core::{
    HighlightError, HighlightRequest, Highlighter, StyledText, Theme, ThemeId, TokenKind,
};
use codepane_lang::{CommentConfig, Language};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

/// A single regex highlighting rule.
#[derive(Debug, Clone)]
pub struct RegexRule {
    regex: Regex,
    kind: TokenKind,
    capture_group: Option<usize>,
}

impl RegexRule {
    /// Create a rule that styles every match of `pattern` as `kind`.
    pub fn new(pattern: &str, kind: TokenKind) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            kind,
            capture_group: None,
        })
    }

    /// Highlight only a capture group of each match.
    ///
    /// Example (Python function name):
    /// - pattern: `\bdef\s+([A-Za-z_]\w*)`
    /// - capture_group: `1` (the name)
    pub fn with_capture_group(mut self, group: usize) -> Self {
        self.capture_group = Some(group);
        self
    }

    /// Token kind produced by this rule.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Byte range of the first match starting at or after `start`, skipping empty matches.
    fn find_from(&self, text: &str, mut start: usize) -> Option<Range<usize>> {
        while start <= text.len() {
            let (whole, range) = match self.capture_group {
                Some(group) => {
                    let caps = self.regex.captures_at(text, start)?;
                    let whole = caps.get(0)?.range();
                    (whole, caps.get(group).map(|m| m.range()))
                }
                None => {
                    let m = self.regex.find_at(text, start)?;
                    (m.range(), Some(m.range()))
                }
            };
            match range {
                Some(range) if range.start < range.end => return Some(range),
                _ if whole.end > whole.start => start = whole.end,
                _ => start = next_char_boundary(text, whole.end)?,
            }
        }
        None
    }
}

/// An ordered list of rules for one language.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    rules: Vec<RegexRule>,
}

impl Grammar {
    /// Create a grammar. Earlier rules win ties.
    pub fn new(rules: Vec<RegexRule>) -> Self {
        Self { rules }
    }

    /// The rules, in priority order.
    pub fn rules(&self) -> &[RegexRule] {
        &self.rules
    }

    /// Tokenize `text`, returning non-overlapping character ranges sorted by start.
    pub fn tokens(&self, text: &str) -> Vec<(Range<usize>, TokenKind)> {
        let mut next: Vec<Option<Range<usize>>> =
            self.rules.iter().map(|rule| rule.find_from(text, 0)).collect();
        let mut chars = CharCursor::new(text);
        let mut tokens = Vec::new();
        let mut pos = 0usize;

        loop {
            for (rule, slot) in self.rules.iter().zip(next.iter_mut()) {
                if slot.as_ref().is_some_and(|range| range.start < pos) {
                    *slot = rule.find_from(text, pos);
                }
            }
            let Some((_, winner)) = next
                .iter()
                .enumerate()
                .filter_map(|(priority, slot)| slot.as_ref().map(|r| (r.start, priority)))
                .min()
            else {
                break;
            };
            let Some(range) = next[winner].take() else {
                break;
            };
            next[winner] = self.rules[winner].find_from(text, range.end);
            let start = chars.advance_to(range.start);
            let end = chars.advance_to(range.end);
            tokens.push((start..end, self.rules[winner].kind));
            pos = range.end;
        }
        tokens
    }

    /// The built-in grammar for `language`, or `None` for [`Language::Plain`].
    pub fn builtin(language: Language) -> Result<Option<Self>, regex::Error> {
        let grammar = match language {
            Language::Swift => Self::swift()?,
            Language::Python => Self::python()?,
            Language::Bash => Self::bash()?,
            Language::Markdown => Self::markdown()?,
            Language::Plain => return Ok(None),
        };
        Ok(Some(grammar))
    }

    /// A small Swift grammar.
    pub fn swift() -> Result<Self, regex::Error> {
        let mut rules = comment_rules(&Language::Swift.comment_config())?;
        rules.extend([
            RegexRule::new(r#"(?s)""".*?""""#, TokenKind::String)?,
            RegexRule::new(r#""(?:\\.|[^"\\\n])*""#, TokenKind::String)?,
            RegexRule::new(r"@[A-Za-z_]\w*", TokenKind::Attribute)?,
            RegexRule::new(&keyword_pattern(SWIFT_KEYWORDS), TokenKind::Keyword)?,
            RegexRule::new(NUMBER_PATTERN, TokenKind::Number)?,
            RegexRule::new(r"\b[A-Z][A-Za-z0-9_]*\b", TokenKind::Type)?,
            RegexRule::new(r"\b([a-z_][A-Za-z0-9_]*)\s*\(", TokenKind::Function)?
                .with_capture_group(1),
        ]);
        Ok(Self::new(rules))
    }

    /// A small Python grammar.
    pub fn python() -> Result<Self, regex::Error> {
        let mut rules = comment_rules(&Language::Python.comment_config())?;
        rules.extend([
            RegexRule::new(r#"(?s)""".*?"""|'''.*?'''"#, TokenKind::String)?,
            RegexRule::new(
                r#""(?:\\.|[^"\\\n])*"|'(?:\\.|[^'\\\n])*'"#,
                TokenKind::String,
            )?,
            RegexRule::new(r"@[A-Za-z_][\w.]*", TokenKind::Attribute)?,
            RegexRule::new(&keyword_pattern(PYTHON_KEYWORDS), TokenKind::Keyword)?,
            RegexRule::new(r"\b(?:def|class)\s+([A-Za-z_]\w*)", TokenKind::Function)?
                .with_capture_group(1),
            RegexRule::new(NUMBER_PATTERN, TokenKind::Number)?,
            RegexRule::new(r"\b[A-Z][A-Za-z0-9_]*\b", TokenKind::Type)?,
            RegexRule::new(r"\b([a-z_][A-Za-z0-9_]*)\s*\(", TokenKind::Function)?
                .with_capture_group(1),
        ]);
        Ok(Self::new(rules))
    }

    /// A small Bash grammar.
    pub fn bash() -> Result<Self, regex::Error> {
        // Variables come first so that `$#` and `${#name}` are not read as comments.
        let mut rules = vec![RegexRule::new(
            r"\$(?:\{[^}\n]*\}|[A-Za-z_]\w*|[0-9@#?$!*-])",
            TokenKind::Variable,
        )?];
        rules.extend(comment_rules(&Language::Bash.comment_config())?);
        rules.extend([
            RegexRule::new(r#""(?:\\.|[^"\\])*"|'[^']*'"#, TokenKind::String)?,
            RegexRule::new(&keyword_pattern(BASH_KEYWORDS), TokenKind::Keyword)?,
            RegexRule::new(&keyword_pattern(BASH_BUILTINS), TokenKind::Function)?,
            RegexRule::new(r"(?m)^[ \t]*([A-Za-z_][\w-]*)[ \t]*\(\)", TokenKind::Function)?
                .with_capture_group(1),
            RegexRule::new(r"\b\d+\b", TokenKind::Number)?,
        ]);
        Ok(Self::new(rules))
    }

    /// A small Markdown grammar.
    pub fn markdown() -> Result<Self, regex::Error> {
        let mut rules = vec![RegexRule::new(r"(?ms)^```.*?^```[^\n]*", TokenKind::Code)?];
        rules.extend(comment_rules(&Language::Markdown.comment_config())?);
        rules.extend([
            RegexRule::new(r"(?m)^#{1,6}[ \t][^\n]*", TokenKind::Heading)?,
            RegexRule::new(r"`[^`\n]+`", TokenKind::Code)?,
            RegexRule::new(r"!?\[[^\]\n]*\]\([^)\n]*\)", TokenKind::Link)?,
            RegexRule::new(r"\*\*[^*\n]+\*\*|__[^_\n]+__", TokenKind::Emphasis)?,
            RegexRule::new(r"\*[^*\n]+\*|\b_[^_\n]+_\b", TokenKind::Emphasis)?,
        ]);
        Ok(Self::new(rules))
    }
}

/// Regex highlighter with a grammar per language and a set of themes.
#[derive(Debug, Clone)]
pub struct RegexHighlighter {
    grammars: HashMap<Language, Grammar>,
    themes: BTreeMap<ThemeId, Theme>,
}

impl RegexHighlighter {
    /// A highlighter with the built-in grammars and the built-in light and dark themes.
    pub fn new() -> Result<Self, regex::Error> {
        let mut highlighter = Self::empty();
        for language in Language::ALL {
            if let Some(grammar) = Grammar::builtin(language)? {
                highlighter.set_grammar(language, grammar);
            }
        }
        highlighter.register_theme(Theme::light());
        highlighter.register_theme(Theme::dark());
        Ok(highlighter)
    }

    /// A highlighter without grammars or themes.
    pub fn empty() -> Self {
        Self {
            grammars: HashMap::new(),
            themes: BTreeMap::new(),
        }
    }

    /// Install (or replace) the grammar for `language`.
    pub fn set_grammar(&mut self, language: Language, grammar: Grammar) {
        self.grammars.insert(language, grammar);
    }

    /// Grammar for `language`, if any.
    pub fn grammar(&self, language: Language) -> Option<&Grammar> {
        self.grammars.get(&language)
    }

    /// Register a theme, replacing any theme with the same id.
    pub fn register_theme(&mut self, theme: Theme) {
        self.themes.insert(theme.id.clone(), theme);
    }

    /// Ids of the registered themes.
    pub fn theme_ids(&self) -> impl Iterator<Item = &ThemeId> {
        self.themes.keys()
    }
}

impl Highlighter for RegexHighlighter {
    fn highlight(&self, request: &HighlightRequest) -> Result<StyledText, HighlightError> {
        let theme = self
            .themes
            .get(&request.theme_id)
            .ok_or_else(|| HighlightError::UnknownTheme(request.theme_id.clone()))?;
        let len = request.text.chars().count();

        let Some(grammar) = self.grammars.get(&request.language) else {
            return Ok(StyledText::uniform(len, theme.plain));
        };
        let tokens = grammar.tokens(&request.text);
        tracing::trace!(
            language = %request.language,
            tokens = tokens.len(),
            "Regex highlight pass"
        );
        Ok(StyledText::from_tokens(len, tokens, theme))
    }

    fn theme(&self, id: &ThemeId) -> Option<Theme> {
        self.themes.get(id).cloned()
    }
}

const NUMBER_PATTERN: &str =
    r"\b(?:0[xX][0-9a-fA-F_]+|0[bB][01_]+|\d[\d_]*(?:\.\d[\d_]*)?(?:[eE][+-]?\d+)?)\b";

const SWIFT_KEYWORDS: &[&str] = &[
    "actor", "any", "as", "associatedtype", "async", "await", "break", "case", "catch", "class",
    "continue", "default", "defer", "deinit", "do", "else", "enum", "extension", "fallthrough",
    "false", "fileprivate", "final", "for", "func", "guard", "if", "import", "in", "init",
    "inout", "internal", "is", "lazy", "let", "mutating", "nil", "open", "override", "private",
    "protocol", "public", "repeat", "rethrows", "return", "self", "Self", "some", "static",
    "struct", "subscript", "super", "switch", "throw", "throws", "true", "try", "typealias",
    "unowned", "var", "weak", "where", "while",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "case", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "match", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

const BASH_KEYWORDS: &[&str] = &[
    "case", "declare", "do", "done", "elif", "else", "esac", "export", "fi", "for", "function",
    "if", "in", "local", "readonly", "return", "select", "then", "time", "until", "while",
];

const BASH_BUILTINS: &[&str] = &[
    "cd", "echo", "eval", "exec", "exit", "printf", "read", "set", "shift", "source", "test",
    "trap", "unset",
];

fn next_char_boundary(text: &str, byte: usize) -> Option<usize> {
    let ch = text.get(byte..)?.chars().next()?;
    Some(byte + ch.len_utf8())
}

fn keyword_pattern(words: &[&str]) -> String {
    format!(r"\b(?:{})\b", words.join("|"))
}

fn comment_rules(config: &CommentConfig) -> Result<Vec<RegexRule>, regex::Error> {
    let mut rules = Vec::new();
    if let (Some(start), Some(end)) = (&config.block_start, &config.block_end) {
        let pattern = format!(r"(?s){}.*?{}", regex::escape(start), regex::escape(end));
        rules.push(RegexRule::new(&pattern, TokenKind::Comment)?);
    }
    if let Some(line) = &config.line {
        let pattern = format!(r"{}[^\n]*", regex::escape(line));
        rules.push(RegexRule::new(&pattern, TokenKind::Comment)?);
    }
    Ok(rules)
}

/// Converts monotonically increasing byte offsets to char offsets in one pass.
struct CharCursor<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    fn advance_to(&mut self, byte: usize) -> usize {
        debug_assert!(byte >= self.byte, "byte offsets must not go backwards");
        if byte > self.byte {
            self.chars += self.text[self.byte..byte].chars().count();
            self.byte = byte;
        }
        self.chars
    }
}
