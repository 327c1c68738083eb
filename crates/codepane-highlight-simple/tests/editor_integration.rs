use codepane_core::{
    EditorController, LintMessage, Selection, Theme, ThemeId, TokenKind, UnderlineStyle,
};
use codepane_highlight_simple::RegexHighlighter;
use codepane_lang::Language;
use std::time::{Duration, Instant};

fn editor() -> EditorController {
    EditorController::new(Box::new(RegexHighlighter::new().unwrap()))
}

#[test]
fn test_swift_document_is_styled_after_load() {
    let mut editor = editor();
    let t0 = Instant::now();
    editor.set_text("let answer = 42 // why\n", Language::Swift, t0);
    editor.tick(t0);

    let theme = Theme::light();
    let styled = editor.styled();
    assert_eq!(styled.style_at(0), Some(theme.style_for(TokenKind::Keyword)));
    assert_eq!(styled.style_at(13), Some(theme.style_for(TokenKind::Number)));
    assert_eq!(styled.style_at(16), Some(theme.style_for(TokenKind::Comment)));
    assert_eq!(styled.style_at(4), Some(theme.plain));
}

#[test]
fn test_theme_switch_restyles_tokens() {
    let mut editor = editor();
    let t0 = Instant::now();
    editor.set_text("def f():\n    pass\n", Language::Python, t0);
    editor.tick(t0);

    editor.set_theme(ThemeId::new(ThemeId::DARK), t0 + Duration::from_millis(1));
    editor.tick(t0 + Duration::from_millis(1));
    assert_eq!(
        editor.styled().style_at(0),
        Some(Theme::dark().style_for(TokenKind::Keyword))
    );
}

#[test]
fn test_lint_underline_keeps_syntax_color() {
    let mut editor = editor();
    let t0 = Instant::now();
    editor.set_text("echo $HOME\nexit 1\n", Language::Bash, t0);
    editor.tick(t0);
    editor.on_lint_result(vec![LintMessage::new(1, "SC2086")]);

    let theme = Theme::light();
    let spans = editor.rendered_spans();
    let variable = spans.iter().find(|span| span.range.start == 5).unwrap();
    assert_eq!(variable.range, 5..10);
    assert_eq!(
        variable.style.foreground,
        theme.style_for(TokenKind::Variable).foreground
    );
    assert_eq!(variable.style.underline, Some(UnderlineStyle::Squiggle));
    assert_eq!(variable.style.underline_color, Some(theme.lint_error));
}

#[test]
fn test_typing_keeps_caret_through_highlight() {
    let mut editor = editor();
    let t0 = Instant::now();
    editor.set_text("# Notes\n", Language::Markdown, t0);
    editor.tick(t0);

    let mut text = String::from("# Notes\n");
    for (i, ch) in "*hi*".chars().enumerate() {
        text.push(ch);
        let caret = text.chars().count();
        editor.on_edit(&text, t0 + Duration::from_millis(50 * i as u64));
        editor.set_selection(Selection::caret(caret));
    }
    editor.tick(t0 + Duration::from_secs(1));

    assert_eq!(editor.selection(), Selection::caret(12));
    assert_eq!(
        editor.styled().style_at(8),
        Some(Theme::light().style_for(TokenKind::Emphasis))
    );
}
