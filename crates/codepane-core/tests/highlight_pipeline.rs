use codepane_core::{
    Completion, DecorationLayerId, EditorController, EditorEvent, HighlightError,
    HighlightRequest, Highlighter, LintMessage, SchedulerState, Selection, StyleAttributes,
    StyledText, Theme, TokenKind,
};
use codepane_lang::Language;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Styles the first word as a keyword (plain text for `Language::Plain`) and records every call.
#[derive(Clone, Default)]
struct RecordingHighlighter {
    calls: Rc<RefCell<Vec<HighlightRequest>>>,
}

impl Highlighter for RecordingHighlighter {
    fn highlight(&self, request: &HighlightRequest) -> Result<StyledText, HighlightError> {
        self.calls.borrow_mut().push(request.clone());
        let theme = Theme::builtin(request.theme_id.as_str())
            .ok_or_else(|| HighlightError::UnknownTheme(request.theme_id.clone()))?;
        let len = request.text.chars().count();
        if request.language.is_plain() {
            return Ok(StyledText::uniform(len, theme.plain));
        }
        let word = request
            .text
            .chars()
            .take_while(|c| c.is_alphanumeric())
            .count();
        Ok(StyledText::from_tokens(
            len,
            [(0..word, TokenKind::Keyword)],
            &theme,
        ))
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn setup(text: &str, language: Language) -> (EditorController, RecordingHighlighter, Instant) {
    let highlighter = RecordingHighlighter::default();
    let mut editor = EditorController::new(Box::new(highlighter.clone()));
    let t0 = Instant::now();
    editor.set_text(text, language, t0);
    editor.tick(t0);
    highlighter.calls.borrow_mut().clear();
    (editor, highlighter, t0)
}

fn keyword_style(theme: &Theme) -> StyleAttributes {
    theme.style_for(TokenKind::Keyword)
}

#[test]
fn test_document_load_highlights_immediately() {
    let highlighter = RecordingHighlighter::default();
    let mut editor = EditorController::new(Box::new(highlighter.clone()));
    let t0 = Instant::now();

    editor.set_text("func main", Language::Swift, t0);
    assert_eq!(editor.next_deadline(), Some(t0));
    editor.tick(t0);

    assert_eq!(highlighter.calls.borrow().len(), 1);
    assert_eq!(
        editor.styled().style_at(0),
        Some(keyword_style(&Theme::light()))
    );
}

#[test]
fn test_debounce_collapses_rapid_edits() {
    let (mut editor, highlighter, t0) = setup("", Language::Swift);

    editor.on_edit("l", t0);
    editor.tick(t0 + ms(50));
    editor.on_edit("le", t0 + ms(100));
    editor.tick(t0 + ms(150));
    editor.on_edit("let", t0 + ms(200));
    editor.tick(t0 + ms(250));
    editor.tick(t0 + ms(400));
    assert!(highlighter.calls.borrow().is_empty());

    editor.tick(t0 + ms(500));
    editor.tick(t0 + ms(1_000));

    let calls = highlighter.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].text.as_ref(), "let");
    assert_eq!(editor.scheduler_state(), SchedulerState::Idle);
}

#[test]
fn test_identical_text_does_not_reschedule() {
    let (mut editor, highlighter, t0) = setup("let", Language::Swift);

    assert!(!editor.on_edit("let", t0 + ms(10)));
    editor.tick(t0 + ms(1_000));
    assert!(highlighter.calls.borrow().is_empty());
}

#[test]
fn test_stale_completion_is_discarded() {
    let (mut editor, _, t0) = setup("", Language::Swift);

    editor.on_edit("abc", t0);
    let job = editor.poll_highlight_job(t0 + ms(300)).unwrap();
    assert_eq!(job.request.text.as_ref(), "abc");
    assert_eq!(editor.scheduler_state(), SchedulerState::Running);

    editor.on_edit("abcd", t0 + ms(350));
    editor.set_selection(Selection::caret(2));
    assert_eq!(editor.scheduler_state(), SchedulerState::Superseded);

    let styled_before = editor.styled().clone();
    let stale = StyledText::uniform(3, StyleAttributes::default().bold());
    assert_eq!(
        editor.on_highlight_complete(stale, job.generation),
        Completion::Stale
    );
    assert_eq!(editor.styled(), &styled_before);
    assert_eq!(editor.selection(), Selection::caret(2));

    // The superseding request is still due on its own schedule.
    assert!(editor.poll_highlight_job(t0 + ms(600)).is_none());
    let next = editor.poll_highlight_job(t0 + ms(650)).unwrap();
    assert_eq!(next.request.text.as_ref(), "abcd");
}

#[test]
fn test_highlight_preserves_selection() {
    let (mut editor, _, t0) = setup("hello world", Language::Swift);
    editor.set_selection(Selection::caret(5));

    editor.on_edit("hello world!", t0 + ms(10));
    assert_eq!(editor.selection(), Selection::caret(5));
    editor.tick(t0 + ms(310));

    assert_eq!(editor.selection(), Selection::new(5, 5));
    assert_eq!(
        editor.styled().style_at(0),
        Some(keyword_style(&Theme::light()))
    );
    assert_eq!(editor.styled().len(), 12);
}

#[test]
fn test_unknown_language_falls_back_to_plain() {
    let (editor, _, _) = setup("anything at all", Language::from_tag("unknown"));

    assert_eq!(editor.language(), Language::Plain);
    let spans = editor.rendered_spans();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].range, 0..15);
    assert_eq!(spans[0].style, Theme::light().plain);
}

#[test]
fn test_highlighter_error_degrades_to_plain() {
    let (mut editor, highlighter, t0) = setup("let x", Language::Swift);

    editor.set_theme("solarized".into(), t0 + ms(5));
    editor.tick(t0 + ms(5));

    assert_eq!(highlighter.calls.borrow().len(), 1);
    assert_eq!(editor.styled().spans().len(), 1);
    // Unknown themes fall back to the light theme for overlays and fill.
    assert_eq!(editor.styled().spans()[0].style, Theme::light().plain);
}

#[test]
fn test_theme_change_rehighlights_on_next_tick() {
    let (mut editor, highlighter, t0) = setup("let x", Language::Swift);
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    editor.subscribe(move |event| sink.borrow_mut().push(event.clone()));

    editor.set_theme("dark".into(), t0 + ms(5));
    assert_eq!(editor.next_deadline(), Some(t0 + ms(5)));
    editor.tick(t0 + ms(5));

    assert_eq!(highlighter.calls.borrow().len(), 1);
    assert_eq!(highlighter.calls.borrow()[0].theme_id.as_str(), "dark");
    assert_eq!(
        editor.styled().style_at(0),
        Some(keyword_style(&Theme::dark()))
    );
    assert!(
        events
            .borrow()
            .iter()
            .any(|e| matches!(e, EditorEvent::DisplayConfigChanged(d) if d.theme_id.as_str() == "dark"))
    );
    assert!(
        events
            .borrow()
            .iter()
            .any(|e| matches!(e, EditorEvent::HighlightApplied { .. }))
    );
}

#[test]
fn test_language_change_rehighlights() {
    let (mut editor, highlighter, t0) = setup("echo hi", Language::Plain);
    assert_eq!(editor.styled().spans().len(), 1);

    editor.set_language(Language::Bash, t0 + ms(1));
    editor.tick(t0 + ms(1));

    assert_eq!(highlighter.calls.borrow()[0].language, Language::Bash);
    assert_eq!(
        editor.styled().style_at(0),
        Some(keyword_style(&Theme::light()))
    );
}

#[test]
fn test_lint_result_waits_for_running_highlight() {
    let (mut editor, _, t0) = setup("x\ny\n", Language::Python);

    editor.on_edit("x\ny\nz\n", t0 + ms(10));
    editor.on_lint_result(vec![LintMessage::new(2, "undefined name")]);
    assert!(editor.decorations().layer(DecorationLayerId::LINT).is_empty());

    editor.tick(t0 + ms(310));
    let lint = editor.decorations().layer(DecorationLayerId::LINT);
    assert_eq!(lint.len(), 1);
    assert_eq!(lint[0].range, 2..3);
}

#[test]
fn test_lint_result_applies_when_idle() {
    let (mut editor, _, _) = setup("x\ny\n", Language::Python);

    editor.on_lint_result(vec![
        LintMessage::new(2, "undefined name"),
        LintMessage::new(5, "past the end"),
    ]);
    let lint = editor.decorations().layer(DecorationLayerId::LINT);
    assert_eq!(lint.len(), 1);
    assert_eq!(lint[0].range, 2..3);
    assert_eq!(lint[0].tooltip.as_deref(), Some("undefined name"));

    let theme = Theme::light();
    let underlined = editor
        .rendered_spans()
        .into_iter()
        .find(|span| span.range == (2..3))
        .unwrap();
    assert_eq!(underlined.style.underline_color, Some(theme.lint_error));
}

#[test]
fn test_stale_lint_revision_is_ignored() {
    let (mut editor, _, t0) = setup("x\ny\n", Language::Python);
    let old_revision = editor.revision();

    editor.on_edit("x\ny\nz\n", t0 + ms(10));
    assert!(!editor.on_lint_result_for(old_revision, vec![LintMessage::new(1, "old")]));
    assert!(editor.lint_messages().is_empty());

    assert!(editor.on_lint_result_for(editor.revision(), vec![LintMessage::new(3, "new")]));
    assert_eq!(editor.lint_messages().len(), 1);
}

#[test]
fn test_lint_requested_for_every_edit() {
    let (mut editor, _, t0) = setup("", Language::Bash);
    let requests = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&requests);
    editor.subscribe(move |event| {
        if let EditorEvent::LintRequested { revision, text, language } = event {
            sink.borrow_mut().push((*revision, text.to_string(), *language));
        }
    });

    editor.on_edit("ls", t0);
    editor.on_edit("ls -l", t0 + ms(20));

    assert_eq!(
        *requests.borrow(),
        vec![
            (1, "ls".to_string(), Language::Bash),
            (2, "ls -l".to_string(), Language::Bash),
        ]
    );
}
