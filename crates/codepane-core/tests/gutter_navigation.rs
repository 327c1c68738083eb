use codepane_core::{
    DecorationLayerId, EditorController, EditorEvent, FlashState, LintMessage, LintSeverity,
    PlainHighlighter, Selection, Theme,
};
use codepane_lang::Language;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn editor_with(text: &str) -> (EditorController, Instant) {
    let mut editor = EditorController::new(Box::new(PlainHighlighter));
    let t0 = Instant::now();
    editor.set_text(text, Language::Plain, t0);
    editor.tick(t0);
    (editor, t0)
}

fn record_events(editor: &mut EditorController) -> Rc<RefCell<Vec<EditorEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    editor.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

#[test]
fn test_jump_selects_line_and_flashes() {
    let (mut editor, t0) = editor_with("a\nb\nc\n");
    let events = record_events(&mut editor);

    assert_eq!(editor.jump_to_line(2, t0), 2);
    assert_eq!(editor.selection(), Selection::new(2, 3));
    assert_eq!(
        editor.decorations().layer(DecorationLayerId::FLASH)[0].range,
        2..3
    );
    let flashed = editor
        .rendered_spans()
        .into_iter()
        .find(|span| span.range == (2..3))
        .unwrap();
    assert_eq!(
        flashed.style.background,
        Some(Theme::light().flash_background)
    );

    // An edit in between does not keep the flash alive.
    editor.on_edit("a\nb\nc\nd", t0 + ms(100));
    editor.tick(t0 + ms(499));
    assert!(matches!(editor.flash_state(), FlashState::Flashing { line: 2, .. }));

    editor.tick(t0 + ms(500));
    assert_eq!(editor.flash_state(), FlashState::Normal);
    assert!(editor.decorations().layer(DecorationLayerId::FLASH).is_empty());

    let events = events.borrow();
    assert!(events.contains(&EditorEvent::JumpStarted { line: 2 }));
    assert!(events.contains(&EditorEvent::JumpFinished { line: 2 }));
}

#[test]
fn test_jump_restarts_flash_timer() {
    let (mut editor, t0) = editor_with("a\nb\nc\n");

    editor.jump_to_line(1, t0);
    editor.jump_to_line(3, t0 + ms(400));
    editor.tick(t0 + ms(500));
    assert!(matches!(editor.flash_state(), FlashState::Flashing { line: 3, .. }));
    assert_eq!(editor.next_deadline(), Some(t0 + ms(900)));

    editor.tick(t0 + ms(900));
    assert_eq!(editor.flash_state(), FlashState::Normal);
}

#[test]
fn test_jump_clamps_out_of_range_lines() {
    let (mut editor, t0) = editor_with("a\nb");
    assert_eq!(editor.jump_to_line(0, t0), 1);
    assert_eq!(editor.selection(), Selection::new(0, 1));
    assert_eq!(editor.jump_to_line(40, t0), 2);
    assert_eq!(editor.selection(), Selection::new(2, 3));
}

#[test]
fn test_jump_to_empty_line() {
    let (mut editor, t0) = editor_with("a\n\nc");
    editor.jump_to_line(2, t0);
    assert_eq!(editor.selection(), Selection::caret(2));
}

#[test]
fn test_gutter_click_jumps_to_line() {
    let (mut editor, t0) = editor_with("a\nb\nc\n");
    editor.set_viewport_height(100.0);

    // 14pt * 1.25 = 17.5px per line
    assert_eq!(editor.on_gutter_click(20.0, t0), 2);
    assert_eq!(editor.selection(), Selection::new(2, 3));
    assert_eq!(editor.on_gutter_click(500.0, t0), 4);
    assert_eq!(editor.selection(), Selection::caret(6));
}

#[test]
fn test_gutter_frame_marks_lint_and_caret() {
    let (mut editor, _) = editor_with("x\ny\nz");
    editor.set_viewport_height(200.0);
    editor.set_selection(Selection::caret(3));
    editor.on_lint_result(vec![
        LintMessage::warning(1, "style"),
        LintMessage::new(3, "error"),
        LintMessage::warning(3, "also style"),
    ]);

    let frame = editor.gutter();
    let rows: Vec<_> = frame
        .lines
        .iter()
        .map(|line| (line.number, line.lint, line.is_current))
        .collect();
    assert_eq!(
        rows,
        vec![
            (1, Some(LintSeverity::Warning), false),
            (2, None, true),
            (3, Some(LintSeverity::Error), false),
        ]
    );
    assert_eq!(frame.digits, 3);
    assert_eq!(editor.gutter_width(8.0), 40.0);
}

#[test]
fn test_gutter_follows_scroll() {
    let text = (1..=100).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
    let (mut editor, _) = editor_with(&text);
    editor.set_viewport_height(35.0);
    editor.set_scroll_y(175.0);

    let numbers: Vec<_> = editor.gutter().lines.iter().map(|l| l.number).collect();
    assert_eq!(numbers, vec![11, 12]);
    assert_eq!(editor.gutter().lines[0].y, 0.0);
}

#[test]
fn test_crlf_lines_keep_carriage_return() {
    let (mut editor, t0) = editor_with("one\r\ntwo\r\n");
    editor.jump_to_line(1, t0);
    assert_eq!(editor.selection(), Selection::new(0, 4));
    assert_eq!(editor.buffer().line_index().line_count(), 3);
}
