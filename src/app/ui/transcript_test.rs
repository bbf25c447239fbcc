use super::*;

fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    let mut text = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            text.push_str(buf[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

#[test]
fn test_render_appends_entries() {
    let mut transcript = Transcript::new();
    transcript.render("hello", true);
    transcript.render("hi, how can I help?", false);

    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript.count(BubbleKind::User), 1);
    assert_eq!(transcript.count(BubbleKind::Assistant), 1);
    assert_eq!(transcript.entries()[0].content(), "hello");
    assert_eq!(transcript.entries()[1].kind(), BubbleKind::Assistant);
}

#[test]
fn test_single_thinking_placeholder() {
    let mut transcript = Transcript::new();
    let handle = transcript.show_thinking().expect("Expected a handle");
    assert!(transcript.show_thinking().is_none());
    assert_eq!(transcript.count(BubbleKind::Thinking), 1);
    assert_eq!(transcript.len(), 1);

    assert!(transcript.dismiss(handle));
    assert_eq!(transcript.count(BubbleKind::Thinking), 0);
    assert!(!transcript.is_thinking());
    assert!(transcript.show_thinking().is_some());
}

#[test]
fn test_clear_thinking_without_placeholder_is_noop() {
    let mut transcript = Transcript::new();
    transcript.render("hello", true);
    transcript.clear_thinking();
    assert_eq!(transcript.len(), 1);
}

#[test]
fn test_dismiss_after_clear() {
    let mut transcript = Transcript::new();
    let handle = transcript.show_thinking().unwrap();
    transcript.clear();

    assert!(transcript.is_empty());
    assert!(!transcript.dismiss(handle));
}

#[test]
fn test_scrolls_to_newest_after_append() {
    let mut transcript = Transcript::new();
    let area = Rect::new(0, 0, 40, 8);
    let mut buf = Buffer::empty(area);

    for i in 0..10 {
        transcript.render(format!("message number {}", i), i % 2 == 0);
    }
    transcript.draw(area, &mut buf);
    assert!(transcript.line_count() > 8);
    assert!(transcript.is_at_bottom());

    transcript.scroll_page_up();
    transcript.draw(area, &mut buf);
    assert!(!transcript.is_at_bottom());

    transcript.render("latest", false);
    transcript.draw(area, &mut buf);
    assert!(transcript.is_at_bottom());
    assert!(buffer_text(&buf).contains("latest"));
}

#[test]
fn test_draw_aligns_user_right() {
    let mut transcript = Transcript::new();
    let area = Rect::new(0, 0, 40, 12);
    let mut buf = Buffer::empty(area);

    transcript.render("question", true);
    transcript.render("answer", false);
    transcript.draw(area, &mut buf);

    let text = buffer_text(&buf);
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with(' '));
    assert!(lines[0].contains("you"));
    assert!(lines[1].contains("question"));
    let assistant_top = lines
        .iter()
        .position(|l| l.contains("assistant"))
        .expect("Missing assistant bubble");
    assert!(lines[assistant_top].starts_with('╭'));
    assert!(lines[assistant_top + 1].contains("answer"));
}

#[test]
fn test_thinking_animation() {
    let mut transcript = Transcript::new();
    let area = Rect::new(0, 0, 40, 6);
    let mut buf = Buffer::empty(area);

    transcript.show_thinking();
    transcript.draw(area, &mut buf);
    assert!(buffer_text(&buf).contains("Thinking"));

    transcript.tick();
    transcript.draw(area, &mut buf);
    assert!(buffer_text(&buf).contains("Thinking."));
}
