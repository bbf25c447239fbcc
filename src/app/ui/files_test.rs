use ratatui::{Terminal, backend::TestBackend};
use tui_textarea::Input;

use super::*;

fn key(c: char) -> Event {
    Event::KeyboardCharInput(Input {
        key: Key::Char(c),
        ..Default::default()
    })
}

fn setup() -> (FilesScreen<'static>, mpsc::UnboundedReceiver<Action>) {
    let (action_tx, action_rx) = mpsc::unbounded_channel();
    let screen = FilesScreen::new(action_tx, &["txt".to_string(), "pdf".to_string()]);
    (screen, action_rx)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<Action>) -> Vec<Action> {
    let mut actions = vec![];
    while let Ok(action) = rx.try_recv() {
        actions.push(action);
    }
    actions
}

fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    let buf = terminal.backend().buffer();
    buf.content.iter().map(|c| c.symbol()).collect()
}

#[test]
fn test_open_fetches_listing() {
    let (mut screen, mut rx) = setup();
    screen.open();

    assert!(screen.showing());
    assert!(matches!(&drain(&mut rx)[..], [Action::ListFiles]));
}

#[test]
fn test_set_files_replaces_listing() {
    let (mut screen, _rx) = setup();
    screen.set_files(vec!["a.txt".to_string(), "b.pdf".to_string()]);
    screen.handle_key_event(&key('j'));
    assert_eq!(screen.selected_file(), Some("b.pdf"));

    screen.set_files(vec!["c.txt".to_string()]);
    assert_eq!(screen.files(), &["c.txt".to_string()]);
    assert_eq!(screen.selected_file(), Some("c.txt"));

    screen.set_files(vec![]);
    assert_eq!(screen.selected_file(), None);
}

#[test]
fn test_delete_requires_confirmation() {
    let (mut screen, mut rx) = setup();
    screen.open();
    screen.set_files(vec!["a.txt".to_string(), "b.pdf".to_string()]);
    drain(&mut rx);

    screen.handle_key_event(&key('d'));
    assert!(drain(&mut rx).is_empty());

    screen.handle_key_event(&key('n'));
    assert!(drain(&mut rx).is_empty());

    screen.handle_key_event(&key('d'));
    screen.handle_key_event(&key('y'));
    assert!(matches!(&drain(&mut rx)[..], [Action::DeleteFile(name)] if name == "a.txt"));
}

#[test]
fn test_quit_while_confirming_delete() {
    let (mut screen, mut rx) = setup();
    screen.open();
    screen.set_files(vec!["a.txt".to_string()]);
    screen.handle_key_event(&key('d'));

    assert!(screen.handle_key_event(&Event::Quit));
    assert!(!screen.showing());
    // Nothing was deleted on the way out
    assert!(matches!(&drain(&mut rx)[..], [Action::ListFiles]));
}

#[test]
fn test_delete_with_empty_listing() {
    let (mut screen, mut rx) = setup();
    screen.open();
    drain(&mut rx);

    screen.handle_key_event(&key('d'));
    screen.handle_key_event(&key('y'));
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn test_upload_sends_path() {
    let (mut screen, mut rx) = setup();
    screen.open();
    drain(&mut rx);

    screen.handle_key_event(&key('u'));
    for c in "/tmp/notes.txt".chars() {
        screen.handle_key_event(&key(c));
    }
    screen.handle_key_event(&Event::KeyboardEnter);

    assert!(matches!(
        &drain(&mut rx)[..],
        [Action::UploadFile(path)] if path == &PathBuf::from("/tmp/notes.txt")
    ));
}

#[test]
fn test_upload_cancelled_or_empty() {
    let (mut screen, mut rx) = setup();
    screen.open();
    drain(&mut rx);

    screen.handle_key_event(&key('u'));
    screen.handle_key_event(&key('x'));
    screen.handle_key_event(&Event::KeyboardEsc);
    assert!(drain(&mut rx).is_empty());
    assert!(screen.showing());

    screen.handle_key_event(&key('u'));
    screen.handle_key_event(&Event::KeyboardEnter);
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn test_refresh_and_close() {
    let (mut screen, mut rx) = setup();
    screen.open();
    drain(&mut rx);

    screen.handle_key_event(&key('r'));
    assert!(matches!(&drain(&mut rx)[..], [Action::ListFiles]));

    screen.handle_key_event(&key('q'));
    assert!(!screen.showing());
    assert!(screen.handle_key_event(&Event::Quit));
}

#[test]
fn test_render_listing() {
    let (mut screen, _rx) = setup();
    let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();

    screen.open();
    screen.set_files(vec![]);
    terminal.draw(|f| screen.render(f, f.area())).unwrap();
    assert!(screen_text(&terminal).contains(NO_FILES));

    screen.set_files(vec!["report.pdf".to_string()]);
    terminal.draw(|f| screen.render(f, f.area())).unwrap();
    let text = screen_text(&terminal);
    assert!(text.contains("report.pdf"));
    assert!(text.contains("Uploaded Files"));
}
