use tui_textarea::{Input, Key};

use super::*;
use crate::models::{Conversation, Message, NoticeMessage};

fn new_app<'a>(config: &Configuration) -> (App<'a>, mpsc::UnboundedReceiver<Action>) {
    let (action_tx, action_rx) = mpsc::unbounded_channel();
    (
        App::new(config, action_tx, CancellationToken::new()),
        action_rx,
    )
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_event(Event::KeyboardCharInput(Input {
            key: Key::Char(c),
            ..Default::default()
        }));
    }
}

fn send(app: &mut App, text: &str) {
    type_text(app, text);
    app.handle_event(Event::KeyboardEnter);
}

fn last_notice(app: &App) -> Option<(NoticeKind, String)> {
    app.notice()
        .messages()
        .last()
        .map(|n| (n.kind(), n.message().to_string()))
}

#[test]
fn test_enter_dispatches_message() {
    let (mut app, mut rx) = new_app(&Configuration::default());
    send(&mut app, "what is in report.pdf?");

    assert!(
        matches!(rx.try_recv(), Ok(Action::SendChatMessage(text)) if text == "what is in report.pdf?")
    );
    assert_eq!(app.input_text(), "");
    assert!(app.session().waiting());
    assert_eq!(app.session().conversation().len(), 1);
}

#[test]
fn test_enter_on_blank_input_does_nothing() {
    let (mut app, mut rx) = new_app(&Configuration::default());
    send(&mut app, "   ");

    assert!(rx.try_recv().is_err());
    assert!(app.session().conversation().is_empty());
    assert!(app.notice().messages().is_empty());
}

#[test]
fn test_send_while_waiting_warns() {
    let (mut app, mut rx) = new_app(&Configuration::default());
    send(&mut app, "first");
    let _ = rx.try_recv();

    send(&mut app, "second");

    assert!(rx.try_recv().is_err());
    assert_eq!(app.input_text(), "second");
    assert_eq!(app.session().conversation().len(), 1);
    assert!(matches!(last_notice(&app), Some((NoticeKind::Warning, _))));
}

#[test]
fn test_chat_response_completes_exchange() {
    let (mut app, _rx) = new_app(&Configuration::default());
    send(&mut app, "hello");

    app.handle_event(Event::ChatResponse("hi there".to_string()));

    assert!(!app.session().waiting());
    assert_eq!(app.session().conversation().len(), 2);
    assert_eq!(
        app.session().conversation().last_message().map(|m| m.content()),
        Some("hi there")
    );
}

#[test]
fn test_save_empty_conversation() {
    let (mut app, mut rx) = new_app(&Configuration::default());
    app.handle_event(Event::KeyboardCtrlR);

    assert!(rx.try_recv().is_err());
    assert_eq!(
        last_notice(&app),
        Some((NoticeKind::Info, "Nothing to save".to_string()))
    );
}

#[test]
fn test_save_refused_while_waiting() {
    let (mut app, mut rx) = new_app(&Configuration::default());
    send(&mut app, "hello");
    let _ = rx.try_recv();

    app.handle_event(Event::KeyboardCtrlR);
    assert!(rx.try_recv().is_err());
    assert!(matches!(last_notice(&app), Some((NoticeKind::Warning, _))));
}

#[test]
fn test_successful_save_resets_session() {
    let (mut app, mut rx) = new_app(&Configuration::default());
    send(&mut app, "hello");
    app.handle_event(Event::ChatResponse("hi".to_string()));
    let _ = rx.try_recv();

    app.handle_event(Event::KeyboardCtrlR);
    let expected = Conversation::new().with_messages(vec![
        Message::new_user("hello"),
        Message::new_assistant("hi"),
    ]);
    assert!(matches!(rx.try_recv(), Ok(Action::SaveConversation(c)) if c == expected));

    // Nothing is cleared until the server confirmed
    assert_eq!(app.session().conversation().len(), 2);

    app.handle_event(Event::ConversationSaved);
    assert!(app.session().conversation().is_empty());
    assert!(app.session().transcript().is_empty());
}

#[test]
fn test_failed_save_keeps_conversation() {
    let (mut app, mut rx) = new_app(&Configuration::default());
    send(&mut app, "hello");
    app.handle_event(Event::ChatResponse("hi".to_string()));
    app.handle_event(Event::KeyboardCtrlR);
    while rx.try_recv().is_ok() {}

    app.handle_event(Event::Notice(NoticeMessage::error(
        "Failed to save conversation",
    )));

    assert_eq!(app.session().conversation().len(), 2);
    assert_eq!(app.session().transcript().len(), 2);
}

#[test]
fn test_channel_closed_abandons_reply() {
    let (mut app, _rx) = new_app(&Configuration::default());
    app.handle_event(Event::ChannelConnected);
    assert!(app.connected());

    send(&mut app, "hello");
    app.handle_event(Event::ChannelClosed("connection reset".to_string()));

    assert!(!app.connected());
    assert!(!app.session().waiting());
    assert_eq!(
        last_notice(&app),
        Some((
            NoticeKind::Error,
            "Disconnected: connection reset".to_string()
        ))
    );
}

#[test]
fn test_tick_expires_overdue_reply() {
    let mut config = Configuration::default();
    config.server.response_timeout_secs = 0;
    let (mut app, _rx) = new_app(&config);

    send(&mut app, "hello");
    app.handle_event(Event::UiTick);

    assert!(!app.session().waiting());
    assert!(matches!(last_notice(&app), Some((NoticeKind::Error, msg)) if msg.starts_with("No response")));
}

#[test]
fn test_ctrl_c_abandons_then_clears() {
    let (mut app, _rx) = new_app(&Configuration::default());
    send(&mut app, "hello");
    type_text(&mut app, "draft");

    app.handle_event(Event::KeyboardCtrlC);
    assert!(!app.session().waiting());
    assert_eq!(app.input_text(), "draft");

    app.handle_event(Event::KeyboardCtrlC);
    assert_eq!(app.input_text(), "");
}

#[test]
fn test_screens_take_key_events() {
    let (mut app, mut rx) = new_app(&Configuration::default());

    app.handle_event(Event::KeyboardCtrlF);
    assert!(matches!(rx.try_recv(), Ok(Action::ListFiles)));

    // Typing goes to the panel, not to the chat input
    type_text(&mut app, "j");
    assert_eq!(app.input_text(), "");

    app.handle_event(Event::FilesListed(vec!["a.txt".to_string()]));
    app.handle_event(Event::KeyboardEsc);

    app.handle_event(Event::KeyboardCtrlO);
    assert!(matches!(rx.try_recv(), Ok(Action::LoadConversations)));
    app.handle_event(Event::KeyboardEsc);

    type_text(&mut app, "x");
    assert_eq!(app.input_text(), "x");
}

#[test]
fn test_quit() {
    let (mut app, _rx) = new_app(&Configuration::default());
    assert!(app.handle_event(Event::Quit));

    app.handle_event(Event::KeyboardCtrlE);
    assert!(app.handle_event(Event::Quit));
}

#[test]
fn test_draft_survives_save_confirmation() {
    let (mut app, mut rx) = new_app(&Configuration::default());
    send(&mut app, "hello");
    app.handle_event(Event::ChatResponse("hi".to_string()));
    app.handle_event(Event::KeyboardCtrlR);
    while rx.try_recv().is_ok() {}

    // Typed while the save request is in flight
    type_text(&mut app, "next question");
    app.handle_event(Event::ConversationSaved);

    assert!(app.session().conversation().is_empty());
    assert_eq!(app.input_text(), "next question");
}

#[test]
fn test_endpoint_retry_after_failure() {
    let (mut app, mut rx) = new_app(&Configuration::default());
    app.handle_event(Event::KeyboardCtrlE);
    type_text(&mut app, "http://llm:9000");

    app.handle_event(Event::KeyboardEnter);
    assert!(matches!(rx.try_recv(), Ok(Action::UpdateEndpoint(v)) if v == "http://llm:9000"));

    app.handle_event(Event::Notice(NoticeMessage::error(
        "Failed to update LLM endpoint",
    )));
    app.handle_event(Event::KeyboardEnter);
    assert!(matches!(rx.try_recv(), Ok(Action::UpdateEndpoint(v)) if v == "http://llm:9000"));

    // Once confirmed, the same value is not pushed again
    app.handle_event(Event::EndpointUpdated("http://llm:9000".to_string()));
    app.handle_event(Event::KeyboardEnter);
    assert!(rx.try_recv().is_err());
}
