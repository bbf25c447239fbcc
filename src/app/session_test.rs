use super::*;
use crate::app::ui::BubbleKind;
use crate::models::Role;

fn session() -> ChatSession {
    ChatSession::new(Duration::from_secs(60))
}

#[test]
fn test_submit_appends_one_user_message() {
    for input in ["hello", "  padded  ", "multi\nline"] {
        let mut session = session();
        let outcome = session.submit(input);

        assert_eq!(outcome, SendOutcome::Dispatched(input.trim().to_string()));
        assert_eq!(session.conversation().len(), 1);
        assert_eq!(session.conversation().count_of(Role::User), 1);
        assert_eq!(session.conversation().messages()[0].content(), input.trim());
        assert_eq!(session.transcript().count(BubbleKind::User), 1);
        assert_eq!(session.transcript().count(BubbleKind::Thinking), 1);
        assert!(session.waiting());
    }
}

#[test]
fn test_blank_submit_is_noop() {
    for input in ["", "   ", "\n\t "] {
        let mut session = session();
        assert_eq!(session.submit(input), SendOutcome::Ignored);
        assert!(session.conversation().is_empty());
        assert!(session.transcript().is_empty());
        assert!(!session.waiting());
    }
}

#[test]
fn test_second_send_while_waiting_is_rejected() {
    let mut session = session();
    session.submit("first");

    assert_eq!(session.submit("second"), SendOutcome::Busy);
    assert_eq!(session.conversation().len(), 1);
    assert_eq!(session.transcript().count(BubbleKind::Thinking), 1);
}

#[test]
fn test_receive_replaces_placeholder() {
    let mut session = session();
    session.submit("question");
    let assistant_before = session.transcript().count(BubbleKind::Assistant);

    session.receive("answer");

    assert_eq!(session.transcript().count(BubbleKind::Thinking), 0);
    assert_eq!(
        session.transcript().count(BubbleKind::Assistant),
        assistant_before + 1
    );
    assert_eq!(session.conversation().len(), 2);
    assert_eq!(
        session.conversation().last_message().map(|m| m.role()),
        Some(Role::Assistant)
    );
    assert!(!session.waiting());

    // Sending works again once the reply arrived.
    assert!(matches!(session.submit("next"), SendOutcome::Dispatched(_)));
}

#[test]
fn test_receive_without_pending_request() {
    let mut session = session();
    session.receive("unsolicited");

    assert_eq!(session.transcript().count(BubbleKind::Assistant), 1);
    assert_eq!(session.conversation().count_of(Role::Assistant), 1);
}

#[test]
fn test_expire_after_deadline() {
    let mut session = ChatSession::new(Duration::from_millis(50));
    session.submit("question");

    assert!(!session.expire(Instant::now()));
    assert!(session.waiting());

    assert!(session.expire(Instant::now() + Duration::from_millis(100)));
    assert!(!session.waiting());
    assert_eq!(session.transcript().count(BubbleKind::Thinking), 0);
    // The user message stays.
    assert_eq!(session.conversation().len(), 1);

    // A late reply is still rendered.
    session.receive("late answer");
    assert_eq!(session.conversation().len(), 2);
    assert_eq!(session.transcript().count(BubbleKind::Assistant), 1);
}

#[test]
fn test_abandon() {
    let mut session = session();
    assert!(!session.abandon());

    session.submit("question");
    assert!(session.abandon());
    assert_eq!(session.transcript().count(BubbleKind::Thinking), 0);
    assert!(!session.waiting());
}

#[test]
fn test_reset_clears_everything() {
    let mut session = session();
    session.submit("question");
    session.receive("answer");

    session.reset();
    assert!(session.conversation().is_empty());
    assert!(session.transcript().is_empty());
    assert!(!session.waiting());
}
