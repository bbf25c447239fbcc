use std::sync::Arc;
use std::time;

use tokio::net::TcpListener;

use super::*;

#[test]
fn test_handle_open_sends_connect() {
    let outcome = handle_frame(r#"0{"sid":"abc","pingInterval":25000,"pingTimeout":20000}"#)
        .expect("Failed to handle open");
    assert!(matches!(outcome, FrameOutcome::Reply(Packet::Connect)));
}

#[test]
fn test_handle_ping_replies_pong() {
    let outcome = handle_frame("2").expect("Failed to handle ping");
    assert!(matches!(outcome, FrameOutcome::Reply(Packet::Pong)));
}

#[test]
fn test_handle_connect_and_response() {
    let outcome = handle_frame(r#"40{"sid":"s1"}"#).unwrap();
    assert!(matches!(outcome, FrameOutcome::Emit(Event::ChannelConnected)));

    let outcome = handle_frame(r#"42["chat_response",{"message":"Hello"}]"#).unwrap();
    assert!(matches!(outcome, FrameOutcome::Emit(Event::ChatResponse(text)) if text == "Hello"));
}

#[test]
fn test_handle_closing_frames() {
    for frame in ["1", "41", r#"44{"message":"nope"}"#] {
        let outcome = handle_frame(frame).unwrap();
        assert!(
            matches!(outcome, FrameOutcome::Closed(_)),
            "expected {:?} to close the session",
            frame
        );
    }
}

#[test]
fn test_handle_ignored_and_malformed() {
    assert!(matches!(handle_frame("3").unwrap(), FrameOutcome::Ignore));
    assert!(matches!(handle_frame("6").unwrap(), FrameOutcome::Ignore));
    assert!(matches!(
        handle_frame(r#"42["status",{"ok":true}]"#).unwrap(),
        FrameOutcome::Ignore
    ));
    assert!(handle_frame("42not json").is_err());
    assert!(handle_frame(r#"42["chat_response",{}]"#).is_err());
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<Event>) -> Event {
    tokio::time::timeout(time::Duration::from_secs(5), rx.recv())
        .await
        .expect("Timed out waiting for event")
        .expect("Event channel closed")
}

#[tokio::test]
async fn test_chat_round_trip() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get address");

    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.expect("Failed to accept");
        let mut ws = tokio_tungstenite::accept_async(tcp)
            .await
            .expect("Failed to upgrade");

        ws.send(WsMessage::Text(
            r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000}"#.to_string(),
        ))
        .await
        .unwrap();

        let mut received = vec![];
        while let Some(Ok(msg)) = ws.next().await {
            let WsMessage::Text(text) = msg else { continue };
            received.push(text.clone());
            match text.as_str() {
                "40" => {
                    ws.send(WsMessage::Text("2".to_string())).await.unwrap();
                    ws.send(WsMessage::Text(r#"40{"sid":"s1"}"#.to_string()))
                        .await
                        .unwrap();
                }
                t if t.starts_with("42") => {
                    ws.send(WsMessage::Text(
                        r#"42["chat_response",{"message":"Hello back"}]"#.to_string(),
                    ))
                    .await
                    .unwrap();
                }
                _ => {}
            }
            if received.len() == 3 {
                break;
            }
        }
        received
    });

    let (chat_tx, chat_rx) = mpsc::unbounded_channel::<String>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let token = CancellationToken::new();
    let mut service = ChannelService::new(
        format!("http://{}", addr),
        chat_rx,
        Arc::new(event_tx),
        token.clone(),
    );
    let client = tokio::spawn(async move { service.run().await });

    assert!(matches!(
        next_event(&mut event_rx).await,
        Event::ChannelConnected
    ));

    chat_tx.send("hi".to_string()).unwrap();
    assert!(matches!(
        next_event(&mut event_rx).await,
        Event::ChatResponse(text) if text == "Hello back"
    ));

    let received = server.await.expect("Server task failed");
    assert_eq!(
        received,
        vec![
            "40".to_string(),
            "3".to_string(),
            r#"42["chat_message","hi"]"#.to_string(),
        ]
    );

    token.cancel();
    let res = tokio::time::timeout(time::Duration::from_secs(5), client)
        .await
        .expect("Channel service did not stop");
    assert!(matches!(res, Ok(Ok(()))));
}

#[tokio::test]
async fn test_chat_message_held_until_namespace_connected() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get address");

    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.expect("Failed to accept");
        let mut ws = tokio_tungstenite::accept_async(tcp)
            .await
            .expect("Failed to upgrade");

        // A slow handshake leaves time for the queued message to leak out.
        tokio::time::sleep(time::Duration::from_millis(200)).await;
        ws.send(WsMessage::Text(
            r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000}"#.to_string(),
        ))
        .await
        .unwrap();

        let mut received = vec![];
        while let Some(Ok(msg)) = ws.next().await {
            let WsMessage::Text(text) = msg else { continue };
            received.push(text.clone());
            if text == "40" {
                tokio::time::sleep(time::Duration::from_millis(100)).await;
                ws.send(WsMessage::Text(r#"40{"sid":"s1"}"#.to_string()))
                    .await
                    .unwrap();
            }
            if received.len() == 2 {
                break;
            }
        }
        received
    });

    let (chat_tx, chat_rx) = mpsc::unbounded_channel::<String>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let token = CancellationToken::new();

    // Typed before the channel finished connecting
    chat_tx.send("hi".to_string()).unwrap();

    let mut service = ChannelService::new(
        format!("http://{}", addr),
        chat_rx,
        Arc::new(event_tx),
        token.clone(),
    );
    let client = tokio::spawn(async move { service.run().await });

    assert!(matches!(
        next_event(&mut event_rx).await,
        Event::ChannelConnected
    ));

    let received = tokio::time::timeout(time::Duration::from_secs(5), server)
        .await
        .expect("Server did not receive both frames")
        .expect("Server task failed");
    assert_eq!(
        received,
        vec!["40".to_string(), r#"42["chat_message","hi"]"#.to_string()]
    );

    token.cancel();
    let res = tokio::time::timeout(time::Duration::from_secs(5), client)
        .await
        .expect("Channel service did not stop");
    assert!(matches!(res, Ok(Ok(()))));
}

#[tokio::test]
async fn test_unreachable_server_reported_once() {
    // Nothing listens on this port once the listener is dropped.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (chat_tx, chat_rx) = mpsc::unbounded_channel::<String>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let token = CancellationToken::new();
    let mut service = ChannelService::new(
        format!("http://{}", addr),
        chat_rx,
        Arc::new(event_tx),
        token.clone(),
    );
    let client = tokio::spawn(async move { service.run().await });

    assert!(matches!(
        next_event(&mut event_rx).await,
        Event::ChannelClosed(reason) if reason.starts_with("cannot connect")
    ));

    // A message sent while disconnected is refused right away.
    chat_tx.send("hello?".to_string()).unwrap();
    assert!(matches!(
        next_event(&mut event_rx).await,
        Event::ChannelClosed(reason) if reason == "not connected"
    ));

    token.cancel();
    let res = tokio::time::timeout(time::Duration::from_secs(5), client)
        .await
        .expect("Channel service did not stop");
    assert!(matches!(res, Ok(Ok(()))));
}
