#[cfg(test)]
#[path = "channel_test.rs"]
mod tests;

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_util::sync::CancellationToken;

use crate::client::socket::{self, Packet, SocketStream};
use crate::client::ClientError;
use crate::config::constants::RECONNECT_DELAY;
use crate::models::{ArcEventTx, Event};
use eyre::Result;

#[derive(Debug)]
pub enum FrameOutcome {
    /// Write this packet back to the server.
    Reply(Packet),
    /// Hand this event to the UI task.
    Emit(Event),
    /// The session is over.
    Closed(String),
    Ignore,
}

/// Owns the chat channel: keeps one websocket session open, writes
/// outgoing chat messages and pushes replies to the UI task in the order
/// they arrive.
pub struct ChannelService {
    base_url: String,
    chat_rx: mpsc::UnboundedReceiver<String>,
    event_tx: ArcEventTx,
    cancel_token: CancellationToken,
}

impl ChannelService {
    pub fn new(
        base_url: impl Into<String>,
        chat_rx: mpsc::UnboundedReceiver<String>,
        event_tx: ArcEventTx,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            chat_rx,
            event_tx,
            cancel_token,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Only the first failure of a streak is reported to the user.
        let mut reported = false;

        loop {
            let connected = tokio::select! {
                _ = self.cancel_token.cancelled() => return Ok(()),
                res = socket::connect(&self.base_url) => res,
            };

            match connected {
                Ok(stream) => {
                    log::info!("Chat channel connected to {}", self.base_url);
                    match self.serve(stream).await? {
                        Some(reason) => {
                            log::warn!("Chat channel closed: {}", reason);
                            self.event_tx.send(Event::ChannelClosed(reason)).await?;
                            reported = true;
                        }
                        None => return Ok(()),
                    }
                }
                Err(err) => {
                    log::warn!("Failed to connect chat channel: {}", err);
                    if !reported {
                        self.event_tx
                            .send(Event::ChannelClosed(format!("cannot connect: {}", err)))
                            .await?;
                        reported = true;
                    }
                }
            }

            if !self.wait_reconnect().await? {
                return Ok(());
            }
        }
    }

    /// Sleeps until the next connection attempt. Messages sent in the
    /// meantime cannot be delivered and are reported as such. Returns
    /// false when the service should stop.
    async fn wait_reconnect(&mut self) -> Result<bool> {
        let delay = tokio::time::sleep(RECONNECT_DELAY);
        tokio::pin!(delay);

        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => return Ok(false),
                _ = &mut delay => return Ok(true),
                text = self.chat_rx.recv() => {
                    if text.is_none() {
                        return Ok(false);
                    }
                    self.event_tx
                        .send(Event::ChannelClosed("not connected".to_string()))
                        .await?;
                }
            }
        }
    }

    /// Runs one websocket session. Returns the reason it ended, or `None`
    /// when the service is shutting down.
    async fn serve(&mut self, stream: SocketStream) -> Result<Option<String>> {
        let (mut writer, mut reader) = stream.split();
        // Chat messages stay queued until the server accepted the namespace
        // connect; events sent before that are dropped by the server.
        let mut joined = false;

        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    let _ = writer.send(WsMessage::Text(Packet::Close.encode())).await;
                    let _ = writer.close().await;
                    return Ok(None);
                }

                text = self.chat_rx.recv(), if joined => {
                    let Some(text) = text else {
                        return Ok(None);
                    };
                    let frame = Packet::chat_message(&text).encode();
                    if let Err(err) = writer.send(WsMessage::Text(frame)).await {
                        return Ok(Some(err.to_string()));
                    }
                }

                frame = reader.next() => {
                    let frame = match frame {
                        None => return Ok(Some("connection closed".to_string())),
                        Some(Err(err)) => return Ok(Some(ClientError::from(err).to_string())),
                        Some(Ok(WsMessage::Close(_))) => {
                            return Ok(Some("closed by server".to_string()));
                        }
                        Some(Ok(WsMessage::Text(text))) => text,
                        Some(Ok(_)) => continue,
                    };

                    match handle_frame(&frame) {
                        Ok(FrameOutcome::Reply(packet)) => {
                            if let Err(err) = writer.send(WsMessage::Text(packet.encode())).await {
                                return Ok(Some(err.to_string()));
                            }
                        }
                        Ok(FrameOutcome::Emit(event)) => {
                            if matches!(event, Event::ChannelConnected) {
                                joined = true;
                            }
                            self.event_tx.send(event).await?;
                        }
                        Ok(FrameOutcome::Closed(reason)) => return Ok(Some(reason)),
                        Ok(FrameOutcome::Ignore) => {}
                        Err(err) => log::warn!("Dropping frame {:?}: {}", frame, err),
                    }
                }
            }
        }
    }
}

/// Decides what a single inbound text frame means for the session.
pub fn handle_frame(frame: &str) -> Result<FrameOutcome, ClientError> {
    let packet = Packet::decode(frame)?;

    let outcome = match packet {
        Packet::Open(handshake) => {
            log::debug!("Channel opened, sid={}", handshake.sid);
            FrameOutcome::Reply(Packet::Connect)
        }
        Packet::Ping => FrameOutcome::Reply(Packet::Pong),
        Packet::Connect => FrameOutcome::Emit(Event::ChannelConnected),
        Packet::Close => FrameOutcome::Closed("server closed the connection".to_string()),
        Packet::Disconnect => FrameOutcome::Closed("disconnected by server".to_string()),
        Packet::ConnectError(reason) => {
            FrameOutcome::Closed(format!("connection refused: {}", reason))
        }
        Packet::Pong | Packet::Noop => FrameOutcome::Ignore,
        ref event @ Packet::Event { ref name, .. } => match event.chat_response() {
            Some(text) => FrameOutcome::Emit(Event::ChatResponse(text?)),
            None => {
                log::debug!("Ignoring event {}", name);
                FrameOutcome::Ignore
            }
        },
    };
    Ok(outcome)
}
