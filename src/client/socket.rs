#[cfg(test)]
#[path = "socket_test.rs"]
mod tests;

use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::client::ClientError;
use crate::config::constants::SOCKET_PATH;

pub const CHAT_MESSAGE: &str = "chat_message";
pub const CHAT_RESPONSE: &str = "chat_response";

pub type SocketStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// The JSON body of an engine open packet.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Handshake {
    pub sid: String,
    #[serde(rename = "pingInterval", default)]
    pub ping_interval: u64,
    #[serde(rename = "pingTimeout", default)]
    pub ping_timeout: u64,
}

/// One text frame on the chat channel. Engine-level packets carry a
/// single digit; socket-level packets ride inside an engine `4` message,
/// so a socket event goes over the wire as `42[...]`.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Open(Handshake),
    Close,
    Ping,
    Pong,
    Noop,

    Connect,
    Disconnect,
    Event { name: String, data: Value },
    ConnectError(String),
}

impl Packet {
    pub fn chat_message(text: &str) -> Self {
        Packet::Event {
            name: CHAT_MESSAGE.to_string(),
            data: Value::String(text.to_string()),
        }
    }

    pub fn decode(frame: &str) -> Result<Self, ClientError> {
        let mut chars = frame.chars();
        let kind = chars
            .next()
            .ok_or_else(|| ClientError::protocol("empty frame"))?;
        let body = chars.as_str();

        match kind {
            '0' => {
                let handshake = serde_json::from_str(body)
                    .map_err(|e| ClientError::protocol(format!("bad handshake: {}", e)))?;
                Ok(Packet::Open(handshake))
            }
            '1' => Ok(Packet::Close),
            '2' => Ok(Packet::Ping),
            '3' => Ok(Packet::Pong),
            '4' => Self::decode_message(body),
            '6' => Ok(Packet::Noop),
            other => Err(ClientError::protocol(format!(
                "unknown packet type '{}'",
                other
            ))),
        }
    }

    fn decode_message(body: &str) -> Result<Self, ClientError> {
        let mut chars = body.chars();
        let kind = chars
            .next()
            .ok_or_else(|| ClientError::protocol("empty message packet"))?;
        let rest = strip_ack_id(strip_namespace(chars.as_str()));

        match kind {
            '0' => Ok(Packet::Connect),
            '1' => Ok(Packet::Disconnect),
            '2' => {
                let args: Vec<Value> = serde_json::from_str(rest)
                    .map_err(|e| ClientError::protocol(format!("bad event payload: {}", e)))?;
                let mut args = args.into_iter();
                let name = match args.next() {
                    Some(Value::String(name)) => name,
                    _ => return Err(ClientError::protocol("event without a name")),
                };
                Ok(Packet::Event {
                    name,
                    data: args.next().unwrap_or(Value::Null),
                })
            }
            '4' => {
                let reason = serde_json::from_str::<Value>(rest)
                    .ok()
                    .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
                    .unwrap_or_else(|| rest.to_string());
                Ok(Packet::ConnectError(reason))
            }
            other => Err(ClientError::protocol(format!(
                "unsupported message type '{}'",
                other
            ))),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Packet::Open(handshake) => format!(
                "0{}",
                json!({
                    "sid": handshake.sid,
                    "pingInterval": handshake.ping_interval,
                    "pingTimeout": handshake.ping_timeout,
                })
            ),
            Packet::Close => "1".to_string(),
            Packet::Ping => "2".to_string(),
            Packet::Pong => "3".to_string(),
            Packet::Noop => "6".to_string(),
            Packet::Connect => "40".to_string(),
            Packet::Disconnect => "41".to_string(),
            Packet::Event { name, data } => format!("42{}", json!([name, data])),
            Packet::ConnectError(reason) => format!("44{}", json!({ "message": reason })),
        }
    }

    /// The text of a `chat_response` event. Other events yield `None`; a
    /// `chat_response` without a string `message` is a protocol error.
    pub fn chat_response(&self) -> Option<Result<String, ClientError>> {
        match self {
            Packet::Event { name, data } if name == CHAT_RESPONSE => Some(
                data.get("message")
                    .and_then(Value::as_str)
                    .map(String::from)
                    .ok_or_else(|| ClientError::protocol("chat_response without message")),
            ),
            _ => None,
        }
    }
}

/// Builds the websocket URL of the chat channel from the HTTP base URL.
pub fn socket_url(base_url: &str) -> Result<String, ClientError> {
    let base_url = base_url.trim_end_matches('/');
    let host = if let Some(rest) = base_url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base_url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else if base_url.starts_with("ws://") || base_url.starts_with("wss://") {
        base_url.to_string()
    } else {
        return Err(ClientError::protocol(format!(
            "unsupported server url: {}",
            base_url
        )));
    };
    Ok(format!("{}{}", host, SOCKET_PATH))
}

pub async fn connect(base_url: &str) -> Result<SocketStream, ClientError> {
    let url = socket_url(base_url)?;
    log::debug!("Connecting to {}", url);
    let (stream, _) = connect_async(url.as_str()).await?;
    Ok(stream)
}

fn strip_namespace(body: &str) -> &str {
    if !body.starts_with('/') {
        return body;
    }
    match body.find(',') {
        Some(idx) => &body[idx + 1..],
        // A bare namespace, e.g. `40/chat`.
        None => "",
    }
}

fn strip_ack_id(body: &str) -> &str {
    body.trim_start_matches(|c: char| c.is_ascii_digit())
}
