use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with HTTP {0}")]
    Status(u16),

    /// The server answered but refused the operation (`success: false`).
    #[error("{}", .0.as_deref().unwrap_or("rejected by server"))]
    Rejected(Option<String>),

    #[error("websocket error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("channel closed")]
    ChannelClosed,
}

impl ClientError {
    pub fn protocol(msg: impl Into<String>) -> Self {
        ClientError::Protocol(msg.into())
    }

    /// True when the failure came from the server saying no, as opposed
    /// to the request never completing.
    pub fn is_rejected(&self) -> bool {
        matches!(self, ClientError::Rejected(_))
    }
}
