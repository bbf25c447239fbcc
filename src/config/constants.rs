use std::time::Duration;

pub const LOG_FILE_PATH: &str = "/tmp/docchat.log";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Applied to every HTTP request
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// How long a sent chat message may wait for its reply
pub const RESPONSE_TIMEOUT_SECS: u64 = 60;

pub const NOTICE_DURATION_SECS: u64 = 3;

pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf", "doc", "docx"];

/// Engine.IO v4 over a plain websocket, no long-polling upgrade
pub const SOCKET_PATH: &str = "/socket.io/?EIO=4&transport=websocket";

pub const FRAME_DURATION: Duration = Duration::from_millis(250);

/// Pause between attempts to re-open the chat channel
pub const RECONNECT_DELAY: Duration = Duration::from_secs(3);
