use std::path::PathBuf;

use super::Conversation;

/// Requests from the UI task to the I/O tasks.
#[derive(Debug)]
pub enum Action {
    SendChatMessage(String),
    SaveConversation(Conversation),
    LoadConversations,

    ListFiles,
    UploadFile(PathBuf),
    DeleteFile(String), // File name

    UpdateEndpoint(String),
}
