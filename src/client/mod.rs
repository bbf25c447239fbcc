pub mod error;
pub mod http;
pub mod socket;

pub use error::ClientError;
pub use http::HttpServer;

#[cfg(test)]
use mockall::automock;

use crate::models::Conversation;
use async_trait::async_trait;
use std::{path::Path, sync::Arc};

/// Request/response access to the chat server's HTTP endpoints.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Server {
    /// Uploads a single file, returning the file name the server stored.
    async fn upload_file(&self, path: &Path) -> Result<String, ClientError>;
    async fn list_files(&self) -> Result<Vec<String>, ClientError>;
    async fn delete_file(&self, filename: &str) -> Result<(), ClientError>;
    async fn save_conversation(&self, conversation: &Conversation) -> Result<(), ClientError>;
    async fn get_conversations(&self) -> Result<Vec<Conversation>, ClientError>;
    async fn update_endpoint(&self, endpoint: &str) -> Result<(), ClientError>;
}

pub type ArcServer = Arc<dyn Server + Send + Sync>;
