#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use std::path::Path;
use std::time;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, multipart};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::client::{ClientError, Server};
use crate::config::{Configuration, constants::ALLOWED_EXTENSIONS, user_agent};
use crate::models::{Conversation, Message};

pub struct HttpServer {
    base_url: String,
    timeout: Option<time::Duration>,
    allowed_extensions: Vec<String>,
    client: reqwest::Client,
}

/// Body shared by every mutating endpoint. Older server builds answer
/// failures with only an `error` field, so `success` is optional.
#[derive(Deserialize, Serialize, Debug, Default)]
struct Reply {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    filename: Option<String>,
}

#[derive(Serialize)]
struct SaveConversationRequest<'a> {
    conversation: &'a [Message],
}

#[derive(Serialize)]
struct DeleteFileRequest<'a> {
    filename: &'a str,
}

#[derive(Serialize)]
struct UpdateEndpointRequest<'a> {
    endpoint: &'a str,
}

#[async_trait]
impl Server for HttpServer {
    async fn upload_file(&self, path: &Path) -> Result<String, ClientError> {
        if !self.is_allowed(path) {
            return Err(ClientError::UnsupportedFile(path.display().to_string()));
        }

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| ClientError::UnsupportedFile(path.display().to_string()))?;
        let content = tokio::fs::read(path).await?;
        log::debug!("Uploading {} ({} bytes)", filename, content.len());

        let part = multipart::Part::bytes(content).file_name(filename.clone());
        let form = multipart::Form::new().part("file", part);

        let reply: Reply = self
            .send(self.request(Method::POST, "/upload_file").multipart(form))
            .await?;
        let stored = reply.filename.clone().unwrap_or(filename);
        reply.into_result()?;
        Ok(stored)
    }

    async fn list_files(&self) -> Result<Vec<String>, ClientError> {
        self.send(self.request(Method::GET, "/get_uploaded_files"))
            .await
    }

    async fn delete_file(&self, filename: &str) -> Result<(), ClientError> {
        let req = self
            .request(Method::POST, "/delete_file")
            .json(&DeleteFileRequest { filename });
        self.send::<Reply>(req).await?.into_result()
    }

    async fn save_conversation(&self, conversation: &Conversation) -> Result<(), ClientError> {
        let req = self
            .request(Method::POST, "/save_conversation")
            .json(&SaveConversationRequest {
                conversation: conversation.messages(),
            });
        self.send::<Reply>(req).await?.into_result()
    }

    async fn get_conversations(&self) -> Result<Vec<Conversation>, ClientError> {
        self.send(self.request(Method::GET, "/get_conversations"))
            .await
    }

    async fn update_endpoint(&self, endpoint: &str) -> Result<(), ClientError> {
        let req = self
            .request(Method::POST, "/update_llm_endpoint")
            .json(&UpdateEndpointRequest { endpoint });
        self.send::<Reply>(req).await?.into_result()
    }
}

impl From<&Configuration> for HttpServer {
    fn from(value: &Configuration) -> Self {
        HttpServer::new()
            .with_base_url(&value.server.base_url)
            .with_timeout(value.server.timeout())
            .with_allowed_extensions(value.upload.allowed_extensions.clone())
    }
}

impl HttpServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_allowed_extensions(mut self, extensions: Vec<String>) -> Self {
        self.allowed_extensions = extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<time::Duration> {
        self.timeout
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// Same filter a file picker would apply: the extension must be one
    /// of the configured ones, compared case-insensitively.
    pub fn is_allowed(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.allowed_extensions.iter().any(|allowed| *allowed == ext)
            })
            .unwrap_or(false)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .header("User-Agent", user_agent());

        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        req
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let res = req.send().await?;
        let status = res.status();
        if !status.is_success() {
            log::warn!("Server responded with HTTP {} for {}", status, res.url());
            return Err(ClientError::Status(status.as_u16()));
        }
        Ok(res.json::<T>().await?)
    }
}

impl Default for HttpServer {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: None,
            allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            client: reqwest::Client::new(),
        }
    }
}

impl Reply {
    fn into_result(self) -> Result<(), ClientError> {
        match self.success {
            Some(true) => Ok(()),
            _ => Err(ClientError::Rejected(self.error)),
        }
    }
}
