#[cfg(test)]
#[path = "action_test.rs"]
mod tests;

use std::sync::Arc;

use crate::client::{ArcServer, ClientError};
use crate::error_notice;
use crate::models::{Action, ArcEventTx, Event};
use eyre::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// The I/O side of the application: takes actions from the UI task,
/// runs them against the server and answers with events.
pub struct ActionService {
    event_tx: ArcEventTx,
    action_rx: mpsc::UnboundedReceiver<Action>,
    chat_tx: mpsc::UnboundedSender<String>,
    cancel_token: CancellationToken,
    server: ArcServer,
}

impl ActionService {
    pub fn new(
        server: ArcServer,
        action_rx: mpsc::UnboundedReceiver<Action>,
        chat_tx: mpsc::UnboundedSender<String>,
        event_tx: ArcEventTx,
        cancel_token: CancellationToken,
    ) -> ActionService {
        ActionService {
            event_tx,
            action_rx,
            chat_tx,
            cancel_token,
            server,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    log::debug!("Action service cancelled");
                    return Ok(());
                }

                action = self.action_rx.recv() => {
                    let Some(action) = action else {
                        log::debug!("Action channel closed");
                        return Ok(());
                    };

                    match action {
                        // Forwarded inline so messages reach the channel in the
                        // order they were sent.
                        Action::SendChatMessage(text) => {
                            if self.chat_tx.send(text).is_err() {
                                log::error!("Chat channel is gone, dropping message");
                                self.event_tx
                                    .send(Event::ChannelClosed("chat channel is not running".to_string()))
                                    .await?;
                            }
                        }
                        action => self.spawn(action),
                    }
                }
            }
        }
    }

    fn spawn(&self, action: Action) {
        let server = Arc::clone(&self.server);
        let event_tx = Arc::clone(&self.event_tx);
        let token = self.cancel_token.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                event = execute(&server, action) => {
                    let Some(event) = event else { return };
                    if let Err(err) = event_tx.send(event).await {
                        log::error!("Failed to send event: {}", err);
                    }
                }
            }
        });
    }
}

pub(crate) async fn execute(server: &ArcServer, action: Action) -> Option<Event> {
    let event = match action {
        Action::SendChatMessage(_) => return None,

        Action::ListFiles => match server.list_files().await {
            Ok(files) => Event::FilesListed(files),
            Err(err) => failure("Failed to load files", err),
        },

        Action::UploadFile(path) => match server.upload_file(&path).await {
            Ok(filename) => {
                log::info!("Uploaded {}", filename);
                Event::FileUploaded(filename)
            }
            Err(err) => failure("Upload failed", err),
        },

        Action::DeleteFile(filename) => match server.delete_file(&filename).await {
            Ok(()) => {
                log::info!("Deleted {}", filename);
                Event::FileDeleted(filename)
            }
            Err(err) => failure("Delete failed", err),
        },

        Action::SaveConversation(conversation) => {
            match server.save_conversation(&conversation).await {
                Ok(()) => Event::ConversationSaved,
                Err(err) => failure("Failed to save conversation", err),
            }
        }

        Action::LoadConversations => match server.get_conversations().await {
            Ok(conversations) => Event::ConversationsLoaded(conversations),
            Err(err) => failure("Failed to load conversations", err),
        },

        Action::UpdateEndpoint(endpoint) => match server.update_endpoint(&endpoint).await {
            Ok(()) => Event::EndpointUpdated(endpoint),
            Err(err) => failure("Failed to update LLM endpoint", err),
        },
    };
    Some(event)
}

fn failure(prefix: &str, err: ClientError) -> Event {
    log::error!("{}: {}", prefix, err);
    let message = match err {
        ClientError::Rejected(None) => prefix.to_string(),
        err => format!("{}: {}", prefix, err),
    };
    Event::Notice(error_notice!(message))
}
