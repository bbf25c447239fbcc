#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::time::{Duration, Instant};

use crate::app::ui::{ThinkingHandle, Transcript};
use crate::models::{Conversation, Message};

#[derive(Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing but whitespace was typed.
    Ignored,
    /// A reply is still outstanding.
    Busy,
    /// The trimmed text to put on the channel.
    Dispatched(String),
}

#[derive(Debug)]
struct PendingReply {
    thinking: Option<ThinkingHandle>,
    sent_at: Instant,
}

/// The conversation and everything drawn for it. Owned by the UI task,
/// which is the only place it is mutated from.
#[derive(Debug)]
pub struct ChatSession {
    conversation: Conversation,
    transcript: Transcript,
    pending: Option<PendingReply>,
    response_timeout: Duration,
}

impl ChatSession {
    pub fn new(response_timeout: Duration) -> Self {
        Self {
            conversation: Conversation::new(),
            transcript: Transcript::new(),
            pending: None,
            response_timeout,
        }
    }

    /// Records and renders a user message. The caller puts the returned
    /// text on the channel and clears its input.
    pub fn submit(&mut self, input: &str) -> SendOutcome {
        let text = input.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }
        if self.pending.is_some() {
            return SendOutcome::Busy;
        }

        self.conversation.append_message(Message::new_user(text));
        self.transcript.render(text, true);
        self.pending = Some(PendingReply {
            thinking: self.transcript.show_thinking(),
            sent_at: Instant::now(),
        });
        SendOutcome::Dispatched(text.to_string())
    }

    /// Handles a pushed reply. Replies that arrive after their deadline
    /// passed are still shown and recorded.
    pub fn receive(&mut self, text: impl Into<String>) {
        match self.pending.take() {
            Some(PendingReply {
                thinking: Some(handle),
                ..
            }) => {
                self.transcript.dismiss(handle);
            }
            _ => self.transcript.clear_thinking(),
        }

        let text = text.into();
        self.transcript.render(text.as_str(), false);
        self.conversation.append_message(Message::new_assistant(text));
    }

    pub fn waiting(&self) -> bool {
        self.pending.is_some()
    }

    /// Gives up on the outstanding reply if its deadline has passed.
    /// Returns true when it did.
    pub fn expire(&mut self, now: Instant) -> bool {
        let expired = self
            .pending
            .as_ref()
            .is_some_and(|p| now.saturating_duration_since(p.sent_at) >= self.response_timeout);
        if expired {
            self.abandon();
        }
        expired
    }

    /// Stops waiting for the outstanding reply. Returns false when there
    /// was none.
    pub fn abandon(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        match pending.thinking {
            Some(handle) => {
                self.transcript.dismiss(handle);
            }
            None => self.transcript.clear_thinking(),
        }
        true
    }

    /// Empties the conversation and the transcript. Only called once the
    /// server confirmed the save.
    pub fn reset(&mut self) {
        self.pending = None;
        self.conversation.clear();
        self.transcript.clear();
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub fn response_timeout(&self) -> Duration {
        self.response_timeout
    }
}
