use std::sync::Arc;

use tokio::sync::mpsc;
use tui_textarea::Input;

use super::{Conversation, NoticeMessage};

#[derive(Debug)]
pub enum Event {
    Notice(NoticeMessage),

    ChannelConnected,
    ChannelClosed(String), // Reason
    ChatResponse(String),

    ConversationSaved,
    ConversationsLoaded(Vec<Conversation>),

    FilesListed(Vec<String>),
    FileUploaded(String),
    FileDeleted(String),

    EndpointUpdated(String),

    KeyboardCharInput(Input),
    KeyboardEsc,
    KeyboardEnter,
    KeyboardNewLine,
    KeyboardCtrlC,
    KeyboardCtrlR,
    KeyboardCtrlO,
    KeyboardCtrlF,
    KeyboardCtrlE,
    KeyboardPaste(String),

    Quit,

    UiTick,
    UiScrollUp,
    UiScrollDown,
    UiScrollPageUp,
    UiScrollPageDown,
}

impl Event {
    pub fn is_keyboard_event(&self) -> bool {
        matches!(
            self,
            Event::KeyboardCharInput(_)
                | Event::KeyboardEsc
                | Event::KeyboardEnter
                | Event::KeyboardNewLine
                | Event::KeyboardCtrlC
                | Event::KeyboardCtrlR
                | Event::KeyboardCtrlO
                | Event::KeyboardCtrlF
                | Event::KeyboardCtrlE
                | Event::KeyboardPaste(_)
                | Event::Quit
                | Event::UiScrollUp
                | Event::UiScrollDown
                | Event::UiScrollPageUp
                | Event::UiScrollPageDown
        )
    }
}

#[async_trait::async_trait]
pub trait EventTx {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>>;
}

#[async_trait::async_trait]
impl EventTx for mpsc::Sender<Event> {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.send(event).await
    }
}

#[async_trait::async_trait]
impl EventTx for mpsc::UnboundedSender<Event> {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        mpsc::UnboundedSender::send(self, event)
    }
}

pub type ArcEventTx = Arc<dyn EventTx + Send + Sync>;
