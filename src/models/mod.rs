pub mod action;
pub mod conversation;
pub mod event;
pub mod message;
pub mod notice;

pub use action::Action;
pub use conversation::Conversation;
pub use event::{ArcEventTx, Event, EventTx};
pub use message::{Message, Role};
pub use notice::*;
