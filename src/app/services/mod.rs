pub mod action;
pub mod channel;
pub mod events;

pub use action::ActionService;
pub use channel::ChannelService;
pub use events::EventService;
