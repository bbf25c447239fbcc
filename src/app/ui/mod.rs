pub mod bubble;
pub mod files;
pub mod help;
pub mod history;
pub mod input_box;
pub mod notice;
pub mod question;
pub mod scroll;
pub mod settings;
pub mod transcript;
pub mod utils;

pub use bubble::{Bubble, BubbleKind};
pub use files::FilesScreen;
pub use history::HistoryScreen;
pub use notice::Notice;
pub use scroll::Scroll;
pub use settings::SettingsScreen;
pub use transcript::{ThinkingHandle, Transcript};

use ratatui::{
    style::{Color, Modifier, Style},
    widgets::Block,
};

pub trait Dim {
    fn dim_bg(&mut self);
}

impl Dim for ratatui::Frame<'_> {
    fn dim_bg(&mut self) {
        self.render_widget(
            Block::default().style(
                Style::default()
                    .bg(Color::Rgb(0, 0, 0))
                    .add_modifier(Modifier::DIM),
            ),
            self.area(),
        );
    }
}
