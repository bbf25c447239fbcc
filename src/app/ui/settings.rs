#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;

use crate::models::{Action, Event};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
};
use ratatui_macros::span;
use tokio::sync::mpsc;
use tui_textarea::{CursorMove, TextArea};

/// Edits the LLM endpoint the server talks to. The value is only pushed
/// when it differs from the last one the server accepted.
pub struct SettingsScreen<'a> {
    showing: bool,
    action_tx: mpsc::UnboundedSender<Action>,

    input: TextArea<'a>,
    last_value: String,
}

impl<'a> SettingsScreen<'a> {
    pub fn new(action_tx: mpsc::UnboundedSender<Action>) -> SettingsScreen<'a> {
        SettingsScreen {
            showing: false,
            action_tx,
            input: build_input(""),
            last_value: String::new(),
        }
    }

    pub fn showing(&self) -> bool {
        self.showing
    }

    pub fn open(&mut self) {
        self.input = build_input(&self.last_value);
        self.showing = true;
    }

    pub fn close(&mut self) {
        self.showing = false;
    }

    pub fn value(&self) -> String {
        self.input.lines().join("").trim().to_string()
    }

    pub fn last_value(&self) -> &str {
        &self.last_value
    }

    /// Returns true when the application should quit.
    pub fn handle_key_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Quit => {
                self.showing = false;
                return true;
            }
            Event::KeyboardEsc | Event::KeyboardCtrlE => self.close(),
            Event::KeyboardEnter => self.commit(),
            Event::KeyboardCtrlC => self.input = build_input(""),
            Event::KeyboardPaste(text) => {
                self.input.insert_str(text.replace(['\r', '\n'], ""));
            }
            Event::KeyboardCharInput(input) => {
                self.input.input(input.clone());
            }
            _ => {}
        }
        false
    }

    /// Pushes the typed value unless the server already has it. A rejected
    /// value can be pushed again.
    fn commit(&mut self) {
        let value = self.value();
        if value == self.last_value {
            return;
        }
        let _ = self.action_tx.send(Action::UpdateEndpoint(value));
    }

    /// Records the value the server confirmed.
    pub fn applied(&mut self, endpoint: &str) {
        self.last_value = endpoint.to_string();
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        if !self.showing {
            return;
        }

        let instructions: Vec<Span> = vec![
            " ".into(),
            span!("Enter").green().bold(),
            span!(" to apply, ").white(),
            span!("Esc").green().bold(),
            span!(" to close ").white(),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::LightBlue))
            .padding(Padding::new(1, 1, 0, 0))
            .title(Line::from(" Settings ").bold())
            .title_alignment(Alignment::Center)
            .title_bottom(Line::from(instructions));

        f.render_widget(Clear, area);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let [help, input] =
            Layout::vertical([Constraint::Length(2), Constraint::Length(3)]).areas(inner);
        f.render_widget(
            Paragraph::new("URL of the language model the server should use.")
                .dim()
                .wrap(Wrap { trim: true }),
            help,
        );
        f.render_widget(&self.input, input);
    }
}

fn build_input<'a>(text: &str) -> TextArea<'a> {
    let mut input = TextArea::new(vec![text.to_string()]);
    input.set_block(
        Block::default()
            .title(" LLM Endpoint ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::LightMagenta))
            .padding(Padding::symmetric(1, 0)),
    );
    input.set_cursor_line_style(Style::default());
    input.set_placeholder_text("http://localhost:8000/v1");
    input.move_cursor(CursorMove::End);
    input
}
