use crate::models::Event;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Padding},
};
use tui_textarea::{CursorMove, TextArea};

/// Single line popup editor, e.g. for typing a file path.
pub struct InputBox<'a> {
    showing: bool,
    text: String,
    input: TextArea<'a>,

    title: String,
    placeholder: String,
}

impl<'a> InputBox<'a> {
    pub fn with_title(mut self, title: &str) -> InputBox<'a> {
        if !title.is_empty() {
            self.title = title.to_string();
        }
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> InputBox<'a> {
        if !placeholder.is_empty() {
            self.placeholder = placeholder.to_string();
        }
        self
    }

    pub fn showing(&self) -> bool {
        self.showing
    }

    pub fn open(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.input = self.build_input();
        self.showing = true;
    }

    /// Hides the box and hands back what was typed.
    pub fn close(&mut self) -> Option<String> {
        if self.showing {
            self.showing = false;
            return Some(self.input.lines().join(""));
        }
        None
    }

    pub fn value(&self) -> String {
        self.input.lines().join("")
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        if !self.showing {
            return;
        }

        f.render_widget(Clear, area);
        f.render_widget(&self.input, area);
    }

    pub fn handle_key_event(&mut self, event: &Event) {
        match event {
            Event::KeyboardCharInput(input) => {
                self.input.input(input.clone());
            }
            Event::KeyboardPaste(text) => {
                self.input.insert_str(text.replace(['\r', '\n'], ""));
            }
            _ => {}
        }
    }

    fn build_input(&self) -> TextArea<'a> {
        let mut text_area = TextArea::new(vec![self.text.clone()]);
        let block = Block::default()
            .title(Line::from(self.title.clone()).bold())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::LightMagenta))
            .padding(Padding::symmetric(1, 0));
        text_area.set_block(block);
        text_area.set_cursor_line_style(Style::default());
        text_area.set_placeholder_text(&self.placeholder);
        text_area.move_cursor(CursorMove::End);
        text_area
    }
}

impl Default for InputBox<'_> {
    fn default() -> Self {
        Self {
            showing: false,
            text: String::new(),
            input: TextArea::default(),
            title: " Input ".to_string(),
            placeholder: "Type here...".to_string(),
        }
    }
}
