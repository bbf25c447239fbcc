#[cfg(test)]
#[path = "files_test.rs"]
mod tests;

use std::path::PathBuf;

use crate::config::resolve_path;
use crate::models::{Action, Event};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Padding},
};
use ratatui_macros::span;
use tokio::sync::mpsc;
use tui_textarea::Key;

use super::input_box::InputBox;
use super::{question::Question, utils};

const NO_FILES: &str = "No files uploaded";
const LOADING: &str = "Loading...";

/// Lists the documents on the server and lets the user upload or
/// delete them. Every change is followed by a fresh listing.
pub struct FilesScreen<'a> {
    showing: bool,
    loading: bool,

    action_tx: mpsc::UnboundedSender<Action>,

    files: Vec<String>,
    list_state: ListState,

    upload: InputBox<'a>,
    question: Question<'a>,
    pending_delete: Option<String>,
}

impl<'a> FilesScreen<'a> {
    pub fn new(action_tx: mpsc::UnboundedSender<Action>, extensions: &[String]) -> FilesScreen<'a> {
        let placeholder = format!(
            "Path to a {} file",
            extensions
                .iter()
                .map(|ext| format!(".{}", ext))
                .collect::<Vec<_>>()
                .join(", ")
        );
        FilesScreen {
            showing: false,
            loading: false,
            action_tx,
            files: vec![],
            list_state: ListState::default(),
            upload: InputBox::default()
                .with_title(" Upload File ")
                .with_placeholder(&placeholder),
            question: Question::default().with_title(" Delete File "),
            pending_delete: None,
        }
    }

    pub fn showing(&self) -> bool {
        self.showing
    }

    /// Shows the panel and fetches the current listing.
    pub fn open(&mut self) {
        self.showing = true;
        self.refresh();
    }

    pub fn close(&mut self) {
        self.showing = false;
        self.upload.close();
        self.question.close();
        self.pending_delete = None;
    }

    pub fn refresh(&mut self) {
        self.loading = true;
        let _ = self.action_tx.send(Action::ListFiles);
    }

    /// Replaces the listing. Nothing from the previous one is kept.
    pub fn set_files(&mut self, files: Vec<String>) {
        self.loading = false;
        self.files = files;

        let selected = match (self.files.len(), self.list_state.selected()) {
            (0, _) => None,
            (len, Some(i)) => Some(i.min(len - 1)),
            (_, None) => Some(0),
        };
        self.list_state.select(selected);
    }

    /// Called when a request the panel is waiting on failed.
    pub fn stop_loading(&mut self) {
        self.loading = false;
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn selected_file(&self) -> Option<&str> {
        self.list_state
            .selected()
            .and_then(|i| self.files.get(i))
            .map(String::as_str)
    }

    fn next_row(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let i = self
            .list_state
            .selected()
            .map(|i| (i + 1).min(self.files.len() - 1))
            .unwrap_or(0);
        self.list_state.select(Some(i));
    }

    fn prev_row(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let i = self
            .list_state
            .selected()
            .map(|i| i.saturating_sub(1))
            .unwrap_or(0);
        self.list_state.select(Some(i));
    }

    /// Returns true when the application should quit.
    pub fn handle_key_event(&mut self, event: &Event) -> bool {
        if self.upload.showing() {
            match event {
                Event::KeyboardEnter => {
                    let path = self.upload.close().unwrap_or_default();
                    self.on_upload(path.trim());
                }
                Event::KeyboardCtrlC | Event::KeyboardEsc => {
                    self.upload.close();
                }
                Event::Quit => return true,
                _ => self.upload.handle_key_event(event),
            }
            return false;
        }

        if self.question.showing() {
            if matches!(event, Event::Quit) {
                self.close();
                return true;
            }
            if let Event::KeyboardCharInput(input) = event {
                match input.key {
                    Key::Char('y') => {
                        self.on_delete();
                        self.question.close();
                    }
                    Key::Char('n') | Key::Char('q') => {
                        self.pending_delete = None;
                        self.question.close();
                    }
                    _ => {}
                }
            } else if matches!(event, Event::KeyboardEsc | Event::KeyboardCtrlC) {
                self.pending_delete = None;
                self.question.close();
            }
            return false;
        }

        match event {
            Event::Quit => {
                self.close();
                return true;
            }
            Event::KeyboardCtrlF | Event::KeyboardEsc => self.close(),

            Event::KeyboardCharInput(input) => match input.key {
                Key::Char('j') => self.next_row(),
                Key::Char('k') => self.prev_row(),
                Key::Char('q') => self.close(),
                Key::Char('r') => self.refresh(),
                Key::Char('u') => self.upload.open(""),
                Key::Char('d') => {
                    let Some(filename) = self.selected_file().map(String::from) else {
                        return false;
                    };
                    self.question.open(vec![
                        span!("Do you want to delete "),
                        span!(format!("\"{}\"", filename))
                            .add_modifier(Modifier::BOLD | Modifier::ITALIC)
                            .yellow(),
                        span!("?"),
                    ]);
                    self.pending_delete = Some(filename);
                }
                _ => {}
            },

            Event::UiScrollUp => self.prev_row(),
            Event::UiScrollDown => self.next_row(),
            _ => {}
        }
        false
    }

    fn on_upload(&mut self, path: &str) {
        if path.is_empty() {
            return;
        }
        let path = resolve_path(path).unwrap_or_else(|err| {
            log::warn!("Failed to resolve {}: {}", path, err);
            path.to_string()
        });
        self.loading = true;
        let _ = self.action_tx.send(Action::UploadFile(PathBuf::from(path)));
    }

    fn on_delete(&mut self) {
        if let Some(filename) = self.pending_delete.take() {
            self.loading = true;
            let _ = self.action_tx.send(Action::DeleteFile(filename));
        }
    }

    fn build_list_items(&self, max_width: usize) -> Vec<ListItem<'a>> {
        if self.files.is_empty() {
            let text = if self.loading { LOADING } else { NO_FILES };
            return vec![ListItem::new(Text::from(text).alignment(Alignment::Center))];
        }

        self.files
            .iter()
            .map(|name| {
                let lines = utils::split_to_lines(
                    vec![span!("• ").fg(Color::LightBlue), Span::raw(name.clone())],
                    max_width,
                );
                ListItem::new(Text::from(lines))
            })
            .collect()
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        if !self.showing {
            return;
        }

        let instructions: Vec<Span> = vec![
            " ".into(),
            span!("u").green().bold(),
            span!(" to upload, ").white(),
            span!("d").green().bold(),
            span!(" to delete, ").white(),
            span!("r").green().bold(),
            span!(" to refresh, ").white(),
            span!("q").green().bold(),
            span!(" to close ").white(),
        ];

        let mut title = vec![span!(" Uploaded Files ").bold()];
        if self.loading && !self.files.is_empty() {
            title.push(span!("(loading) ").dim().italic());
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::LightBlue))
            .padding(Padding::new(1, 1, 0, 0))
            .title(Line::from(title))
            .title_alignment(Alignment::Center)
            .title_bottom(Line::from(instructions));

        f.render_widget(Clear, area);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let list = List::new(self.build_list_items(inner.width.saturating_sub(2) as usize))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        f.render_stateful_widget(list, inner, &mut self.list_state);

        let upload_area = utils::input_area(inner, (inner.width as f32 * 0.9).ceil() as u16);
        self.upload.render(f, upload_area);
        self.question.render(f, inner);
    }
}
