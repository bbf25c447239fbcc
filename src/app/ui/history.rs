#[cfg(test)]
#[path = "history_test.rs"]
mod tests;

use crate::models::{Action, Conversation, Event, Role};
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

use super::utils;

const NO_CONVERSATIONS: &str = "No conversations found";
const LOADING: &str = "Loading...";

/// Saved conversations, one collapsible panel each. Everything is
/// rendered from the fetched data; toggling only flips visibility.
pub struct HistoryScreen {
    showing: bool,
    loading: bool,

    action_tx: mpsc::UnboundedSender<Action>,

    conversations: Vec<Conversation>,
    expanded: Vec<bool>,
    list_state: ListState,
}

impl HistoryScreen {
    pub fn new(action_tx: mpsc::UnboundedSender<Action>) -> HistoryScreen {
        HistoryScreen {
            showing: false,
            loading: false,
            action_tx,
            conversations: vec![],
            expanded: vec![],
            list_state: ListState::default(),
        }
    }

    pub fn showing(&self) -> bool {
        self.showing
    }

    /// Shows the screen and fetches the conversations again.
    pub fn open(&mut self) {
        self.showing = true;
        self.refresh();
    }

    pub fn close(&mut self) {
        self.showing = false;
    }

    pub fn refresh(&mut self) {
        self.loading = true;
        let _ = self.action_tx.send(Action::LoadConversations);
    }

    pub fn stop_loading(&mut self) {
        self.loading = false;
    }

    pub fn set_conversations(&mut self, conversations: Vec<Conversation>) {
        self.loading = false;
        self.expanded = vec![false; conversations.len()];
        self.conversations = conversations;
        self.list_state
            .select(if self.conversations.is_empty() { None } else { Some(0) });
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn labels(&self) -> Vec<String> {
        (0..self.conversations.len()).map(label).collect()
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.get(index).copied().unwrap_or(false)
    }

    /// Flips panel `index` between hidden and shown.
    pub fn toggle(&mut self, index: usize) {
        if let Some(expanded) = self.expanded.get_mut(index) {
            *expanded = !*expanded;
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    fn next_row(&mut self) {
        if self.conversations.is_empty() {
            return;
        }
        let i = self
            .list_state
            .selected()
            .map(|i| (i + 1).min(self.conversations.len() - 1))
            .unwrap_or(0);
        self.list_state.select(Some(i));
    }

    fn prev_row(&mut self) {
        if self.conversations.is_empty() {
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
        match event {
            Event::Quit => {
                self.showing = false;
                return true;
            }
            Event::KeyboardCtrlO | Event::KeyboardEsc => self.close(),
            Event::KeyboardEnter => {
                if let Some(i) = self.list_state.selected() {
                    self.toggle(i);
                }
            }
            Event::KeyboardCharInput(input) => match input.key {
                Key::Char('j') => self.next_row(),
                Key::Char('k') => self.prev_row(),
                Key::Char('q') => self.close(),
                Key::Char('r') => self.refresh(),
                Key::Char(' ') | Key::Tab => {
                    if let Some(i) = self.list_state.selected() {
                        self.toggle(i);
                    }
                }
                _ => {}
            },
            Event::UiScrollUp => self.prev_row(),
            Event::UiScrollDown => self.next_row(),
            _ => {}
        }
        false
    }

    fn build_list_items<'b>(&self, max_width: usize) -> Vec<ListItem<'b>> {
        if self.conversations.is_empty() {
            let text = if self.loading { LOADING } else { NO_CONVERSATIONS };
            return vec![ListItem::new(Text::from(text).alignment(Alignment::Center))];
        }

        self.conversations
            .iter()
            .enumerate()
            .map(|(i, conversation)| {
                let expanded = self.is_expanded(i);
                let marker = if expanded { "▼ " } else { "▶ " };
                let mut lines = vec![Line::from(vec![
                    span!(marker).fg(Color::LightBlue),
                    span!(label(i)).bold(),
                    span!(format!(" ({} messages)", conversation.len())).dim(),
                ])];

                if expanded {
                    lines.extend(build_panel(conversation, max_width.saturating_sub(2)));
                    lines.push(Line::default());
                }
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
            span!("Enter").green().bold(),
            span!(" to expand/collapse, ").white(),
            span!("r").green().bold(),
            span!(" to refresh, ").white(),
            span!("q").green().bold(),
            span!(" to close ").white(),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::LightBlue))
            .padding(Padding::new(1, 1, 0, 0))
            .title(Line::from(" Conversation History ").bold())
            .title_alignment(Alignment::Center)
            .title_bottom(Line::from(instructions));

        f.render_widget(Clear, area);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let list = List::new(self.build_list_items(inner.width as usize))
            .highlight_style(Style::default().add_modifier(Modifier::BOLD))
            .highlight_symbol("› ");
        f.render_stateful_widget(list, inner, &mut self.list_state);
    }
}

fn label(index: usize) -> String {
    format!("Conversation {}", index + 1)
}

fn build_panel<'b>(conversation: &Conversation, max_width: usize) -> Vec<Line<'b>> {
    conversation
        .messages()
        .iter()
        .flat_map(|message| {
            let color = match message.role() {
                Role::User => Color::Rgb(64, 224, 208),
                Role::Assistant => Color::Rgb(255, 140, 105),
            };
            let mut spans = vec![
                Span::styled(
                    format!("{}: ", message.role().label()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ];
            spans.push(Span::raw(message.content().replace('\n', " ")));

            utils::split_to_lines(spans, max_width.saturating_sub(2).max(1))
                .into_iter()
                .map(|mut line| {
                    line.spans.insert(0, Span::raw("  "));
                    line
                })
                .collect::<Vec<_>>()
        })
        .collect()
}
