#[cfg(test)]
#[path = "app_test.rs"]
mod tests;

use std::io;
use std::time::Instant;

use crate::app::session::{ChatSession, SendOutcome};
use crate::app::ui::{
    Dim, FilesScreen, HistoryScreen, Notice, SettingsScreen, help::render_help_line, utils,
};
use crate::config::Configuration;
use crate::models::{Action, Event, NoticeKind};
use crate::{error_notice, info_notice, warn_notice};
use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use eyre::Result;
use ratatui::crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    layout::{Alignment, Constraint, Direction, Layout},
    prelude::{Backend, CrosstermBackend},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tui_textarea::TextArea;

use super::services::EventService;

const MIN_WIDTH: u16 = 80;
const MAX_INPUT_LINES: usize = 8;

pub struct App<'a> {
    action_tx: mpsc::UnboundedSender<Action>,

    session: ChatSession,
    files_screen: FilesScreen<'a>,
    history_screen: HistoryScreen,
    settings_screen: SettingsScreen<'a>,
    input: TextArea<'a>,

    notice: Notice,
    connected: bool,

    cancel_token: CancellationToken,
}

impl<'a> App<'a> {
    pub fn new(
        config: &Configuration,
        action_tx: mpsc::UnboundedSender<Action>,
        cancel_token: CancellationToken,
    ) -> App<'a> {
        App {
            action_tx: action_tx.clone(),
            session: ChatSession::new(config.server.response_timeout()),
            files_screen: FilesScreen::new(action_tx.clone(), &config.upload.allowed_extensions),
            history_screen: HistoryScreen::new(action_tx.clone()),
            settings_screen: SettingsScreen::new(action_tx),
            input: chat_input(),
            notice: Notice::new(config.general.notice_duration()),
            connected: false,
            cancel_token,
        }
    }

    pub async fn run(&mut self, events: &mut EventService) -> Result<()> {
        let stdout = io::stdout();
        let mut stdout = stdout.lock();

        enable_raw_mode()?;
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste
        )?;

        let term_backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(term_backend)?;
        let result = self.start_loop(&mut terminal, events).await;

        self.cancel_token.cancel();

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        )?;

        terminal.show_cursor()?;
        result
    }

    async fn start_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &mut EventService,
    ) -> Result<()> {
        loop {
            self.render(terminal)?;
            let event = events.next().await;
            if self.handle_event(event) {
                return Ok(());
            }
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn notice(&self) -> &Notice {
        &self.notice
    }

    pub fn connected(&self) -> bool {
        self.connected
    }

    pub fn input_text(&self) -> String {
        self.input.lines().join("\n")
    }

    /// Returns true when the application should quit.
    pub fn handle_event(&mut self, event: Event) -> bool {
        // Events from the I/O tasks are handled whatever is on screen
        if let Some(stop) = self.handle_global_event(&event) {
            return stop;
        }

        if self.files_screen.showing() {
            return self.files_screen.handle_key_event(&event);
        }

        if self.history_screen.showing() {
            return self.history_screen.handle_key_event(&event);
        }

        if self.settings_screen.showing() {
            return self.settings_screen.handle_key_event(&event);
        }

        self.handle_input_event(event);
        false
    }

    fn handle_global_event(&mut self, event: &Event) -> Option<bool> {
        match event {
            Event::Quit => {
                if self.session.abandon() {
                    log::debug!("Quitting with a reply outstanding");
                }
                Some(true)
            }

            Event::Notice(msg) => {
                if msg.kind() == NoticeKind::Error {
                    self.files_screen.stop_loading();
                    self.history_screen.stop_loading();
                }
                self.notice.add_message(msg.clone());
                Some(false)
            }

            Event::ChannelConnected => {
                self.connected = true;
                Some(false)
            }

            Event::ChannelClosed(reason) => {
                self.connected = false;
                self.session.abandon();
                self.notice
                    .add_message(error_notice!(format!("Disconnected: {}", reason)));
                Some(false)
            }

            Event::ChatResponse(text) => {
                self.session.receive(text.as_str());
                Some(false)
            }

            Event::ConversationSaved => {
                self.session.reset();
                self.notice
                    .add_message(info_notice!("Conversation saved, starting a new one"));
                Some(false)
            }

            Event::ConversationsLoaded(conversations) => {
                self.history_screen.set_conversations(conversations.clone());
                Some(false)
            }

            Event::FilesListed(files) => {
                self.files_screen.set_files(files.clone());
                Some(false)
            }

            Event::FileUploaded(name) => {
                self.notice
                    .add_message(info_notice!(format!("Uploaded \"{}\"", name)));
                self.files_screen.refresh();
                Some(false)
            }

            Event::FileDeleted(name) => {
                self.notice
                    .add_message(info_notice!(format!("Deleted \"{}\"", name)));
                self.files_screen.refresh();
                Some(false)
            }

            Event::EndpointUpdated(endpoint) => {
                self.settings_screen.applied(endpoint);
                self.notice.add_message(info_notice!(format!(
                    "LLM endpoint updated to {}",
                    endpoint
                )));
                Some(false)
            }

            Event::UiTick => {
                self.session.transcript_mut().tick();
                if self.session.expire(Instant::now()) {
                    self.notice.add_message(error_notice!(format!(
                        "No response from server after {}s",
                        self.session.response_timeout().as_secs()
                    )));
                }
                Some(false)
            }

            // Fallthrough to the next event handler
            _ => None,
        }
    }

    fn handle_input_event(&mut self, event: Event) {
        match event {
            Event::KeyboardCharInput(c) => {
                self.input.input(c);
            }

            Event::KeyboardCtrlC => {
                if self.session.abandon() {
                    self.notice
                        .add_message(warn_notice!("Stopped waiting for the reply"));
                    return;
                }

                // Clear text in the input area if not waiting for a reply
                if self.input.lines().iter().any(|line| !line.is_empty()) {
                    self.input = chat_input();
                }
            }

            Event::KeyboardCtrlR => self.handle_save(),
            Event::KeyboardCtrlF => self.files_screen.open(),
            Event::KeyboardCtrlO => self.history_screen.open(),
            Event::KeyboardCtrlE => self.settings_screen.open(),

            Event::KeyboardPaste(text) => {
                self.input.set_yank_text(text.replace('\r', "\n"));
                self.input.paste();
            }

            Event::KeyboardNewLine => {
                self.input.insert_newline();
            }

            Event::KeyboardEnter => self.handle_send(),

            Event::UiScrollDown => self.session.transcript_mut().scroll_down(),
            Event::UiScrollUp => self.session.transcript_mut().scroll_up(),
            Event::UiScrollPageDown => self.session.transcript_mut().scroll_page_down(),
            Event::UiScrollPageUp => self.session.transcript_mut().scroll_page_up(),
            _ => {}
        }
    }

    fn handle_send(&mut self) {
        let text = self.input_text();
        match self.session.submit(&text) {
            SendOutcome::Ignored => {}
            SendOutcome::Busy => {
                self.notice.add_message(warn_notice!(
                    "Waiting for the server to respond, please wait..."
                ));
            }
            SendOutcome::Dispatched(text) => {
                self.input = chat_input();
                let _ = self.action_tx.send(Action::SendChatMessage(text));
            }
        }
    }

    fn handle_save(&mut self) {
        if self.session.waiting() {
            self.notice.add_message(warn_notice!(
                "Waiting for the server to respond, save after the reply"
            ));
            return;
        }

        if self.session.conversation().is_empty() {
            self.notice.add_message(info_notice!("Nothing to save"));
            return;
        }

        let _ = self.action_tx.send(Action::SaveConversation(
            self.session.conversation().clone(),
        ));
    }

    fn render<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        terminal.draw(|f| {
            let current_width = f.area().width;
            if !is_line_width_sufficient(current_width) {
                f.render_widget(
                    Paragraph::new(utils::split_to_lines(
                        format!(
                            "I'm too small, make me bigger! I need at least {} cells (current: {})",
                            MIN_WIDTH, current_width
                        ),
                        current_width.saturating_sub(2) as usize,
                    ))
                    .alignment(Alignment::Left),
                    f.area(),
                );
                return;
            }

            let input_height = (self.input.lines().len().min(MAX_INPUT_LINES) + 2) as u16;
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![
                    Constraint::Min(1),
                    Constraint::Max(input_height),
                    Constraint::Length(1),
                ])
                .split(f.area());

            self.session
                .transcript_mut()
                .draw(layout[0], f.buffer_mut());

            self.input.set_block(input_block(self.session.waiting()));
            f.render_widget(&self.input, layout[1]);
            render_help_line(f, layout[2], self.connected);

            if self.files_screen.showing()
                || self.history_screen.showing()
                || self.settings_screen.showing()
            {
                f.dim_bg();
            }

            self.files_screen
                .render(f, utils::popup_area(f.area(), 60, 70));
            self.history_screen
                .render(f, utils::popup_area(f.area(), 70, 90));
            self.settings_screen
                .render(f, utils::popup_area(f.area(), 60, 40));

            self.notice.render(f, utils::notice_area(f.area(), 30));
        })?;
        Ok(())
    }
}

fn chat_input<'a>() -> TextArea<'a> {
    let mut textarea = TextArea::default();
    textarea.set_block(input_block(false));
    textarea.set_cursor_line_style(Style::default());
    textarea.set_placeholder_text("Ask something about your documents...");
    textarea
}

fn input_block<'a>(waiting: bool) -> Block<'a> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title_alignment(Alignment::Left)
        .padding(Padding::new(1, 1, 0, 0));

    if waiting {
        block
            .title(Line::from(" Waiting for reply... Ctrl+C to abort ").italic())
            .border_style(Style::default().fg(Color::DarkGray))
    } else {
        block.title(" Message ")
    }
}

fn is_line_width_sufficient(line_width: u16) -> bool {
    line_width >= MIN_WIDTH
}
