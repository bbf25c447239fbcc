#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use crate::{config::constants::FRAME_DURATION, models::Event};
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEventKind, MouseEventKind};
use futures::{StreamExt, future};
use tokio::sync::mpsc;
use tokio::time;
use tui_textarea::{Input, Key};

/// Merges terminal input, events pushed by the I/O tasks and the UI tick
/// into the single stream the UI task consumes.
pub struct EventService {
    crossterm_events: Option<EventStream>,
    event_rx: mpsc::UnboundedReceiver<Event>,
    event_tx: mpsc::UnboundedSender<Event>,
    tick: time::Interval,
}

impl EventService {
    /// Without a terminal stream only internal events and ticks are produced.
    fn new(crossterm_events: Option<EventStream>) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
        let mut tick = time::interval(FRAME_DURATION);
        tick.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
        Self {
            crossterm_events,
            event_rx,
            event_tx,
            tick,
        }
    }

    fn handle_crossterm(event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Paste(text) => Some(Event::KeyboardPaste(text)),
            CrosstermEvent::Mouse(mouse_event) => match mouse_event.kind {
                MouseEventKind::ScrollUp => Some(Event::UiScrollUp),
                MouseEventKind::ScrollDown => Some(Event::UiScrollDown),
                _ => None,
            },
            CrosstermEvent::Key(key_event) if key_event.kind != KeyEventKind::Release => {
                map_input(key_event.into())
            }
            _ => None,
        }
    }

    pub fn event_tx(&self) -> mpsc::UnboundedSender<Event> {
        self.event_tx.clone()
    }

    pub async fn next(&mut self) -> Event {
        loop {
            let e = tokio::select! {
                event = self.event_rx.recv() => event,
                event = next_terminal_event(&mut self.crossterm_events) => match event {
                    Some(Ok(input)) => Self::handle_crossterm(input),
                    Some(Err(err)) => {
                        log::warn!("Failed to read terminal event: {}", err);
                        None
                    }
                    None => None
                },
                // Deadline is kept across iterations
                _ = self.tick.tick() => Some(Event::UiTick)
            };

            if let Some(event) = e {
                return event;
            }
        }
    }
}

async fn next_terminal_event(
    stream: &mut Option<EventStream>,
) -> Option<std::io::Result<CrosstermEvent>> {
    match stream {
        Some(stream) => stream.next().await,
        None => future::pending().await,
    }
}

pub(crate) fn map_input(input: Input) -> Option<Event> {
    if input.key == Key::Enter && (input.shift || input.alt) {
        return Some(Event::KeyboardNewLine);
    }

    // Map ctrl events
    if input.ctrl {
        return match input.key {
            Key::Char('u') => Some(Event::UiScrollPageUp),
            Key::Char('d') => Some(Event::UiScrollPageDown),
            Key::Char('q') => Some(Event::Quit),
            Key::Char('c') => Some(Event::KeyboardCtrlC),
            Key::Char('r') => Some(Event::KeyboardCtrlR),
            Key::Char('o') => Some(Event::KeyboardCtrlO),
            Key::Char('f') => Some(Event::KeyboardCtrlF),
            Key::Char('e') => Some(Event::KeyboardCtrlE),
            _ => None,
        };
    }

    match input.key {
        Key::Esc => Some(Event::KeyboardEsc),
        Key::Enter => Some(Event::KeyboardEnter),
        Key::Up => Some(Event::UiScrollUp),
        Key::Down => Some(Event::UiScrollDown),
        Key::PageUp => Some(Event::UiScrollPageUp),
        Key::PageDown => Some(Event::UiScrollPageDown),
        _ => Some(Event::KeyboardCharInput(input)),
    }
}

impl Default for EventService {
    fn default() -> Self {
        Self::new(Some(EventStream::new()))
    }
}
