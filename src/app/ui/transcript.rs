#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

use ratatui::{
    buffer::Buffer,
    layout::{Margin, Rect},
    symbols::scrollbar,
    text::Line,
    widgets::{Scrollbar, ScrollbarOrientation, StatefulWidget},
};

use super::{
    Scroll,
    bubble::{Bubble, BubbleKind},
};

const THINKING_FRAMES: &[&str] = &["Thinking", "Thinking.", "Thinking..", "Thinking..."];

/// Proof that a thinking placeholder is on screen. Only one exists at a
/// time and it is consumed when the placeholder goes away.
#[derive(Debug, PartialEq, Eq)]
pub struct ThinkingHandle(u64);

#[derive(Debug, Clone)]
pub struct Entry {
    id: u64,
    kind: BubbleKind,
    content: String,
}

/// The scrollable list of rendered chat entries.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
    next_id: u64,
    thinking: Option<u64>,

    lines: Vec<Line<'static>>,
    line_width: usize,
    dirty: bool,
    follow: bool,
    frame: usize,
    scroll: Scroll,
}

impl Entry {
    pub fn kind(&self) -> BubbleKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a user or assistant entry and scrolls to it.
    pub fn render(&mut self, message: impl Into<String>, is_user: bool) {
        let kind = if is_user {
            BubbleKind::User
        } else {
            BubbleKind::Assistant
        };
        self.push(kind, message.into());
    }

    /// Appends the thinking placeholder. Returns `None` without touching
    /// the transcript when one is already shown.
    pub fn show_thinking(&mut self) -> Option<ThinkingHandle> {
        if self.thinking.is_some() {
            return None;
        }
        let id = self.push(BubbleKind::Thinking, String::new());
        self.thinking = Some(id);
        Some(ThinkingHandle(id))
    }

    /// Removes the placeholder the handle points at. Returns false when it
    /// was already gone, e.g. after `clear`.
    pub fn dismiss(&mut self, handle: ThinkingHandle) -> bool {
        if self.thinking != Some(handle.0) {
            return false;
        }
        self.clear_thinking();
        true
    }

    pub fn clear_thinking(&mut self) {
        let Some(id) = self.thinking.take() else {
            return;
        };
        self.entries.retain(|entry| entry.id != id);
        self.dirty = true;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.thinking = None;
        self.lines.clear();
        self.scroll.reset();
        self.dirty = true;
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, kind: BubbleKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking.is_some()
    }

    /// Advances the placeholder animation.
    pub fn tick(&mut self) {
        if self.thinking.is_some() {
            self.frame = (self.frame + 1) % THINKING_FRAMES.len();
            self.dirty = true;
        }
    }

    pub fn scroll_up(&mut self) {
        self.follow = false;
        self.scroll.up();
    }

    pub fn scroll_down(&mut self) {
        self.scroll.down();
    }

    pub fn scroll_page_up(&mut self) {
        self.follow = false;
        self.scroll.page_up();
    }

    pub fn scroll_page_down(&mut self) {
        self.scroll.page_down();
    }

    pub fn is_at_bottom(&self) -> bool {
        self.scroll.is_position_at_last()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn draw(&mut self, area: Rect, buf: &mut Buffer) {
        // One column is kept for the scrollbar.
        let width = area.width.saturating_sub(1) as usize;
        self.sync(width, area.height as usize);

        for (i, line) in self
            .lines
            .iter()
            .skip(self.scroll.position)
            .take(area.height as usize)
            .enumerate()
        {
            buf.set_line(area.x, area.y + i as u16, line, width as u16);
        }

        if self.lines.len() > area.height as usize {
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .begin_symbol(None)
                .end_symbol(None)
                .render(
                    area.inner(Margin {
                        vertical: 1,
                        horizontal: 0,
                    }),
                    buf,
                    &mut self.scroll.scrollbar_state,
                );
        }
    }

    /// Rebuilds the wrapped lines when entries or the width changed and
    /// scrolls to the end if an entry was appended since the last call.
    pub fn sync(&mut self, width: usize, height: usize) {
        if self.dirty || self.line_width != width {
            self.line_width = width;
            self.lines = self
                .entries
                .iter()
                .flat_map(|entry| {
                    let content = match entry.kind {
                        BubbleKind::Thinking => THINKING_FRAMES[self.frame],
                        _ => entry.content.as_str(),
                    };
                    Bubble::new(entry.kind, content, width).as_lines()
                })
                .collect();
            self.dirty = false;
        }

        self.scroll.set_state(self.lines.len(), height);
        if self.follow {
            self.scroll.last();
            self.follow = false;
        }
    }

    fn push(&mut self, kind: BubbleKind, content: String) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry { id, kind, content });
        self.dirty = true;
        self.follow = true;
        id
    }
}
