use std::time;

use crate::models::NoticeMessage;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Clear, List, ListItem},
};
use unicode_width::UnicodeWidthStr;

use super::utils;

struct MessageWrapper {
    value: NoticeMessage,
    created_at: chrono::DateTime<chrono::Utc>,
}

/// Stack of transient notifications drawn in the top right corner.
pub struct Notice {
    notices: Vec<MessageWrapper>,
    display_duration: time::Duration,
}

impl Notice {
    pub fn new(display_duration: time::Duration) -> Notice {
        Notice {
            notices: vec![],
            display_duration,
        }
    }

    pub fn add_message(&mut self, msg: NoticeMessage) {
        self.notices.push(MessageWrapper {
            value: msg,
            created_at: chrono::Utc::now(),
        });
    }

    pub fn info(&mut self, msg: impl Into<String>) {
        self.add_message(NoticeMessage::info(msg))
    }

    pub fn warning(&mut self, msg: impl Into<String>) {
        self.add_message(NoticeMessage::warning(msg))
    }

    pub fn error(&mut self, msg: impl Into<String>) {
        self.add_message(NoticeMessage::error(msg))
    }

    pub fn messages(&self) -> Vec<&NoticeMessage> {
        self.notices.iter().map(|n| &n.value).collect()
    }

    pub fn clear(&mut self) {
        self.notices.clear();
    }

    fn sync(&mut self) {
        let now = chrono::Utc::now();
        self.notices.retain(|msg| {
            let elapsed = now.signed_duration_since(msg.created_at);
            elapsed.num_milliseconds()
                < msg
                    .value
                    .duration()
                    .unwrap_or(self.display_duration)
                    .as_millis() as i64
        });
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        self.sync();
        if self.notices.is_empty() || area.width < 8 || area.height < 3 {
            return;
        }

        let max_width = area.width as usize - 2;
        let max_height = area.height as usize;

        let items = build_list_items(&self.notices, max_width, max_height);
        let height = items.iter().map(|i| i.height()).sum::<usize>() as u16;
        let area = Rect::new(area.x, area.y, area.width, height.min(area.height));
        f.render_widget(Clear, area);
        f.render_widget(List::new(items), area);
    }
}

impl Default for Notice {
    fn default() -> Self {
        Self::new(time::Duration::from_secs(
            crate::config::constants::NOTICE_DURATION_SECS,
        ))
    }
}

fn build_list_items<'a>(
    notices: &[MessageWrapper],
    max_width: usize,
    max_height: usize,
) -> Vec<ListItem<'a>> {
    let mut items = vec![];
    let mut current_height = 0;

    for item in notices.iter().rev() {
        let kind = item.value.kind();
        let lines = build_bubble(
            item.value.message(),
            max_width,
            kind.border_color(),
            kind.text_color(),
        );

        current_height += lines.len();
        if current_height > max_height {
            break;
        }
        items.push(ListItem::new(lines));
    }
    items
}

fn build_bubble<'a>(
    message: &str,
    max_width: usize,
    border_color: Color,
    text_color: Color,
) -> Vec<Line<'a>> {
    let inner_width = max_width.saturating_sub(2).max(1);
    let lines = utils::split_to_lines(Span::raw(message.replace('\n', " ")), inner_width)
        .into_iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|s| s.content.to_string())
                .collect::<String>()
                .trim()
                .to_string()
        })
        .collect::<Vec<_>>();

    wrap_bubble(lines, max_width, border_color, text_color)
}

fn wrap_bubble<'a>(
    lines: Vec<String>,
    max_width: usize,
    border_color: Color,
    text_color: Color,
) -> Vec<Line<'a>> {
    let top_bar = highlight_line(format!("╭{}╮", "─".repeat(max_width)), border_color);
    let bottom_bar = highlight_line(format!("╰{}╯", "─".repeat(max_width)), border_color);

    let mut wrapped_lines = vec![top_bar];
    for line in lines {
        let fill = utils::repeat_from_substactions(" ", vec![max_width.saturating_sub(2), line.width()]);
        wrapped_lines.push(Line::from(vec![
            highlight_span("│ ".to_string(), border_color),
            highlight_span(format!("{line}{fill}"), text_color),
            highlight_span(" │".to_string(), border_color),
        ]));
    }

    wrapped_lines.push(bottom_bar);
    wrapped_lines
}

fn highlight_span<'a>(text: String, color: Color) -> Span<'a> {
    Span::styled(
        text,
        Style {
            fg: Some(color),
            ..Default::default()
        },
    )
}

fn highlight_line<'a>(text: String, color: Color) -> Line<'a> {
    Line::from(highlight_span(text, color))
}
