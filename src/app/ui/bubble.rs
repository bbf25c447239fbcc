use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

use super::utils;

/// left border + left padding + (text, not counted) + right padding + right border
pub const BORDER_ELEMENTS_LEN: usize = 4;
pub const DEFAULT_OUTER_PADDING_PERCENTAGE: f32 = 0.04;
pub const DEFAULT_WIDTH_PERCENTAGE: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleKind {
    User,
    Assistant,
    Thinking,
}

/// A message drawn as a rounded box. User bubbles hug the right edge,
/// everything else the left one.
pub struct Bubble<'a> {
    kind: BubbleKind,
    content: &'a str,
    max_width: usize,
}

impl<'a> Bubble<'a> {
    pub fn new(kind: BubbleKind, content: &'a str, max_width: usize) -> Bubble<'a> {
        Bubble {
            kind,
            content,
            max_width,
        }
    }

    pub fn as_lines(&self) -> Vec<Line<'static>> {
        let max_line_len = self.get_max_line_length();
        let lines = utils::build_message_lines(self.content, max_line_len, |line| {
            self.format_line(line, max_line_len)
        });
        self.wrap_lines_in_bubble(lines, max_line_len)
    }

    fn label(&self) -> &'static str {
        match self.kind {
            BubbleKind::User => "you",
            BubbleKind::Assistant => "assistant",
            BubbleKind::Thinking => "assistant",
        }
    }

    fn wrap_lines_in_bubble(&self, lines: Vec<Line<'static>>, max_line_len: usize) -> Vec<Line<'static>> {
        let label = self.label();
        let top_bar = format!(
            "╭─ {} {}╮",
            label,
            "─".repeat(max_line_len.saturating_sub(label.width() + 1))
        );
        let bottom_bar = format!("╰{}╯", "─".repeat(max_line_len + 2));

        let mut res = vec![self.aligned(vec![self.border_span(top_bar)], max_line_len)];
        res.extend(lines);
        res.push(self.aligned(vec![self.border_span(bottom_bar)], max_line_len));
        res.push(Line::default());
        res
    }

    fn get_max_line_length(&self) -> usize {
        let outer_padding =
            (self.max_width as f32 * DEFAULT_OUTER_PADDING_PERCENTAGE).ceil() as usize;
        let available = self
            .max_width
            .saturating_sub(BORDER_ELEMENTS_LEN + outer_padding);

        let mut max_line_len = self
            .content
            .lines()
            .map(|line| line.width())
            .max()
            .unwrap_or_default();

        let width_limit = (self.max_width as f32 * DEFAULT_WIDTH_PERCENTAGE).ceil() as usize;
        max_line_len = max_line_len.min(width_limit).min(available);

        // The header must fit the label plus a space on each side.
        max_line_len.max(self.label().width() + 2)
    }

    fn format_line(&self, line: Line<'static>, max_line_len: usize) -> Line<'static> {
        let line_str_len: usize = line.spans.iter().map(|s| s.content.width()).sum();
        let fill = utils::repeat_from_substactions(" ", vec![max_line_len, line_str_len]);

        let mut spans = vec![self.border_span("│ ".to_string())];
        spans.extend(line.spans.into_iter().map(|s| s.style(self.text_style())));
        spans.push(self.border_span(format!("{fill} │")));
        self.aligned(spans, max_line_len)
    }

    fn aligned(&self, mut spans: Vec<Span<'static>>, max_line_len: usize) -> Line<'static> {
        if self.kind != BubbleKind::User {
            return Line::from(spans);
        }
        let outer_padding = utils::repeat_from_substactions(
            " ",
            vec![self.max_width, max_line_len + BORDER_ELEMENTS_LEN],
        );
        spans.insert(0, Span::raw(outer_padding));
        Line::from(spans)
    }

    fn color(&self) -> Color {
        match self.kind {
            BubbleKind::User => Color::Rgb(64, 224, 208),
            BubbleKind::Assistant => Color::Rgb(255, 140, 105),
            BubbleKind::Thinking => Color::DarkGray,
        }
    }

    fn text_style(&self) -> Style {
        match self.kind {
            BubbleKind::Thinking => Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            _ => Style::default(),
        }
    }

    fn border_span(&self, text: String) -> Span<'static> {
        Span::styled(text, Style::default().fg(self.color()))
    }
}
