use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
};
use ratatui_macros::span;

pub struct KeyBinding {
    pub key: &'static str,
    pub description: &'static str,
}

pub const KEY_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "Enter",
        description: "send",
    },
    KeyBinding {
        key: "Ctrl+R",
        description: "save & reset",
    },
    KeyBinding {
        key: "Ctrl+F",
        description: "files",
    },
    KeyBinding {
        key: "Ctrl+O",
        description: "history",
    },
    KeyBinding {
        key: "Ctrl+E",
        description: "settings",
    },
    KeyBinding {
        key: "Ctrl+C",
        description: "abort/clear",
    },
    KeyBinding {
        key: "Ctrl+Q",
        description: "quit",
    },
];

/// Bottom line: key hints on the left, channel state on the right.
pub fn render_help_line(frame: &mut Frame, area: Rect, connected: bool) {
    let mut instructions = KEY_BINDINGS
        .iter()
        .flat_map(|b| {
            vec![
                span!(Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD); b.key),
                " ".into(),
                span!(Style::default().fg(Color::White); b.description),
                " | ".into(),
            ]
        })
        .collect::<Vec<Span>>();
    instructions.pop(); // remove the last " | "

    let status = if connected {
        span!("● connected ").green()
    } else {
        span!("● disconnected ").red()
    };

    let [left, right] = Layout::horizontal([Constraint::Min(1), Constraint::Length(16)]).areas(area);
    frame.render_widget(Line::from(instructions).light_green(), left);
    frame.render_widget(Line::from(status).right_aligned(), right);
}
