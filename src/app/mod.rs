pub mod app;
pub mod services;
pub mod session;
pub mod ui;

use std::io;

pub use app::App;
pub use session::{ChatSession, SendOutcome};

use crossterm::{
    cursor,
    event::{DisableBracketedPaste, DisableMouseCapture},
    terminal::{LeaveAlternateScreen, disable_raw_mode, is_raw_mode_enabled},
};

/// Puts the terminal back into a usable state before a panic message is
/// printed.
pub fn destruct_terminal_for_panic() {
    if let Ok(true) = is_raw_mode_enabled() {
        let _ = disable_raw_mode();
        let _ = crossterm::execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        );
        let _ = crossterm::execute!(io::stdout(), cursor::Show);
    }
}
