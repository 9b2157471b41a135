//! Key mapping from terminal events to player commands.

use crate::types::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map a typed character to a command (case-insensitive).
pub fn map_char(ch: char) -> Option<Command> {
    match ch.to_ascii_lowercase() {
        'q' => Some(Command::Quit),
        'w' => Some(Command::MoveUp),
        'a' => Some(Command::MoveLeft),
        's' => Some(Command::MoveDown),
        'd' => Some(Command::MoveRight),
        ' ' => Some(Command::Fire),
        _ => None,
    }
}

/// Map a key event to a command.
///
/// Raw mode swallows SIGINT, so Ctrl-C is treated as quit.
pub fn map_key(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('C') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::Quit)
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => map_char(ch),
        _ => None,
    }
}
