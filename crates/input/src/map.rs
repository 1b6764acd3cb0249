//! Key mapping from terminal events to game actions.

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to game actions.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if is_cancel(key) {
        return Some(GameAction::Cancel);
    }

    match key.code {
        // Drag
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(GameAction::Drag(-1))
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(GameAction::Drag(1))
        }
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(GameAction::Drag(0)),

        // Touch-up
        KeyCode::Down | KeyCode::Char(' ') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(GameAction::Drop)
        }

        // Buttons
        KeyCode::Enter => Some(GameAction::Start),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(GameAction::Reset),

        _ => None,
    }
}

/// Esc, `q` and Ctrl-C quit from any screen.
pub fn is_cancel(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
