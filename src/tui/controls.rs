//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::App;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Tab | KeyCode::Right => app.next_view(),
        KeyCode::BackTab | KeyCode::Left => app.prev_view(),
        KeyCode::Char('c') => app.next_component(),
        KeyCode::Char('C') => app.prev_component(),
        KeyCode::Char('a') => app.next_attribute(),
        KeyCode::Char('m') => app.next_mode(),
        KeyCode::Char('e') => app.next_entity(),
        KeyCode::Char('E') => app.prev_entity(),
        KeyCode::Char(' ') => app.toggle_entity(),
        KeyCode::Char('x') => app.clear_selection(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
        KeyCode::Char(d @ '1'..='9') => {
            app.load_sample(d as usize - '1' as usize);
        }
        _ => {}
    }
}
