//! Keyboard input handling.
//!
//! Two modes: the search prompt captures every key while open; otherwise
//! keys dispatch to navigation, query, and favorites actions.

use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use crate::app::{App, AppEvent};

use super::Action;

pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if app.search_mode {
        return handle_search_input(app, code, event_tx);
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return Action::Quit;
        }

        KeyCode::Char('n') | KeyCode::Char('l') | KeyCode::Right => app.go_next(event_tx),
        KeyCode::Char('p') | KeyCode::Char('h') | KeyCode::Left => app.go_prev(event_tx),
        KeyCode::Char('g') | KeyCode::Home => app.go_first(event_tx),

        KeyCode::Char(c @ '1'..='3') => {
            // '1'..'3' map to the page's three dot positions.
            let i = (c as usize) - ('1' as usize);
            app.select_dot(i, event_tx);
        }

        KeyCode::Char('c') | KeyCode::Tab => app.cycle_category(event_tx),
        KeyCode::Char('/') => app.start_search(),

        KeyCode::Char('f') | KeyCode::Char(' ') => app.toggle_favorite(),
        KeyCode::Char('v') => app.toggle_favorites_view(event_tx),

        KeyCode::Char('o') | KeyCode::Enter => app.open_current(),

        _ => {}
    }

    Action::Continue
}

/// Handle input while the search prompt is open.
fn handle_search_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match code {
        KeyCode::Enter => app.submit_search(event_tx),
        KeyCode::Esc => app.cancel_search(),
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Char(c) => app.push_search_char(c),
        _ => {}
    }
    Action::Continue
}
