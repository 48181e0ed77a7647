use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

/// F1 toggles the overlay anywhere; `?` only where it is not typed text.
pub fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    let question = key == KeyCode::Char('?') && app.screen != AppScreen::Search;
    if key == KeyCode::F(1) || question {
        app.show_help = !app.show_help;
        return true;
    }

    if app.show_help {
        if key == KeyCode::Esc {
            app.show_help = false;
        }
        return true;
    }

    false
}
