use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

pub fn handle_details_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc | KeyCode::Char('e') => {
            app.detail_scroll = 0;
            app.screen = AppScreen::Dashboard;
        }
        KeyCode::Char('q') => app.quit(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::PageDown => app.scroll_detail(true),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::PageUp => app.scroll_detail(false),
        KeyCode::Left | KeyCode::Char('h') => app.move_badge_cursor(false),
        KeyCode::Right | KeyCode::Char('l') => app.move_badge_cursor(true),
        KeyCode::Char(' ') => app.toggle_badge(),
        KeyCode::Char('t') => app.cycle_time_range(true),
        KeyCode::Char('T') => app.cycle_time_range(false),
        _ => {}
    }
}
