use crate::app::state::App;
use crossterm::event::KeyCode;
use review_insights::DataKind;

pub fn handle_dashboard_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Up | KeyCode::Char('k') => app.move_bar_cursor(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_bar_cursor(true),
        KeyCode::Esc => app.clear_hover(),
        KeyCode::Enter => app.select_under_cursor(),
        KeyCode::Char('o') => app.select_other(),
        KeyCode::Char('t') => app.cycle_time_range(true),
        KeyCode::Char('T') => app.cycle_time_range(false),
        KeyCode::Left | KeyCode::Char('h') => app.move_badge_cursor(false),
        KeyCode::Right | KeyCode::Char('l') => app.move_badge_cursor(true),
        KeyCode::Char(' ') => app.toggle_badge(),
        KeyCode::PageDown => app.scroll_detail(true),
        KeyCode::PageUp => app.scroll_detail(false),
        KeyCode::Char('e') => app.open_details(),
        KeyCode::Char('/') => app.open_search(),
        KeyCode::Tab => app.request_kind(app.kind.next()),
        KeyCode::Char(c @ '1'..='4') => {
            let index = c.to_digit(10).map_or(0, |digit| digit as usize - 1);
            if let Some(kind) = DataKind::from_index(index) {
                app.request_kind(kind);
            }
        }
        _ => {}
    }
}
