// Rendering for the dashboard binary

pub mod screens;
pub mod widgets;

use crate::app::{App, AppScreen};
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    match app.screen {
        AppScreen::Dashboard => screens::dashboard::render_dashboard(app, f),
        AppScreen::Details => {
            screens::dashboard::render_dashboard(app, f);
            screens::details::render_details(app, f);
        }
        AppScreen::Search => screens::search::render_search(app, f),
    }

    if app.show_help {
        screens::help::render_help_popup(app, f);
    }
}
