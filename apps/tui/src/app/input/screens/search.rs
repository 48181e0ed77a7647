use crate::app::input::helpers::wrap_increment;
use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;
use std::time::Instant;

pub fn handle_search_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            if app.search.autocomplete().suggestions().is_empty() {
                app.screen = AppScreen::Dashboard;
            } else {
                app.search.autocomplete_mut().clear();
            }
        }
        KeyCode::Char(c) => {
            app.search.push_char(c, Instant::now());
            app.search_scroll = 0;
        }
        KeyCode::Backspace => {
            app.search.pop_char(Instant::now());
            app.search_scroll = 0;
        }
        KeyCode::Down => app.search.autocomplete_mut().next(),
        KeyCode::Up => app.search.autocomplete_mut().previous(),
        KeyCode::Enter => {
            let query = app
                .search
                .autocomplete()
                .accept()
                .unwrap_or_else(|| app.search.input().to_string());
            app.search.run_query(&query);
            app.search_scroll = 0;
        }
        KeyCode::Tab => cycle_filter(app),
        KeyCode::PageDown => app.search_scroll = app.search_scroll.saturating_add(5),
        KeyCode::PageUp => app.search_scroll = app.search_scroll.saturating_sub(5),
        _ => {}
    }
}

fn cycle_filter(app: &mut App) {
    let filters = app.search.available_filters();
    if filters.is_empty() {
        return;
    }
    let current = filters
        .iter()
        .position(|(filter, _)| filter == app.search.filter())
        .unwrap_or(0);
    let next = wrap_increment(current, filters.len());
    if let Some((filter, _)) = filters.into_iter().nth(next) {
        app.search.toggle_filter(filter);
        app.search_scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_insights::config::AppConfig;
    use review_insights::loader::parse_sources;
    use review_insights::search::SearchFilter;
    use review_insights::{DataKind, TimeRange};
    use std::path::Path;

    const SOURCES: &str = r#"{"sources": [
        {"id": "reddit_1", "type": "reddit", "contentType": "post", "title": "Bluetooth again",
         "body": "Bluetooth drops every hour", "community": "apps", "upvotes": 4,
         "date": "2025-10-01"},
        {"id": "review_2", "type": "review", "platform": "App Store",
         "body": "bluetooth pairing fails", "rating": 2, "date": "2025-09-01"},
        {"id": "review_3", "type": "review", "platform": "Trustpilot",
         "body": "great value", "rating": 5, "date": "2025-08-01"}
    ]}"#;

    fn app() -> App {
        let config = match AppConfig::from_lookup(Path::new("/tmp"), |_| None) {
            Ok(config) => config,
            Err(e) => panic!("default config should build: {e}"),
        };
        let mut app = App::new(&config, DataKind::Complaints, TimeRange::All);
        app.screen = AppScreen::Search;
        app.apply_sources(parse_sources(SOURCES, Path::new("sources.json")));
        app
    }

    #[test]
    fn enter_runs_the_typed_query_immediately() {
        let mut app = app();
        for c in "bluetooth".chars() {
            handle_search_input(&mut app, KeyCode::Char(c));
        }
        app.search.autocomplete_mut().clear();
        handle_search_input(&mut app, KeyCode::Enter);

        let hits = app.search.results().map(|results| results.hits.len());
        assert_eq!(hits, Some(2));
    }

    #[test]
    fn tab_walks_the_available_filters() {
        let mut app = app();
        app.search.run_query("bluetooth");

        handle_search_input(&mut app, KeyCode::Tab);
        assert_eq!(app.search.filter(), &SearchFilter::Posts);
        assert_eq!(app.search.visible().len(), 1);

        handle_search_input(&mut app, KeyCode::Tab);
        assert_eq!(app.search.filter(), &SearchFilter::Platform("appstore".to_string()));

        handle_search_input(&mut app, KeyCode::Tab);
        assert_eq!(app.search.filter(), &SearchFilter::All);
    }

    #[test]
    fn escape_closes_suggestions_before_the_page() {
        let mut app = app();
        handle_search_input(&mut app, KeyCode::Char('b'));
        handle_search_input(&mut app, KeyCode::Char('l'));
        let had_suggestions = !app.search.autocomplete().suggestions().is_empty();

        handle_search_input(&mut app, KeyCode::Esc);
        if had_suggestions {
            assert_eq!(app.screen, AppScreen::Search);
            handle_search_input(&mut app, KeyCode::Esc);
        }
        assert_eq!(app.screen, AppScreen::Dashboard);
    }
}
