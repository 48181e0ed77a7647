use crate::app::actions::AppActions;
use crate::app::input::helpers::{clamp_index, wrap_decrement, wrap_increment};
use review_insights::config::AppConfig;
use review_insights::dashboard::{Dashboard, DashboardEvent, DetailMode, RenderTicket};
use review_insights::loader::LoadError;
use review_insights::model::DashboardData;
use review_insights::search::{SearchSession, SearchSource};
use review_insights::{DataKind, TimeAnchor, TimeRange};
use std::time::{Duration, Instant};
use throbber_widgets_tui::ThrobberState;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Dashboard,
    /// Uncapped item list for the rendered category.
    Details,
    Search,
}

/// A detail render waiting for its loading delay to pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRender {
    pub ticket: RenderTicket,
    pub due: Instant,
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub show_help: bool,
    pub status_message: String,
    pub kind: DataKind,
    /// Data kind waiting to be loaded by the event loop.
    pub requested_kind: Option<DataKind>,
    pub time_range: TimeRange,
    pub anchor: TimeAnchor,
    pub dashboard: Option<Dashboard>,
    pub load_error: Option<String>,
    /// Bar under the keyboard cursor, which doubles as the hovered bar.
    pub bar_cursor: Option<usize>,
    pub badge_cursor: usize,
    pub detail_scroll: u16,
    pub search_scroll: u16,
    pub pending_renders: Vec<PendingRender>,
    pub render_delay: Duration,
    pub throbber: ThrobberState,
    pub search: SearchSession,
    pub search_requested: bool,
    pub search_error: Option<String>,
    pub actions: AppActions,
}

impl App {
    pub fn new(config: &AppConfig, kind: DataKind, time_range: TimeRange) -> Self {
        Self {
            running: true,
            screen: AppScreen::Dashboard,
            show_help: false,
            status_message: String::new(),
            kind,
            requested_kind: Some(kind),
            time_range,
            anchor: config.time_anchor,
            dashboard: None,
            load_error: None,
            bar_cursor: None,
            badge_cursor: 0,
            detail_scroll: 0,
            search_scroll: 0,
            pending_renders: Vec::new(),
            render_delay: config.render_delay,
            throbber: ThrobberState::default(),
            search: SearchSession::new(config.search_debounce),
            search_requested: false,
            search_error: None,
            actions: AppActions::new(config),
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn request_kind(&mut self, kind: DataKind) {
        if self.requested_kind.is_none() && kind == self.kind && self.dashboard.is_some() {
            return;
        }
        self.requested_kind = Some(kind);
    }

    /// Installs freshly loaded data. Everything but the time range starts over.
    pub fn apply_loaded(&mut self, kind: DataKind, result: Result<DashboardData, LoadError>) {
        self.kind = kind;
        self.bar_cursor = None;
        self.badge_cursor = 0;
        self.detail_scroll = 0;
        self.pending_renders.clear();
        if self.screen == AppScreen::Details {
            self.screen = AppScreen::Dashboard;
        }

        match result {
            Ok(data) => {
                self.search
                    .add_suggestions(data.categories.iter().map(|category| category.name.clone()));
                self.dashboard = Some(Dashboard::new(data, self.time_range, self.anchor));
                self.load_error = None;
                self.status_message = format!("Loaded {}", kind.label());
            }
            Err(e) => {
                self.dashboard = None;
                self.load_error = Some(e.to_string());
                self.status_message = format!("Could not load {}", kind.label());
            }
        }
    }

    pub fn apply_sources(&mut self, result: Result<Vec<SearchSource>, LoadError>) {
        match result {
            Ok(sources) => {
                self.search.load(sources);
                self.search_error = None;
            }
            Err(e) => self.search_error = Some(e.to_string()),
        }
    }

    fn dispatch(&mut self, event: DashboardEvent) {
        let Some(dashboard) = self.dashboard.as_mut() else {
            return;
        };
        if let Some(ticket) = dashboard.dispatch(event) {
            debug!(generation = ticket.generation(), "detail render scheduled");
            self.pending_renders.push(PendingRender {
                ticket,
                due: Instant::now() + self.render_delay,
            });
            self.badge_cursor = 0;
            self.detail_scroll = 0;
        }
    }

    pub fn bar_count(&self) -> usize {
        self.dashboard.as_ref().map_or(0, Dashboard::bar_count)
    }

    fn cursor_origin(&self) -> Option<usize> {
        self.bar_cursor.or_else(|| {
            self.dashboard
                .as_ref()
                .and_then(|dashboard| dashboard.state().selection.bar_index())
        })
    }

    pub fn move_bar_cursor(&mut self, forward: bool) {
        let len = self.bar_count();
        if len == 0 {
            return;
        }
        let index = match (self.cursor_origin(), forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(index), true) => wrap_increment(index, len),
            (Some(index), false) => wrap_decrement(index, len),
        };
        self.bar_cursor = Some(index);
        if let Some(dashboard) = self.dashboard.as_mut() {
            dashboard.hover_bar_at(index);
        }
    }

    pub fn clear_hover(&mut self) {
        self.bar_cursor = None;
        self.dispatch(DashboardEvent::ClearHover);
    }

    pub fn select_under_cursor(&mut self) {
        let Some(index) = self.bar_cursor else {
            return;
        };
        let Some(dashboard) = self.dashboard.as_ref() else {
            return;
        };
        let Some(name) = dashboard.data().bar_category(index).map(|c| c.name.clone()) else {
            return;
        };
        self.dispatch(DashboardEvent::SelectCategory { name, index });
    }

    pub fn select_other(&mut self) {
        let has_other = self
            .dashboard
            .as_ref()
            .is_some_and(|dashboard| dashboard.data().other_category().is_some());
        if has_other {
            self.dispatch(DashboardEvent::SelectOther);
        } else {
            self.status_message = "No uncategorized items".to_string();
        }
    }

    pub fn cycle_time_range(&mut self, forward: bool) {
        self.time_range = if forward {
            self.time_range.next()
        } else {
            self.time_range.previous()
        };
        self.dispatch(DashboardEvent::SetTimeRange(self.time_range));
        self.status_message = format!("Time range: {}", self.time_range.label());
    }

    fn badge_keys(&self) -> Vec<String> {
        self.dashboard
            .as_ref()
            .and_then(|dashboard| dashboard.detail(DetailMode::Inline))
            .map(|view| view.badges.into_iter().map(|badge| badge.key).collect())
            .unwrap_or_default()
    }

    pub fn move_badge_cursor(&mut self, forward: bool) {
        let len = self.badge_keys().len();
        self.badge_cursor = if forward {
            wrap_increment(self.badge_cursor, len)
        } else {
            wrap_decrement(self.badge_cursor, len)
        };
    }

    pub fn toggle_badge(&mut self) {
        // badges belong to the previous category until the render commits
        if self.is_loading() {
            return;
        }
        let keys = self.badge_keys();
        let Some(key) = keys.get(clamp_index(self.badge_cursor, keys.len())).cloned() else {
            return;
        };
        self.dispatch(DashboardEvent::ToggleSource(key));
        self.detail_scroll = 0;
        // a cleared zero-count badge disappears
        self.badge_cursor = clamp_index(self.badge_cursor, self.badge_keys().len());
    }

    pub fn scroll_detail(&mut self, down: bool) {
        self.detail_scroll = if down {
            self.detail_scroll.saturating_add(3)
        } else {
            self.detail_scroll.saturating_sub(3)
        };
    }

    pub fn is_loading(&self) -> bool {
        self.requested_kind.is_some()
            || self.dashboard.as_ref().is_some_and(Dashboard::is_loading)
    }

    /// Advances timers: due detail renders, the search debounce and the spinner.
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    pub fn update_at(&mut self, now: Instant) {
        let (due, waiting): (Vec<PendingRender>, Vec<PendingRender>) = self
            .pending_renders
            .iter()
            .partition(|pending| pending.due <= now);
        self.pending_renders = waiting;
        if let Some(dashboard) = self.dashboard.as_mut() {
            for pending in due {
                dashboard.dispatch(DashboardEvent::RenderDue(pending.ticket));
            }
        }

        if self.search.tick(now) {
            debug!(query = self.search.input(), "debounced search ran");
        }

        if self.is_loading() {
            self.throbber.calc_next();
        }
    }

    pub fn open_search(&mut self) {
        self.screen = AppScreen::Search;
        if !self.search.is_loaded() {
            self.search_requested = true;
        }
    }

    pub fn open_details(&mut self) {
        let rendered = self
            .dashboard
            .as_ref()
            .is_some_and(|dashboard| dashboard.rendered_category().is_some());
        if rendered {
            self.detail_scroll = 0;
            self.screen = AppScreen::Details;
        } else {
            error!("detail view requested before any category rendered");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_insights::loader::parse_dashboard;
    use std::path::{Path, PathBuf};

    const DATA: &str = r#"{
        "categories": [
            {"name": "Bugs", "count": 2, "aiSummary": "Crashes.", "complaints": [
                {"quote": "crashes", "date": "2025-11-02", "sourceType": "reddit_content",
                 "source": {"type": "comment", "body": "it crashes", "community": "apps",
                            "score": 3}},
                {"quote": "slow", "date": "2025-06-01", "sourceType": "other",
                 "source": {"platform": "App Store", "body": "slow", "rating": 2}}
            ]},
            {"name": "Pricing", "count": 1, "aiSummary": "Costs.", "complaints": [
                {"quote": "pricey", "date": "2025-10-10", "sourceType": "other",
                 "source": {"platform": "Trustpilot", "body": "pricey", "rating": 1}}
            ]},
            {"name": "other", "count": 1, "aiSummary": "Misc.", "complaints": [
                {"quote": "hm", "date": null, "sourceType": "other",
                 "source": {"platform": "Product Hunt", "body": "hm"}}
            ]}
        ],
        "timeSeries": {
            "labels": ["Jun 2025", "Jul 2025", "Aug 2025", "Sep 2025", "Oct 2025", "Nov 2025"],
            "rawLabels": ["2025-06", "2025-07", "2025-08", "2025-09", "2025-10", "2025-11"],
            "datasets": {
                "Bugs": [1, 0, 0, 0, 0, 1],
                "Pricing": [0, 0, 0, 0, 1, 0],
                "other": [0, 0, 0, 0, 0, 0]
            }
        }
    }"#;

    fn config() -> AppConfig {
        AppConfig {
            data_dir: PathBuf::from("./data"),
            database_url: "sqlite://dora.db".to_string(),
            render_delay: Duration::from_millis(100),
            search_debounce: Duration::from_millis(300),
            time_anchor: TimeAnchor::LatestData,
            log_file: PathBuf::from("test.log"),
            debug: false,
        }
    }

    fn loaded_app() -> App {
        let mut app = App::new(&config(), DataKind::Complaints, TimeRange::All);
        let data = parse_dashboard(DataKind::Complaints, DATA, Path::new("complaints.json"));
        app.requested_kind = None;
        app.apply_loaded(DataKind::Complaints, data);
        app
    }

    fn rendered(app: &App) -> Option<String> {
        app.dashboard
            .as_ref()
            .and_then(|dashboard| dashboard.rendered_category().map(ToString::to_string))
    }

    #[test]
    fn first_category_is_rendered_after_load() {
        let app = loaded_app();
        assert!(app.load_error.is_none());
        assert_eq!(rendered(&app).as_deref(), Some("Bugs"));
        assert!(!app.is_loading());
    }

    #[test]
    fn selection_commits_only_after_the_delay() {
        let mut app = loaded_app();
        app.move_bar_cursor(true);
        app.select_under_cursor();

        assert_eq!(app.pending_renders.len(), 1);
        assert_eq!(rendered(&app).as_deref(), Some("Bugs"));

        let due = app.pending_renders[0].due;
        app.update_at(due);
        assert!(app.pending_renders.is_empty());
        assert_eq!(rendered(&app).as_deref(), Some("Pricing"));
    }

    #[test]
    fn rapid_reselection_renders_the_last_choice() {
        let mut app = loaded_app();
        app.move_bar_cursor(true);
        app.select_under_cursor();
        app.select_other();
        app.move_bar_cursor(false);
        app.select_under_cursor();

        let last_due = app.pending_renders.iter().map(|p| p.due).max();
        if let Some(due) = last_due {
            app.update_at(due);
        }
        assert_eq!(rendered(&app).as_deref(), Some("Bugs"));
        assert!(!app.is_loading());
    }

    #[test]
    fn time_range_survives_a_data_switch() {
        let mut app = loaded_app();
        app.cycle_time_range(true);
        assert_eq!(app.time_range, TimeRange::ThreeMonths);

        let data = parse_dashboard(DataKind::UseCases, DATA, Path::new("use_cases.json"));
        app.apply_loaded(DataKind::UseCases, data);

        let dashboard = app.dashboard.as_ref().map(|d| d.state().time_range);
        assert_eq!(dashboard, Some(TimeRange::ThreeMonths));
        assert_eq!(app.bar_cursor, None);
    }

    #[test]
    fn load_failure_is_kept_for_inline_display() {
        let mut app = loaded_app();
        let failed = parse_dashboard(DataKind::ValueDrivers, "{", Path::new("value_drivers.json"));
        app.apply_loaded(DataKind::ValueDrivers, failed);

        assert!(app.dashboard.is_none());
        assert!(app
            .load_error
            .as_deref()
            .is_some_and(|message| message.contains("value_drivers.json")));
    }

    #[test]
    fn toggling_a_badge_filters_and_untoggling_clears() {
        let mut app = loaded_app();
        app.toggle_badge();
        let selected = app
            .dashboard
            .as_ref()
            .and_then(|d| d.state().selected_source.clone());
        assert_eq!(selected.as_deref(), Some("reddit"));

        app.toggle_badge();
        let selected = app
            .dashboard
            .as_ref()
            .and_then(|d| d.state().selected_source.clone());
        assert_eq!(selected, None);
    }

    #[test]
    fn badge_toggle_during_a_pending_render_is_ignored() {
        let mut app = loaded_app();
        app.move_bar_cursor(true);
        app.select_under_cursor();
        app.toggle_badge();

        let due = app.pending_renders[0].due;
        app.update_at(due);
        let selected = app
            .dashboard
            .as_ref()
            .and_then(|d| d.state().selected_source.clone());
        assert_eq!(rendered(&app).as_deref(), Some("Pricing"));
        assert_eq!(selected, None);
    }

    #[test]
    fn cursor_wraps_around_the_bars() {
        let mut app = loaded_app();
        app.move_bar_cursor(false);
        assert_eq!(app.bar_cursor, Some(1));
        app.move_bar_cursor(true);
        assert_eq!(app.bar_cursor, Some(0));
    }
}
