use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use review_insights::loader::LoadError;
use review_insights::model::DashboardData;
use review_insights::DataKind;
use std::convert::TryFrom;
use std::fmt;
use std::io::Stdout;
use tracing::{info, warn};

use crate::app::{handle_input, App};
use crate::ui;

// States of a data-kind load
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum LoadState {
    Idle,
    Loading(DataKind),
    Ready,
    Failed,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Loading(kind) => write!(f, "Loading({kind})"),
            Self::Ready => write!(f, "Ready"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Debug)]
enum LoadEvent {
    Start(DataKind),
    Loaded(DashboardData),
    Failed(LoadError),
    Reset,
}

impl fmt::Display for LoadEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start(kind) => write!(f, "Start({kind})"),
            Self::Loaded(data) => write!(f, "Loaded({} categories)", data.categories.len()),
            Self::Failed(error) => write!(f, "Failed({error})"),
            Self::Reset => write!(f, "Reset"),
        }
    }
}

#[derive(Debug)]
struct StateTransitionError {
    from: LoadState,
    event: String,
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for StateTransitionError {}

/// Drives one data-kind load at a time and hands the result to the app.
struct LoadMachine {
    state: LoadState,
}

impl LoadMachine {
    const fn new(initial_state: LoadState) -> Self {
        Self {
            state: initial_state,
        }
    }

    const fn state(&self) -> LoadState {
        self.state
    }

    fn process_event(
        &mut self,
        event: LoadEvent,
        app: &mut App,
    ) -> std::result::Result<(), StateTransitionError> {
        let next_state = NextState::try_from((self.state, event, app))?;
        self.state = next_state.0;
        Ok(())
    }
}

struct NextState(LoadState);

impl TryFrom<(LoadState, LoadEvent, &mut App)> for NextState {
    type Error = StateTransitionError;

    fn try_from(value: (LoadState, LoadEvent, &mut App)) -> std::result::Result<Self, Self::Error> {
        let (current_state, event, app) = value;

        match (current_state, event) {
            (LoadState::Idle, LoadEvent::Start(kind)) => {
                app.status_message = format!("Loading {}...", kind.label());
                Ok(Self(LoadState::Loading(kind)))
            }
            (LoadState::Loading(kind), LoadEvent::Loaded(data)) => {
                app.requested_kind = None;
                app.apply_loaded(kind, Ok(data));
                Ok(Self(LoadState::Ready))
            }
            (LoadState::Loading(kind), LoadEvent::Failed(error)) => {
                app.requested_kind = None;
                app.apply_loaded(kind, Err(error));
                Ok(Self(LoadState::Failed))
            }
            (LoadState::Ready | LoadState::Failed, LoadEvent::Reset) => Ok(Self(LoadState::Idle)),
            (from, event) => Err(StateTransitionError {
                from,
                event: event.to_string(),
            }),
        }
    }
}

/// Loads the requested data kind, if any, through the state machine.
async fn load_requested(machine: &mut LoadMachine, app: &mut App) -> Result<()> {
    let Some(kind) = app.requested_kind else {
        return Ok(());
    };
    if machine.state() != LoadState::Idle {
        return Ok(());
    }

    machine.process_event(LoadEvent::Start(kind), app)?;
    let event = match app.actions.load_dashboard(kind).await {
        Ok(data) => LoadEvent::Loaded(data),
        Err(error) => LoadEvent::Failed(error),
    };
    machine.process_event(event, app)?;
    machine.process_event(LoadEvent::Reset, app)?;
    Ok(())
}

/// Run the application in headless mode (no UI)
pub async fn run_headless(app: &mut App, json: bool) -> Result<()> {
    let mut machine = LoadMachine::new(LoadState::Idle);
    load_requested(&mut machine, app).await?;

    if let Some(error) = &app.load_error {
        return Err(eyre!("{error}"));
    }

    let stats = build_headless_stats(app)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        render_headless_stats(&stats);
    }

    Ok(())
}

fn render_headless_stats(stats: &HeadlessStats) {
    let title = format!("{} ({})", stats.kind, stats.range);
    println!("\n{title}");
    println!("{}", "=".repeat(title.chars().count()));

    let width = stats
        .categories
        .iter()
        .map(|category| category.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(5);
    for category in &stats.categories {
        println!("{:<width$}  {:>5}", category.name, category.count);
    }
    if let Some(other) = stats.other {
        println!("{:<width$}  {:>5}", "other", other);
    }

    println!("\nItems in range: {}", stats.items_in_range);
    if let (Some(first), Some(last)) = (stats.months.first(), stats.months.last()) {
        println!("Months shown: {first} to {last}");
    }
}

fn build_headless_stats(app: &App) -> Result<HeadlessStats> {
    let dashboard = app
        .dashboard
        .as_ref()
        .ok_or_else(|| eyre!("No dashboard data loaded"))?;

    let categories: Vec<HeadlessCategory> = dashboard
        .bars()
        .into_iter()
        .map(|bar| HeadlessCategory {
            name: bar.name,
            count: bar.count,
        })
        .collect();
    let other = dashboard
        .data()
        .other_category()
        .map(|category| dashboard.window().filter(&category.items).len());
    let items_in_range =
        categories.iter().map(|category| category.count).sum::<usize>() + other.unwrap_or(0);

    Ok(HeadlessStats {
        kind: app.kind.label().to_string(),
        range: app.time_range.label().to_string(),
        months: dashboard.chart().labels().to_vec(),
        categories,
        other,
        items_in_range,
    })
}

#[derive(serde::Serialize)]
struct HeadlessStats {
    kind: String,
    range: String,
    months: Vec<String>,
    categories: Vec<HeadlessCategory>,
    other: Option<usize>,
    items_in_range: usize,
}

#[derive(serde::Serialize)]
struct HeadlessCategory {
    name: String,
    count: usize,
}

/// Write every dashboard file from the database, then exit.
pub async fn run_export(app: &mut App) -> Result<()> {
    app.actions.initialize_db().await?;
    let summary = app.actions.export().await?;

    println!("\nExported to {}", app.actions.data_dir.display());
    for (path, count) in &summary.written {
        println!("- {} ({count} rows)", path.display());
    }
    for skipped in &summary.skipped {
        println!("- skipped {skipped}: table missing");
    }
    info!(
        written = summary.written.len(),
        skipped = summary.skipped.len(),
        "export finished"
    );
    Ok(())
}

/// Run the main application event loop
pub async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let mut load_machine = LoadMachine::new(LoadState::Idle);

    loop {
        // Due renders, search debounce and spinner
        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    // Force a redraw after resize
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(_) | Err(_) => {}
            }
        }

        if app.requested_kind.is_some() {
            // Paint the spinner before the load blocks the loop
            if terminal.draw(|f| ui::ui(app, f)).is_err() {
                // Non-fatal redraw error
            }
            if let Err(e) = load_requested(&mut load_machine, app).await {
                warn!(error = %e, "load state machine rejected a transition");
                load_machine = LoadMachine::new(LoadState::Idle);
                app.requested_kind = None;
            }
        }

        if app.search_requested {
            app.search_requested = false;
            let result = app.actions.load_sources().await;
            app.apply_sources(result);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_insights::config::AppConfig;
    use review_insights::TimeRange;
    use std::path::Path;

    const DATA: &str = r#"{
        "categories": [
            {"name": "Bugs", "count": 1, "aiSummary": "", "complaints": [
                {"quote": "q", "date": "2025-11-02",
                 "source": {"platform": "App Store", "body": "q"}}
            ]},
            {"name": "other", "count": 1, "aiSummary": "", "complaints": [
                {"quote": "q", "date": null, "source": {"platform": "Trustpilot", "body": "q"}}
            ]}
        ],
        "timeSeries": {"labels": ["Nov 2025"], "rawLabels": ["2025-11"], "datasets": {"Bugs": [1]}}
    }"#;

    fn app_in(dir: &Path) -> App {
        let data_dir = dir.display().to_string();
        let config = AppConfig::from_lookup(dir, |key| {
            (key == "INSIGHTS_DATA_DIR").then(|| data_dir.clone())
        });
        match config {
            Ok(config) => App::new(&config, DataKind::Complaints, TimeRange::All),
            Err(e) => panic!("config should build: {e}"),
        }
    }

    #[tokio::test]
    async fn machine_installs_loaded_data_and_returns_to_idle() -> Result<()> {
        let dir = tempfile::tempdir()?;
        tokio::fs::write(dir.path().join("complaints.json"), DATA).await?;
        let mut app = app_in(dir.path());
        let mut machine = LoadMachine::new(LoadState::Idle);

        load_requested(&mut machine, &mut app).await?;

        assert_eq!(machine.state(), LoadState::Idle);
        assert!(app.requested_kind.is_none());
        assert!(app.dashboard.is_some());

        let stats = build_headless_stats(&app)?;
        assert_eq!(stats.categories.len(), 1);
        assert_eq!(stats.other, Some(1));
        assert_eq!(stats.items_in_range, 2);
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_becomes_an_inline_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut app = app_in(dir.path());
        let mut machine = LoadMachine::new(LoadState::Idle);

        load_requested(&mut machine, &mut app).await?;

        assert_eq!(machine.state(), LoadState::Idle);
        assert!(app.dashboard.is_none());
        assert!(app.load_error.is_some());
        Ok(())
    }

    #[test]
    fn finishing_without_starting_is_rejected() {
        let dir = std::env::temp_dir();
        let mut app = app_in(&dir);
        let mut machine = LoadMachine::new(LoadState::Idle);

        let result = machine.process_event(LoadEvent::Reset, &mut app);
        assert!(result.is_err());
        assert_eq!(machine.state(), LoadState::Idle);
    }
}
