use color_eyre::eyre::eyre;
use dotenv::dotenv;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::TimeAnchor;

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_DATABASE_NAME: &str = "dora.db";
pub const DEFAULT_LOG_FILE: &str = "review_insights.log";
pub const DEFAULT_RENDER_DELAY_MS: u64 = 120;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// Runtime settings resolved from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub database_url: String,
    pub render_delay: Duration,
    pub search_debounce: Duration,
    pub time_anchor: TimeAnchor,
    pub log_file: PathBuf,
    pub debug: bool,
}

impl AppConfig {
    /// Loads `.env` and reads the process environment.
    pub fn from_env() -> color_eyre::eyre::Result<Self> {
        // Load environment variables from .env file
        dotenv().ok();
        let base_dir = env::current_dir()?;
        Self::from_lookup(&base_dir, |key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, relative to `base_dir`.
    pub fn from_lookup<F>(base_dir: &Path, lookup: F) -> color_eyre::eyre::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup("INSIGHTS_DATA_DIR")
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let db_name = lookup("DATABASE_NAME").unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string());
        let database_url = database_url(&base_dir.join(db_name))?;

        let millis = |key: &str, default: u64| -> color_eyre::eyre::Result<Duration> {
            lookup(key).map_or(Ok(Duration::from_millis(default)), |value| {
                value
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|e| eyre!("{key} must be a number of milliseconds: {e}"))
            })
        };
        let render_delay = millis("INSIGHTS_RENDER_DELAY_MS", DEFAULT_RENDER_DELAY_MS)?;
        let search_debounce = millis("INSIGHTS_SEARCH_DEBOUNCE_MS", DEFAULT_SEARCH_DEBOUNCE_MS)?;

        let time_anchor = match lookup("INSIGHTS_TIME_ANCHOR") {
            Some(value) => value.parse::<TimeAnchor>().map_err(|e| eyre!(e))?,
            None => TimeAnchor::default(),
        };

        let log_file = lookup("INSIGHTS_LOG_FILE")
            .map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from);

        let debug = lookup("DEBUG").is_some_and(|value| {
            matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
        });

        Ok(Self {
            data_dir,
            database_url,
            render_delay,
            search_debounce,
            time_anchor,
            log_file,
            debug,
        })
    }
}

/// Format the database URL the way SQLx expects it:
/// - absolute paths: sqlite:///absolute/path/to/file.db (3 slashes total)
/// - relative paths: sqlite://relative/path/to/file.db (2 slashes total)
pub fn database_url(database_path: &Path) -> color_eyre::eyre::Result<String> {
    let path_str = database_path
        .to_str()
        .ok_or_else(|| eyre!("Invalid database path"))?;

    // Strip any leading slashes from the path to avoid double slashes
    let clean_path = path_str.trim_start_matches('/');

    Ok(if database_path.is_absolute() {
        format!("sqlite:///{clean_path}")
    } else {
        format!("sqlite://{clean_path}")
    })
}
