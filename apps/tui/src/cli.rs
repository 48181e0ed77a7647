use clap::Parser;
use review_insights::{DataKind, TimeAnchor, TimeRange};

#[derive(Debug, Parser)]
#[command(
    name = "review_insights",
    version,
    about = "Terminal dashboard for review and social post insights"
)]
pub struct CliArgs {
    /// Print category counts and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless counts as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the dashboard JSON files from the database and exit
    #[arg(long)]
    pub export: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Data type shown first (complaints, use_cases, value_drivers, magic_moments)
    #[arg(long, value_name = "KIND", default_value = "complaints")]
    pub kind: DataKind,

    /// Initial time range (all, 3m, 6m, 1y)
    #[arg(long, value_name = "RANGE", default_value = "all")]
    pub range: TimeRange,

    /// Reference point for item date filtering (data, now)
    #[arg(long, value_name = "ANCHOR")]
    pub anchor: Option<TimeAnchor>,

    /// Override the directory holding the dashboard JSON files
    #[arg(long = "data-dir", value_name = "PATH")]
    pub data_dir: Option<String>,

    /// Override database path
    #[arg(long, value_name = "PATH")]
    pub db: Option<String>,

    /// Override the log file used while the dashboard owns the terminal
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(dir) = &self.data_dir {
            std::env::set_var("INSIGHTS_DATA_DIR", dir);
        }
        if let Some(db) = &self.db {
            std::env::set_var("DATABASE_NAME", db);
        }
        if let Some(anchor) = self.anchor {
            std::env::set_var("INSIGHTS_TIME_ANCHOR", anchor.as_str());
        }
        if let Some(path) = &self.log_file {
            std::env::set_var("INSIGHTS_LOG_FILE", path);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }
}
