#[allow(clippy::module_inception)]
mod config;

pub use config::{
    database_url, AppConfig, DEFAULT_DATABASE_NAME, DEFAULT_DATA_DIR, DEFAULT_LOG_FILE,
};
