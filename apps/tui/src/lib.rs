// Export our modules for use in binaries and tests
pub mod config;
pub mod dashboard;
pub mod db;
pub mod domain;
pub mod export;
pub mod loader;
pub mod logging;
pub mod model;
pub mod search;
pub mod text;
mod wire;

pub use domain::{DataKind, TimeAnchor, TimeRange};
