mod loop_handler;

pub use loop_handler::{run, run_export, run_headless};
