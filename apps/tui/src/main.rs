mod app;
mod cli;
mod event;
mod terminal;
mod ui;

use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use review_insights::config::AppConfig;
use review_insights::logging::{init_tracing, LogTarget};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = AppConfig::from_env()?;

    // The dashboard owns stdout, so interactive runs log to a file
    let interactive = !args.headless && !args.export && is_terminal();
    let log_target = if interactive {
        LogTarget::File(config.log_file.clone())
    } else {
        LogTarget::Stderr
    };
    init_tracing(config.debug, &log_target)?;
    info!(
        kind = %args.kind,
        range = %args.range,
        anchor = config.time_anchor.as_str(),
        data_dir = %config.data_dir.display(),
        "starting"
    );

    let mut app = App::new(&config, args.kind, args.range);

    if args.export {
        return event::run_export(&mut app).await;
    }

    if !interactive {
        return event::run_headless(&mut app, args.json).await;
    }

    // Setup terminal
    let mut terminal = terminal::setup()?;

    // Run the application
    let result = event::run(&mut terminal, &mut app).await;

    // Restore terminal
    terminal::cleanup(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
