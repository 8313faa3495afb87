use crate::config::Config;
use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

// Logs go to a rolling file and the in-app log view, never to stdout;
// stdout belongs to the terminal UI
pub fn init(config: &Config) -> Result<()> {
    let log_dir = config.log_dir();

    let file_appender = tracing_appender::rolling::daily(log_dir, "repofix.log");

    let fmt_layer = fmt::layer().with_writer(file_appender);

    // Logs the file layer will capture
    let env_filter_layer = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
        .add_directive("h2=error".parse()?)
        .add_directive("hyper=error".parse()?)
        .add_directive("tower=error".parse()?);

    // The log level tui logger will capture
    let default_level = if cfg!(debug_assertions) {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    let tui_layer = tui_logger::tracing_subscriber_layer();
    tui_logger::init_logger(default_level)?;

    tracing_subscriber::registry()
        .with(env_filter_layer)
        .with(tui_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
