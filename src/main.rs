use std::io::{self, stdout, Stdout};
use std::panic::{set_hook, take_hook};

use anyhow::{Context as _, Result};
use clap::Parser;

use ratatui::{backend::CrosstermBackend, Terminal};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

use repofix::{
    cli,
    commands::{CommandEvent, CommandHandler},
    config::Config,
    frontend::App,
    repofix_tracing,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    let config = Config::load(&args.config_path)
        .await
        .with_context(|| format!("Failed to load config from {}", args.config_path.display()))?;

    if args.print_config {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    repofix_tracing::init(&config)?;
    tracing::info!("Loaded configuration from {}", args.config_path.display());

    init_panic_hook();
    let mut terminal = init_tui()?;

    let mut app = App::default();
    let mut handler = CommandHandler::from_config(config);
    handler.register_ui(&mut app);

    let handler_handle = handler.start();
    let app_result = app.run(&mut terminal).await;

    // The frontend sends a quit command on clean shutdown; send another in
    // case it bailed out early, then wait for the backend to drain
    if let Some(command_tx) = app.command_tx.as_ref() {
        let _ = command_tx.send(CommandEvent::quit());
    }
    let _ = handler_handle.await;
    restore_tui()?;

    if let Err(error) = app_result {
        tracing::error!(?error, "Application error");
        return Err(error);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_panic_hook() {
    let original_hook = take_hook();
    set_hook(Box::new(move |panic_info| {
        // Intentionally ignore errors here since we're already in a panic
        let _ = restore_tui();
        original_hook(panic_info);
    }));
}

fn init_tui() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout()))
}

fn restore_tui() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}
