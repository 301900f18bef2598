// ABOUTME: Main entry point for the IGCSE ICT tutoring portal with TUI and CLI support
//
// Binary: ict-portal
// Usage: ict-portal [COMMAND]
// - No command: launches TUI
// - register: step through the registration wizard on the command line
// - login / logout / whoami: manage the saved session
// - upload: send a course material file
// - check-in: record attendance from a QR token

#![allow(missing_docs)]

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::Backend, prelude::*};
use std::{
    io::{self, IsTerminal},
    time::{Duration, Instant},
};

use ict_portal::app::{App, EventHandler};
use ict_portal::cli;
use ict_portal::components::LayoutComponent;
use ict_portal::config::AppConfig;

/// Terminal cleanup utility to ensure proper restoration
fn cleanup_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Unified terminal cleanup that works with a terminal instance
fn cleanup_terminal_with_instance<B: Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    setup_panic_handler();

    let args = cli::Cli::parse();
    let config = AppConfig::load()?;

    let result = match args.command {
        // CLI commands
        Some(cli::Commands::Register) => cli::register::execute(config, args.format).await,
        Some(cli::Commands::Login(login_args)) => {
            cli::auth::login(login_args, config, args.format).await
        }
        Some(cli::Commands::Logout) => cli::auth::logout(config),
        Some(cli::Commands::Whoami) => cli::auth::whoami(config, args.format),
        Some(cli::Commands::Upload(upload_args)) => {
            cli::materials::upload(upload_args, config, args.format).await
        }
        Some(cli::Commands::CheckIn(check_in_args)) => {
            cli::materials::check_in(check_in_args, config, args.format).await
        }

        // TUI mode (explicit or default)
        Some(cli::Commands::Tui) | None => {
            let layout = LayoutComponent::new(config.ui_preferences.show_password_hints);
            let mut app = App::new(config)?;
            app.init();

            // Flush any pending terminal events so a stray keypress doesn't open a screen
            while event::poll(Duration::from_millis(10)).unwrap_or(false) {
                let _ = event::read();
            }

            run_tui(&mut app, &layout).await
        }
    };

    // Ensure terminal is cleaned up on any error
    if result.is_err() {
        cleanup_terminal();
    }

    result
}

async fn run_tui(app: &mut App, layout: &LayoutComponent) -> Result<()> {
    if !IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!(
            "No TTY detected. This application requires a terminal.\n\
             Use the register/login subcommands when redirecting output."
        ));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_tui_loop(app, layout, &mut terminal).await;

    if let Err(e) = cleanup_terminal_with_instance(&mut terminal) {
        tracing::error!("Failed to cleanup terminal: {}", e);
        cleanup_terminal();
    }

    result
}

async fn run_tui_loop(
    app: &mut App,
    layout: &LayoutComponent,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(app.state.config.ui_preferences.tick_rate_ms);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| layout.render(frame, &app.state))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    if let Some(app_event) =
                        EventHandler::handle_key_event(key_event, &mut app.state)
                    {
                        EventHandler::process_event(app_event, &mut app.state);
                    }
                }
            }
        }

        if app.state.pending_async_action.is_some() {
            // Show the loading state before the request blocks the loop
            terminal.draw(|frame| layout.render(frame, &app.state))?;
            if let Err(e) = app.process_async_action().await {
                tracing::error!("Error while processing async action: {}", e);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.state.tick(Instant::now());
            last_tick = Instant::now();
        }

        if app.state.should_quit {
            break;
        }
    }

    Ok(())
}

fn setup_logging() {
    use std::fs::OpenOptions;
    use std::path::PathBuf;
    use tracing_subscriber::prelude::*;

    let log_dir = AppConfig::base_dir()
        .map(|base| base.join("logs"))
        .unwrap_or_else(|_| PathBuf::from(".ict-portal/logs"));

    let _ = std::fs::create_dir_all(&log_dir);

    let log_file = log_dir.join(format!(
        "ict-portal-{}.jsonl",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    // Best effort: no log file means no logging
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_file) else {
        return;
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ict_portal=info".into()),
        )
        .init();
}

fn setup_panic_handler() {
    use tracing::error;

    std::panic::set_hook(Box::new(|panic_info| {
        // Ensure terminal is restored before logging the panic
        cleanup_terminal();

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs in ~/.ict-portal/logs for more details.");
    }));
}
