//! tresume - Terminal Resume Builder
//!
//! Walks the user through a resume one section at a time, previews it with
//! the selected template and exports it to PDF. Data lives in a per-user
//! data directory; diagnostics go to `tresume.log` next to it.

use anyhow::Context;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::fs;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tresume::application::App;
use tresume::config::AppConfig;
use tresume::presentation::{render_export_frame, render_ui, InputHandler};

/// Entry point for the tresume terminal application.
///
/// Reads configuration, starts file logging, sets up the terminal and runs
/// the event loop until the user quits.
fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    init_logging(&config)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), data_dir = %config.data_dir.display(), "starting tresume");

    let mut app = App::new(&config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal loop failed");
        println!("{err:?}");
    }
    tracing::info!("tresume stopped");

    Ok(())
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("failed to create {}", config.data_dir.display()))?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_file())
        .context("failed to open log file")?;

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file)
                .with_ansi(false),
        )
        .init();
    Ok(())
}

/// Main application event loop.
///
/// Continues running until `InputHandler::should_quit` accepts a key.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                if InputHandler::should_quit(app, key.code, key.modifiers) {
                    return Ok(());
                }
                InputHandler::handle_key_event(app, key.code, key.modifiers);
            }
        }

        if app.take_export_request() {
            terminal.draw(|f| render_ui(f, app))?;
            app.export_pdf(&mut |resume, state| {
                if let Err(e) = terminal.draw(|f| render_export_frame(f, resume, state)) {
                    tracing::warn!(error = %e, "could not draw export frame");
                }
            });
        }
    }
}
