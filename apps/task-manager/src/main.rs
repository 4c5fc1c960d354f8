//! Task Manager - in-memory task list TUI.
//!
//! Features:
//! - Tasks with priority, category, due date, and recurrence
//! - Views: list, status board, categories, agenda
//! - Search, status filter, and sorting
//! - Tasks live for the session only

mod app;
mod config;
mod ui;

use anyhow::Result;
use app::App;
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{fs::OpenOptions, io, sync::Mutex, time::Duration};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    init_logging()?;
    let config = Config::load();
    tracing::info!(sort = %config.sorting.default_sort, "starting task manager");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let mut app = App::new(config);
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app.remember_preferences();
    if let Err(e) = app.config.save() {
        tracing::warn!(error = %e, "failed to save config");
    }
    tracing::info!(tasks = app.service.task_count(), "exiting");
    result
}

/// Log to a file in the data dir; the terminal belongs to the UI.
fn init_logging() -> Result<()> {
    let Some(path) = Config::log_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "task_manager=info,task_core=info".into()),
        )
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .init();
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if app.can_quit() && key.code == KeyCode::Char('q') {
                    return Ok(());
                }
                app.handle_key(key);
            }
        }
    }
}
