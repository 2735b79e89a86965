//! Application state and main event loop for the fleet dashboard.
//!
//! The [`App`] struct holds all application state and [`run`] is the main
//! entry point. The event loop handles keyboard input and picks up the
//! single fetch outcome when it arrives.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::TableState, Terminal};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{error, info};

use super::ui;
use crate::error::{DashError, Result};
use crate::fetch::{spawn_initial_fetch, Dashboard, FetchOutcome};
use crate::store::RemoteStore;
use crate::view::{self, TableRow, UsageGroup};

/// All application state for the TUI dashboard.
pub struct App {
    pub dashboard: Dashboard,
    pub table: String,
    pub should_quit: bool,

    // Derived once per fetch completion
    pub usage: Vec<UsageGroup>,
    pub rows: Vec<TableRow>,

    // Server table selection
    pub table_state: TableState,

    pending: Option<oneshot::Receiver<FetchOutcome>>,
}

impl App {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            dashboard: Dashboard::new(),
            table: table.into(),
            should_quit: false,
            usage: Vec::new(),
            rows: Vec::new(),
            table_state: TableState::default(),
            pending: None,
        }
    }

    /// Kick off the one-shot fetch. Does nothing if one is already running.
    pub fn start_fetch(&mut self, store: Arc<dyn RemoteStore>) {
        if !self.dashboard.begin() {
            return;
        }
        info!(table = %self.table, "starting initial fetch");
        self.pending = Some(spawn_initial_fetch(store, self.table.clone()));
    }

    /// Check the fetch channel without blocking and apply the outcome if it arrived.
    pub fn poll_fetch(&mut self) {
        let Some(rx) = self.pending.as_mut() else {
            return;
        };

        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => {
                FetchOutcome::Failed(DashError::fetch("fetch task ended without a result"))
            }
        };
        self.pending = None;
        self.apply(outcome);
    }

    /// Apply a fetch outcome and rebuild the derived view data.
    pub fn apply(&mut self, outcome: FetchOutcome) {
        self.dashboard.complete(outcome);
        self.usage = view::usage_groups(self.dashboard.summary());
        self.rows = view::table_rows(self.dashboard.records());
        let selected = if self.rows.is_empty() { None } else { Some(0) };
        self.table_state.select(selected);
    }

    /// Handle a key press event.
    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Home | KeyCode::Char('g') => {
                if !self.rows.is_empty() {
                    self.table_state.select(Some(0));
                }
            }
            KeyCode::End | KeyCode::Char('G') => {
                if !self.rows.is_empty() {
                    self.table_state.select(Some(self.rows.len() - 1));
                }
            }
            _ => {}
        }
    }

    fn select_previous(&mut self) {
        let current = self.table_state.selected().unwrap_or(0);
        if current > 0 {
            self.table_state.select(Some(current - 1));
        }
    }

    fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        if current < self.rows.len() - 1 {
            self.table_state.select(Some(current + 1));
        }
    }
}

/// Main entry point for the TUI dashboard.
///
/// Starts the single fetch, sets up the terminal, and runs the event loop
/// until the user quits. The terminal is restored even if drawing fails.
pub async fn run(store: Arc<dyn RemoteStore>, table: &str, tick_rate: Duration) -> Result<()> {
    let mut app = App::new(table);
    app.start_fetch(store);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app, tick_rate).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        error!(error = %e, "dashboard exited with an error");
    }
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    loop {
        app.poll_fetch();

        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| DashError::Terminal(e.to_string()))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        // Let the fetch task make progress between polls
        tokio::task::yield_now().await;
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
