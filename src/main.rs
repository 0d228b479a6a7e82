// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! # Music Player TUI.
//!
//! A terminal music player for a local library and a remote streaming
//! catalog.
//!
//! This application coordinates a TUI frontend built with `ratatui` and a
//! background processing layer.
//!
//! It uses an event-driven architecture where:
//!
//! * The **Main Thread** manages the terminal lifecycle, UI rendering and the
//!   playback controller.
//! * **Background Workers** handle database queries, catalog requests and
//!   audio output, reporting back with application events.
//! * **Event Loops** capture user input and system ticks to drive the UI
//!   state.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern to ensure the
//! terminal state is preserved even in the event of a crash. Communication
//! between the UI and background workers is handled via `std::sync::mpsc`
//! channels.

mod catalog;
mod commander;
mod components;
mod config;
mod controller;
mod db;
mod error;
mod events;
mod logging;
mod model;
mod player;
mod render;
mod tasks;
mod theme;
mod util;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io,
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Duration,
};
use tracing::info;

use crate::{
    commander::Commander,
    components::TrackTableState,
    config::AppConfig,
    controller::PlaybackController,
    events::{AppEvent, process_events},
    model::{
        library::LibraryScan,
        toast::Toast,
        view::{Listings, MainView},
    },
    player::AudioPlayer,
    tasks::{AppTask, spawn_task_worker},
    theme::Theme,
};

const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Application state.
struct App {
    pub config: AppConfig,

    pub theme: Theme,
    pub main_view: MainView,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    pub task_tx: Sender<AppTask>,

    pub controller: PlaybackController<AudioPlayer>,

    pub listings: Listings,
    pub scan: LibraryScan,

    pub table: TrackTableState,
    pub commander: Commander,

    pub toast: Option<Toast>,
}

impl App {
    /// Create a new instance of application state.
    pub fn new(config: AppConfig, task_tx: Sender<AppTask>) -> Self {
        let (event_tx, event_rx) = mpsc::channel();

        let audio_player = AudioPlayer::new(event_tx.clone());
        let controller = PlaybackController::new(audio_player, task_tx.clone(), config.initial_volume);

        Self {
            config,
            theme: Theme::default(),
            main_view: MainView::default(),
            event_tx,
            event_rx,
            task_tx,
            controller,
            listings: Listings::default(),
            scan: LibraryScan::new(),
            table: TrackTableState::new(),
            commander: Commander::new(),
            toast: None,
        }
    }
}

/// The entry point of the application.
///
/// Sets up logging and the communication channels, initializes the
/// application state, manages the terminal lifecycle, and returns an error if
/// any part of the execution fails.
fn main() -> Result<()> {
    let _log_guard = logging::init_logging()?;

    let config = config::load_config();
    info!(media_dirs = ?config.media_dirs, database = %config.database_file, "Starting");

    let (task_tx, task_rx) = mpsc::channel();

    let mut app = App::new(config, task_tx);

    let mut terminal = setup_terminal(&app)?;
    let res = run(&mut terminal, &mut app, task_rx);
    restore_terminal(&mut terminal);

    res.context("Application error occurred")
}

/// Prepares the terminal for the TUI application.
///
/// This function performs the following side effects:
/// * Sets the terminal background color based on the provided theme.
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal(app: &App) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    // Set the background of the entire terminal window, without this we'd get
    // a thin black outline
    util::term::set_terminal_bg(app.theme.background_colour);

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This reverses the changes made by [`setup_terminal`]. It is best-effort
/// and does not return a result, as it runs during cleanup.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    util::term::reset_terminal_bg();
    terminal.show_cursor().ok();
}

/// Starts the application's background workers and enters the main event loop.
///
/// This function spawns several long-running background threads:
/// * A task worker to process blocking [`AppTask`]s.
/// * An input thread to poll for system keyboard events.
/// * A tick thread to trigger periodic UI refreshes.
///
/// The audio worker is already running, started with the [`AudioPlayer`].
///
/// # Errors
///
/// Returns an error if the event processing loop encounters an unrecoverable
/// application error.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    task_rx: Receiver<AppTask>,
) -> Result<()> {
    spawn_task_worker(&app.config, task_rx, app.event_tx.clone());

    // Translate raw key presses to application events.
    let tx_keys = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx_keys.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });

    // The tick is the minimum "frame rate" of the TUI, and expires toasts.
    let tx_tick = app.event_tx.clone();
    thread::spawn(move || {
        while tx_tick.send(AppEvent::Tick).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });

    // Populate the home listings, then pick up any library changes
    app.task_tx.send(AppTask::LoadHome).context("Task worker unavailable")?;
    if !app.config.media_dirs.is_empty() {
        app.task_tx.send(AppTask::ScanLibrary).context("Task worker unavailable")?;
    }

    process_events(terminal, app)
}
