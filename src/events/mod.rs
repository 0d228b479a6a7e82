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

//! Application events and the main event loop.
//!
//! Everything that changes application state arrives here as an [`AppEvent`]:
//! key presses, ticks, results from the task worker and reports from the
//! audio worker. Events are processed one at a time on the main thread, so
//! the playback controller never sees overlapping calls.
//!
//! A handler failure never stops the loop; it is reported as an error toast.
//! Only [`AppEvent::FatalError`], sent when a worker thread dies, ends the
//! application with an error.

mod handlers;
mod key_handlers;

use std::io::Stdout;

use anyhow::{Result, anyhow};
use crossterm::event::KeyEvent;
use ratatui::{Terminal, prelude::CrosstermBackend};
use tracing::{error, warn};

use crate::{
    App,
    catalog::TrendingItems,
    commander::Command,
    error::user_message,
    model::{
        Track,
        library::{Home, HomeUpdate},
        search::SearchResults,
        toast::Toast,
    },
    player::PlayerEvent,
    render::draw,
};

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),
    Tick,
    ExitApplication,

    Command(Command),

    Scan(ScanEvent),
    HomeLoaded(Home),
    HomeUpdated(HomeUpdate),
    PlaylistLoaded { id: i64, tracks: Vec<Track> },

    /// Local matches are delivered even when the catalog could not be
    /// reached, along with the reason.
    SearchResults {
        ticket: u64,
        results: SearchResults,
        catalog_error: Option<String>,
    },
    SearchFailed { ticket: u64, message: String },
    TrendingLoaded { ticket: u64, items: TrendingItems },
    TrendingFailed { ticket: u64, message: String },
    StreamResolved { ticket: u64, track: Track },
    StreamFailed { ticket: u64, message: String },
    LyricsLoaded { ticket: u64, lyrics: Option<String> },
    LyricsFailed { ticket: u64, message: String },

    FavouriteStatus { track_id: String, favourite: bool },

    Player(PlayerEvent),

    Notify(Toast),
    FatalError(String),
}

#[derive(Debug)]
pub(crate) enum ScanEvent {
    Started,
    StartedDirectory(String),
    /// Files processed so far in the current directory.
    ProcessedFiles(usize),
    Finished(i64),
}

/// Runs the main application loop, handling events and rendering the UI in the
/// terminal.
///
/// This function loops until an exit event is received or the event channel
/// is closed.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    while let Ok(event) = app.event_rx.recv() {
        match event {
            AppEvent::ExitApplication => break,
            AppEvent::FatalError(message) => {
                error!(%message, "Fatal application error");
                return Err(anyhow!(message));
            }
            event => {
                if let Err(e) = handle_event(app, event) {
                    warn!(error = ?e, "Event handling failed");
                    app.toast = Some(Toast::error(user_message(&e)));
                }
            }
        }

        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}

fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    use handlers::*;

    match event {
        AppEvent::Key(key) => key_handlers::process_key_event(app, key)?,
        AppEvent::Tick => handle_tick(app),
        AppEvent::Command(command) => handle_command(app, command)?,

        AppEvent::Scan(scan_event) => handle_scan_event(app, scan_event),
        AppEvent::HomeLoaded(home) => handle_home_loaded(app, home),
        AppEvent::HomeUpdated(update) => handle_home_updated(app, update),
        AppEvent::PlaylistLoaded { id, tracks } => handle_playlist_loaded(app, id, tracks),

        AppEvent::SearchResults {
            ticket,
            results,
            catalog_error,
        } => handle_search_results(app, ticket, results, catalog_error),
        AppEvent::SearchFailed { ticket, message } => handle_search_failed(app, ticket, message),
        AppEvent::TrendingLoaded { ticket, items } => handle_trending_loaded(app, ticket, items),
        AppEvent::TrendingFailed { ticket, message } => {
            handle_trending_failed(app, ticket, message)
        }
        AppEvent::StreamResolved { ticket, track } => handle_stream_resolved(app, ticket, track)?,
        AppEvent::StreamFailed { ticket, message } => handle_stream_failed(app, ticket, message),
        AppEvent::LyricsLoaded { ticket, lyrics } => handle_lyrics_loaded(app, ticket, lyrics),
        AppEvent::LyricsFailed { ticket, message } => handle_lyrics_failed(app, ticket, message),

        AppEvent::FavouriteStatus {
            track_id,
            favourite,
        } => app.controller.on_favourite_status(&track_id, favourite),

        AppEvent::Player(player_event) => app.controller.on_player_event(player_event)?,

        AppEvent::Notify(toast) => app.toast = Some(toast),

        AppEvent::ExitApplication | AppEvent::FatalError(_) => {}
    }

    Ok(())
}
