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

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use crate::{
    App,
    catalog::{TrendingCategory, TrendingItems},
    commander::Command,
    components::TrackTableAction,
    events::{AppEvent, ScanEvent},
    model::{
        Entry, StreamRequest, Track,
        library::{Home, HomeUpdate, OpenPlaylist},
        search::SearchResults,
        toast::Toast,
        view::{MainView, local_queue},
    },
    tasks::AppTask,
};

pub(super) fn handle_tick(app: &mut App) {
    let now = Instant::now();
    if app.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
        app.toast = None;
    }
}

pub(super) fn handle_scan_event(app: &mut App, scan_event: ScanEvent) {
    match scan_event {
        ScanEvent::Started => app.scan.start(),
        ScanEvent::StartedDirectory(dir) => app.scan.begin_directory(&dir),
        ScanEvent::ProcessedFiles(count) => app.scan.update_directory(count),
        ScanEvent::Finished(total) => app.scan.finish(total),
    }
}

pub(super) fn handle_home_loaded(app: &mut App, home: Home) {
    app.listings.home = home;
    refresh_table(app);
}

pub(super) fn handle_home_updated(app: &mut App, update: HomeUpdate) {
    app.listings.home.apply(update);
    refresh_table(app);
}

pub(super) fn handle_playlist_loaded(app: &mut App, id: i64, tracks: Vec<Track>) {
    app.listings.playlist = OpenPlaylist {
        id: Some(id),
        tracks,
    };
    set_main_view(app, MainView::PlaylistTracks);
}

pub(super) fn handle_search_results(
    app: &mut App,
    ticket: u64,
    results: SearchResults,
    catalog_error: Option<String>,
) {
    if app.listings.search.results.accept(ticket, results) {
        refresh_table(app);
        if let Some(message) = catalog_error {
            app.toast = Some(Toast::error(message));
        }
    }
}

pub(super) fn handle_search_failed(app: &mut App, ticket: u64, message: String) {
    if app.listings.search.results.fail(ticket) {
        app.toast = Some(Toast::error(message));
    }
}

pub(super) fn handle_trending_loaded(app: &mut App, ticket: u64, items: TrendingItems) {
    if app.listings.trending.items.accept(ticket, items) {
        refresh_table(app);
    }
}

pub(super) fn handle_trending_failed(app: &mut App, ticket: u64, message: String) {
    if app.listings.trending.items.fail(ticket) {
        app.toast = Some(Toast::error(message));
    }
}

pub(super) fn handle_stream_resolved(app: &mut App, ticket: u64, track: Track) -> Result<()> {
    if !app.controller.on_stream_resolved(ticket, track)? {
        debug!(ticket, "Dropped superseded stream");
    }
    Ok(())
}

pub(super) fn handle_stream_failed(app: &mut App, ticket: u64, message: String) {
    if app.controller.on_resolution_failed(ticket) {
        app.toast = Some(Toast::error(message));
    }
}

pub(super) fn handle_lyrics_loaded(app: &mut App, ticket: u64, lyrics: Option<String>) {
    app.listings.lyrics.text.accept(ticket, lyrics);
}

pub(super) fn handle_lyrics_failed(app: &mut App, ticket: u64, message: String) {
    if app.listings.lyrics.text.fail(ticket) {
        app.toast = Some(Toast::error(message));
    }
}

pub(super) fn handle_command(app: &mut App, command: Command) -> Result<()> {
    match command {
        Command::Quit => app.event_tx.send(AppEvent::ExitApplication)?,

        Command::Search(query) => {
            let ticket = app.listings.search.begin(&query);
            app.task_tx.send(AppTask::Search { query, ticket })?;
            set_main_view(app, MainView::Search);
        }

        Command::Trending(category) => request_trending(app, category)?,

        Command::Radio => {
            let url = app.config.radio_stream_url.clone();
            app.controller.play_radio(&url)?;
        }

        Command::Lyrics => request_lyrics(app)?,

        Command::Scan => app.task_tx.send(AppTask::ScanLibrary)?,

        Command::NewPlaylist(name) => app.task_tx.send(AppTask::CreatePlaylist(name))?,

        Command::AddToPlaylist(playlist_id) => match track_for_playlist(app) {
            Some(track_id) => app.task_tx.send(AppTask::AddToPlaylist {
                playlist_id,
                track_id,
            })?,
            None => app.toast = Some(Toast::info("Select a library track first")),
        },

        Command::DeletePlaylist(id) => {
            app.task_tx.send(AppTask::DeletePlaylist(id))?;
            if app.main_view == MainView::PlaylistTracks && app.listings.playlist.id == Some(id) {
                app.listings.playlist = OpenPlaylist::default();
                set_main_view(app, MainView::Playlists);
            }
        }

        Command::Volume(percent) => app.controller.set_volume(f64::from(percent) / 100.0)?,

        Command::Repeat(mode) => {
            let mode = match mode {
                Some(mode) => {
                    app.controller.set_repeat_mode(mode);
                    mode
                }
                None => app.controller.cycle_repeat_mode(),
            };
            app.toast = Some(Toast::info(format!("Repeat {}", mode.label())));
        }
    }

    Ok(())
}

pub(super) fn request_trending(app: &mut App, category: TrendingCategory) -> Result<()> {
    let ticket = app.listings.trending.begin(category);
    app.task_tx
        .send(AppTask::Trending { category, ticket })
        .context("Failed to queue trending request")?;
    set_main_view(app, MainView::Trending);
    Ok(())
}

fn request_lyrics(app: &mut App) -> Result<()> {
    let Some(track) = app.controller.current().cloned() else {
        app.toast = Some(Toast::info("Nothing is playing"));
        return Ok(());
    };

    let ticket = app.listings.lyrics.begin(&track.name);
    app.task_tx.send(AppTask::FetchLyrics { track, ticket })?;
    set_main_view(app, MainView::Lyrics);

    Ok(())
}

/// The highlighted library track, falling back to the one playing.
fn track_for_playlist(app: &App) -> Option<String> {
    match app.table.selected_entry() {
        Some(Entry::Local(track)) => Some(track.id.clone()),
        _ => app
            .controller
            .current()
            .filter(|t| !t.id.is_empty())
            .map(|t| t.id.clone()),
    }
}

pub(super) fn handle_table_action(app: &mut App, action: TrackTableAction) -> Result<()> {
    let TrackTableAction::Activate(index) = action;
    let Some(entry) = app.table.entries.get(index).cloned() else {
        return Ok(());
    };

    match entry {
        Entry::Local(track) => {
            let queue = local_queue(&app.table.entries);
            app.controller.load_and_play(track, Some(queue))?;
        }
        Entry::Remote(track) => {
            app.toast = Some(Toast::info(format!("Loading {}", track.title)));
            app.controller.resolve_and_play(StreamRequest::from(&track))?;
        }
        Entry::Playlist(playlist) => app.task_tx.send(AppTask::LoadPlaylist(playlist.id))?,
        Entry::CatalogPlaylist(_) | Entry::Artist(_) => {
            app.toast = Some(Toast::info("Only tracks can be played"));
        }
    }

    Ok(())
}

pub(super) fn set_main_view(app: &mut App, view: MainView) {
    let changed = app.main_view != view;
    app.main_view = view;
    refresh_table(app);
    if changed {
        app.table.reset_selection();
    }
}

/// Rebuilds the table rows from the listing behind the current view.
pub(super) fn refresh_table(app: &mut App) {
    let entries = app.listings.entries(app.main_view);
    app.table.set_entries(entries);
}
