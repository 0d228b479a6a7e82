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

//! Asynchronous application task processing.
//!
//! This module implements the command pattern used to offload blocking work
//! from the main UI thread. A dedicated worker translates [`AppTask`]
//! requests into database, catalog and lyrics calls and broadcasts the
//! results back to the application via [`AppEvent`]s.
//!
//! Only actions that may block, or may take more than a trivial amount of time
//! to process, should be implemented as tasks. Other actions are more suited
//! to events.
//!
//! Failures never stop the worker. They are turned into a short message with
//! [`user_message`] and reported as an error toast. Requests that carry a
//! ticket report failure with a dedicated event instead, so a superseded
//! request fails silently.

mod handlers;

use std::{
    sync::mpsc::{Receiver, Sender},
    thread,
};

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{debug, error, warn};

use crate::{
    catalog::{CatalogClient, TrendingCategory, lyrics::LyricsClient},
    config::AppConfig,
    db,
    error::user_message,
    events::AppEvent,
    model::{StreamRequest, Track, toast::Toast},
};

#[derive(Debug)]
pub(crate) enum AppTask {
    ScanLibrary,
    LoadHome,

    Search { query: String, ticket: u64 },
    Trending { category: TrendingCategory, ticket: u64 },
    ResolveStream { request: StreamRequest, ticket: u64 },
    FetchLyrics { track: Track, ticket: u64 },

    RecordPlay(String),
    CheckFavourite(String),
    ToggleFavourite(String),

    LoadPlaylist(i64),
    CreatePlaylist(String),
    AddToPlaylist { playlist_id: i64, track_id: String },
    DeletePlaylist(i64),
}

/// Spawns a background thread to process application tasks.
///
/// This worker thread opens its own database connection and HTTP clients and
/// enters a blocking loop, listening for incoming [`AppTask`]s. It exits when
/// every task sender has been dropped.
///
/// # Arguments
///
/// * `config` - The application configuration.
/// * `task_rx` - The receiving end of the task channel.
/// * `event_tx` - The sending end of the channel for broadcasting results.
pub(crate) fn spawn_task_worker(
    config: &AppConfig,
    task_rx: Receiver<AppTask>,
    event_tx: Sender<AppEvent>,
) {
    let config = config.clone();

    thread::spawn(move || {
        let (mut conn, catalog, lyrics) = match open_resources(&config) {
            Ok(resources) => resources,
            Err(e) => {
                error!(error = ?e, "Task worker failed to start");
                let _ = event_tx.send(AppEvent::FatalError(format!("{e:#}")));
                return;
            }
        };

        while let Ok(task) = task_rx.recv() {
            debug!(?task, "Processing task");

            let mut ctx = TaskContext {
                config: &config,
                event_tx: &event_tx,
                conn: &mut conn,
                catalog: &catalog,
                lyrics: &lyrics,
            };

            if let Err(e) = handle_task(task, &mut ctx) {
                warn!(error = ?e, "Task failed");
                let _ = event_tx.send(AppEvent::Notify(Toast::error(user_message(&e))));
            }
        }

        debug!("Task channel closed, stopping worker");
    });
}

fn open_resources(config: &AppConfig) -> Result<(Connection, CatalogClient, LyricsClient)> {
    let conn = db::init_db(&config.database_file).context("Failed to initialise database")?;
    let catalog = CatalogClient::from_config(config).context("Failed to build catalog client")?;
    let lyrics = LyricsClient::from_config(config).context("Failed to build lyrics client")?;
    Ok((conn, catalog, lyrics))
}

/// Bundles shared resources required by task handlers to simplify resource
/// passing when invoking those handler functions.
pub(crate) struct TaskContext<'a> {
    config: &'a AppConfig,
    event_tx: &'a Sender<AppEvent>,
    conn: &'a mut Connection,
    catalog: &'a CatalogClient,
    lyrics: &'a LyricsClient,
}

/// Orchestrates the execution of a single task.
fn handle_task(task: AppTask, ctx: &mut TaskContext) -> Result<()> {
    match task {
        AppTask::ScanLibrary => handlers::scan_library(ctx),
        AppTask::LoadHome => handlers::load_home(ctx),

        AppTask::Search { query, ticket } => handlers::search(ctx, &query, ticket),
        AppTask::Trending { category, ticket } => handlers::trending(ctx, category, ticket),
        AppTask::ResolveStream { request, ticket } => {
            handlers::resolve_stream(ctx, request, ticket)
        }
        AppTask::FetchLyrics { track, ticket } => handlers::fetch_lyrics(ctx, &track, ticket),

        AppTask::RecordPlay(track_id) => handlers::record_play(ctx, &track_id),
        AppTask::CheckFavourite(track_id) => handlers::check_favourite(ctx, &track_id),
        AppTask::ToggleFavourite(track_id) => handlers::toggle_favourite(ctx, &track_id),

        AppTask::LoadPlaylist(id) => handlers::load_playlist(ctx, id),
        AppTask::CreatePlaylist(name) => handlers::create_playlist(ctx, &name),
        AppTask::AddToPlaylist {
            playlist_id,
            track_id,
        } => handlers::add_to_playlist(ctx, playlist_id, &track_id),
        AppTask::DeletePlaylist(id) => handlers::delete_playlist(ctx, id),
    }
}
