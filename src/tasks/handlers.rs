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

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::{
    catalog::{TrendingCategory, lyrics::lyrics_query},
    db::{self, PlaylistAddition, scan},
    error::user_message,
    events::AppEvent,
    model::{
        StreamRequest, Track,
        library::{Home, HomeUpdate},
        search::SearchResults,
        toast::Toast,
    },
    tasks::TaskContext,
};

const RECENT_LIMIT: usize = 50;
const SUGGESTION_LIMIT: usize = 25;

pub(super) fn scan_library(ctx: &mut TaskContext) -> Result<()> {
    if ctx.config.media_dirs.is_empty() {
        ctx.event_tx.send(AppEvent::Notify(Toast::info(
            "No media directories configured",
        )))?;
        return Ok(());
    }

    let total = scan::process_music_library(ctx.conn, &ctx.config.media_dirs, ctx.event_tx)?;
    info!(total, "Library scan finished");

    ctx.event_tx
        .send(AppEvent::Notify(Toast::success(format!("Library: {total} tracks"))))?;

    load_home(ctx)
}

pub(super) fn load_home(ctx: &mut TaskContext) -> Result<()> {
    let home = Home {
        recent: db::fetch_recent_tracks(ctx.conn, RECENT_LIMIT)?,
        favourites: db::fetch_favourite_tracks(ctx.conn)?,
        suggestions: db::fetch_random_tracks(ctx.conn, SUGGESTION_LIMIT)?,
        playlists: db::fetch_playlists(ctx.conn)?,
    };

    ctx.event_tx.send(AppEvent::HomeLoaded(home))?;

    Ok(())
}

/// Searches the library and the catalog.
///
/// The search only fails as a whole when the library cannot be read. A
/// catalog failure still delivers the local matches.
pub(super) fn search(ctx: &mut TaskContext, query: &str, ticket: u64) -> Result<()> {
    let event = match db::search_library(ctx.conn, query) {
        Ok(local) => {
            let (remote, catalog_error) = match ctx.catalog.search_tracks(query) {
                Ok(remote) => (remote, None),
                Err(e) => {
                    warn!(error = ?e, query, "Catalog search failed");
                    (vec![], Some(e.user_message().to_string()))
                }
            };
            AppEvent::SearchResults {
                ticket,
                results: SearchResults { local, remote },
                catalog_error,
            }
        }
        Err(e) => {
            warn!(error = ?e, query, "Library search failed");
            AppEvent::SearchFailed {
                ticket,
                message: user_message(&e).to_string(),
            }
        }
    };

    ctx.event_tx.send(event)?;

    Ok(())
}

pub(super) fn trending(ctx: &mut TaskContext, category: TrendingCategory, ticket: u64) -> Result<()> {
    let event = match ctx.catalog.trending(category) {
        Ok(items) => AppEvent::TrendingLoaded { ticket, items },
        Err(e) => {
            warn!(error = ?e, ?category, "Trending request failed");
            AppEvent::TrendingFailed {
                ticket,
                message: e.user_message().to_string(),
            }
        }
    };

    ctx.event_tx.send(event)?;

    Ok(())
}

pub(super) fn resolve_stream(ctx: &mut TaskContext, request: StreamRequest, ticket: u64) -> Result<()> {
    let event = match ctx.catalog.resolve_stream_url(&request.id) {
        Ok(uri) => AppEvent::StreamResolved {
            ticket,
            track: request.into_track(uri),
        },
        Err(e) => {
            warn!(error = ?e, id = %request.id, "Stream resolution failed");
            AppEvent::StreamFailed {
                ticket,
                message: e.user_message().to_string(),
            }
        }
    };

    ctx.event_tx.send(event)?;

    Ok(())
}

pub(super) fn fetch_lyrics(ctx: &mut TaskContext, track: &Track, ticket: u64) -> Result<()> {
    let (artist, title) = lyrics_query(track);

    let event = match ctx.lyrics.fetch(&artist, &title) {
        Ok(lyrics) => AppEvent::LyricsLoaded { ticket, lyrics },
        Err(e) => {
            warn!(error = ?e, %artist, %title, "Lyrics lookup failed");
            AppEvent::LyricsFailed {
                ticket,
                message: e.user_message().to_string(),
            }
        }
    };

    ctx.event_tx.send(event)?;

    Ok(())
}

pub(super) fn record_play(ctx: &mut TaskContext, track_id: &str) -> Result<()> {
    db::record_play(ctx.conn, track_id).context("Failed to record play")?;
    let plays = db::play_count(ctx.conn, track_id)?;
    debug!(track_id, plays, "Recorded play");

    ctx.event_tx.send(AppEvent::HomeUpdated(HomeUpdate {
        recent: Some(db::fetch_recent_tracks(ctx.conn, RECENT_LIMIT)?),
        ..HomeUpdate::default()
    }))?;

    Ok(())
}

pub(super) fn check_favourite(ctx: &mut TaskContext, track_id: &str) -> Result<()> {
    let favourite = db::is_favourite(ctx.conn, track_id)?;
    ctx.event_tx.send(AppEvent::FavouriteStatus {
        track_id: track_id.to_string(),
        favourite,
    })?;

    Ok(())
}

pub(super) fn toggle_favourite(ctx: &mut TaskContext, track_id: &str) -> Result<()> {
    let favourite = db::toggle_favourite(ctx.conn, track_id).context("Failed to update favourites")?;

    ctx.event_tx.send(AppEvent::FavouriteStatus {
        track_id: track_id.to_string(),
        favourite,
    })?;

    let message = if favourite {
        "Added to favourites"
    } else {
        "Removed from favourites"
    };
    ctx.event_tx.send(AppEvent::Notify(Toast::success(message)))?;

    ctx.event_tx.send(AppEvent::HomeUpdated(HomeUpdate {
        favourites: Some(db::fetch_favourite_tracks(ctx.conn)?),
        ..HomeUpdate::default()
    }))?;

    Ok(())
}

pub(super) fn load_playlist(ctx: &mut TaskContext, playlist_id: i64) -> Result<()> {
    let tracks = db::fetch_playlist_tracks(ctx.conn, playlist_id)?;
    ctx.event_tx.send(AppEvent::PlaylistLoaded {
        id: playlist_id,
        tracks,
    })?;

    Ok(())
}

pub(super) fn create_playlist(ctx: &mut TaskContext, name: &str) -> Result<()> {
    let id = db::create_playlist(ctx.conn, name)?;
    info!(id, name, "Created playlist");

    ctx.event_tx
        .send(AppEvent::Notify(Toast::success(format!("Created playlist {name}"))))?;

    reload_playlists(ctx)
}

pub(super) fn add_to_playlist(ctx: &mut TaskContext, playlist_id: i64, track_id: &str) -> Result<()> {
    let toast = match db::add_to_playlist(ctx.conn, playlist_id, track_id)? {
        PlaylistAddition::Added => Toast::success("Added to playlist"),
        PlaylistAddition::AlreadyPresent => Toast::info("Already in playlist"),
        PlaylistAddition::NoSuchPlaylist => Toast::info("No such playlist"),
        PlaylistAddition::NotInLibrary => Toast::info("Only library tracks can be added to playlists"),
    };

    ctx.event_tx.send(AppEvent::Notify(toast))?;

    reload_playlists(ctx)
}

pub(super) fn delete_playlist(ctx: &mut TaskContext, playlist_id: i64) -> Result<()> {
    let toast = if db::delete_playlist(ctx.conn, playlist_id)? {
        Toast::success("Playlist deleted")
    } else {
        Toast::info("No such playlist")
    };

    ctx.event_tx.send(AppEvent::Notify(toast))?;

    reload_playlists(ctx)
}

fn reload_playlists(ctx: &mut TaskContext) -> Result<()> {
    ctx.event_tx.send(AppEvent::HomeUpdated(HomeUpdate {
        playlists: Some(db::fetch_playlists(ctx.conn)?),
        ..HomeUpdate::default()
    }))?;

    Ok(())
}
