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

//! Data access layer.
//!
//! This module handles all interactions with the SQLite database: the
//! scanned local library, play history, favourites and playlists.
//!
//! # Tables
//!
//! * `library` - Local audio files with their display metadata.
//! * `recent_plays` - Play count and last play time per track identifier.
//! * `favourites` - The set of favourite track identifiers.
//! * `playlists` - Named playlists.
//! * `playlist_tracks` - Ordered playlist membership.
//!
//! History and favourites only ever store a track identifier. Listings are
//! produced by joining against `library`, so a remote track can be counted
//! without being listed.
//!
//! # Performance
//!
//! Most functions in this module use [`rusqlite::Connection::prepare_cached`]
//! to reduce SQL parsing overhead.

mod model;
pub(crate) mod scan;

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use crate::model::{Playlist, Track};

const MIN_SEARCH_LEN: usize = 2;

const TRACK_COLUMNS: &str = "lib.id, lib.uri, lib.name, lib.artist, lib.artwork";

/// Opens a connection to the SQLite database and configures performance settings.
///
/// This function performs the following setup:
/// * **WAL Mode**: Enables Write-Ahead Logging for better concurrency.
/// * **Performance Tuning**: Sets synchronous mode to `NORMAL` and increases the cache size.
/// * **Constraints**: Enforces foreign key integrity.
/// * **Schema**: Executes [`create_schema`] to ensure all tables and indices exist.
///
/// # Errors
///
/// Returns an error if the database file cannot be opened, if the initial
/// PRAGMA configuration fails or if the schema cannot be created.
pub(crate) fn init_db(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database {path}"))?;

    let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
    if journal_mode != "wal" {
        anyhow::bail!(
            "Failed to switch to WAL mode. Current mode: {}",
            journal_mode
        );
    }

    configure(&conn)?;

    Ok(conn)
}

/// Opens a private in-memory database with the full schema.
///
/// WAL is not available for in-memory databases, so it is skipped.
#[cfg(test)]
pub(crate) fn init_memory_db() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    Ok(conn)
}

fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA cache_size = -64000; -- Use 64MB of RAM for cache
    ",
    )?;

    conn.set_prepared_statement_cache_capacity(100);

    create_schema(conn)
}

/// Create the database schema.
///
/// Every table is created only if it does not already exist, inside a single
/// transaction so the schema is updated atomically. Deleting a playlist
/// removes its membership rows via `ON DELETE CASCADE`.
fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS library (
            id TEXT PRIMARY KEY,
            uri TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL COLLATE NOCASE,
            artist TEXT COLLATE NOCASE,
            artwork TEXT,
            duration INTEGER
        );

        CREATE TABLE IF NOT EXISTS recent_plays (
            track_id TEXT PRIMARY KEY,
            play_count INTEGER NOT NULL DEFAULT 0,
            last_played INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_recent_plays_last_played ON recent_plays (last_played);

        CREATE TABLE IF NOT EXISTS favourites (
            track_id TEXT PRIMARY KEY,
            added_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS playlists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL COLLATE NOCASE UNIQUE
        );

        CREATE TABLE IF NOT EXISTS playlist_tracks (
            playlist_id INTEGER NOT NULL,
            track_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            PRIMARY KEY (playlist_id, track_id),
            FOREIGN KEY (playlist_id) REFERENCES playlists (id) ON DELETE CASCADE
        );

        COMMIT;",
    )
    .context("Failed to create schema")
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

/// Records a play of the track: increments the play count if the track has
/// been played before, inserts it otherwise.
pub(crate) fn record_play(conn: &Connection, track_id: &str) -> Result<()> {
    record_play_at(conn, track_id, now_millis())
}

fn record_play_at(conn: &Connection, track_id: &str, played_at: i64) -> Result<()> {
    let sql = "
        INSERT INTO recent_plays (track_id, play_count, last_played)
        VALUES (?1, 1, ?2)
        ON CONFLICT (track_id)
        DO UPDATE SET play_count = play_count + 1, last_played = ?2";

    let mut stmt = conn.prepare_cached(sql)?;
    stmt.execute(params![track_id, played_at])?;

    Ok(())
}

pub(crate) fn play_count(conn: &Connection, track_id: &str) -> Result<i64> {
    let mut stmt = conn.prepare_cached("SELECT play_count FROM recent_plays WHERE track_id = ?")?;
    let count = stmt
        .query_row([track_id], |row| row.get(0))
        .optional()?
        .unwrap_or(0);

    Ok(count)
}

pub(crate) fn add_favourite(conn: &Connection, track_id: &str) -> Result<()> {
    let mut stmt = conn
        .prepare_cached("INSERT OR IGNORE INTO favourites (track_id, added_at) VALUES (?, ?)")?;
    stmt.execute(params![track_id, now_millis()])?;
    Ok(())
}

pub(crate) fn remove_favourite(conn: &Connection, track_id: &str) -> Result<()> {
    let mut stmt = conn.prepare_cached("DELETE FROM favourites WHERE track_id = ?")?;
    stmt.execute([track_id])?;
    Ok(())
}

pub(crate) fn is_favourite(conn: &Connection, track_id: &str) -> Result<bool> {
    let mut stmt = conn.prepare_cached("SELECT EXISTS (SELECT 1 FROM favourites WHERE track_id = ?)")?;
    let exists = stmt.query_row([track_id], |row| row.get(0))?;
    Ok(exists)
}

/// Flips favourite membership, returning the new state.
pub(crate) fn toggle_favourite(conn: &Connection, track_id: &str) -> Result<bool> {
    if is_favourite(conn, track_id)? {
        remove_favourite(conn, track_id)?;
        Ok(false)
    } else {
        add_favourite(conn, track_id)?;
        Ok(true)
    }
}

/// Fetches the most recently played library tracks, newest first.
pub(crate) fn fetch_recent_tracks(conn: &Connection, limit: usize) -> Result<Vec<Track>> {
    let sql = format!(
        "SELECT {TRACK_COLUMNS}
         FROM recent_plays rp
         JOIN library lib ON lib.id = rp.track_id
         ORDER BY rp.last_played DESC, rp.play_count DESC
         LIMIT ?"
    );

    let mut stmt = conn.prepare_cached(&sql)?;
    let results = stmt
        .query_map([limit as i64], Track::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(results)
}

pub(crate) fn fetch_favourite_tracks(conn: &Connection) -> Result<Vec<Track>> {
    let sql = format!(
        "SELECT {TRACK_COLUMNS}
         FROM favourites fav
         JOIN library lib ON lib.id = fav.track_id
         ORDER BY fav.added_at DESC, lib.name"
    );

    let mut stmt = conn.prepare_cached(&sql)?;
    let results = stmt
        .query_map([], Track::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(results)
}

/// Picks a random selection of library tracks for the suggestions view.
pub(crate) fn fetch_random_tracks(conn: &Connection, limit: usize) -> Result<Vec<Track>> {
    let sql = format!("SELECT {TRACK_COLUMNS} FROM library lib ORDER BY RANDOM() LIMIT ?");

    let mut stmt = conn.prepare_cached(&sql)?;
    let results = stmt
        .query_map([limit as i64], Track::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(results)
}

/// Lists playlists with the number of their tracks present in the library.
pub(crate) fn fetch_playlists(conn: &Connection) -> Result<Vec<Playlist>> {
    let sql = "
        SELECT pl.id, pl.name, COUNT(lib.id)
        FROM playlists pl
        LEFT JOIN playlist_tracks pt ON pt.playlist_id = pl.id
        LEFT JOIN library lib ON lib.id = pt.track_id
        GROUP BY pl.id
        ORDER BY pl.name";

    let mut stmt = conn.prepare_cached(sql)?;
    let results = stmt
        .query_map([], Playlist::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(results)
}

/// Creates a playlist, returning its identifier.
///
/// # Errors
///
/// Fails if a playlist with the same name (ignoring case) already exists.
pub(crate) fn create_playlist(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare_cached("INSERT INTO playlists (name) VALUES (?)")?;
    stmt.execute([name.trim()])
        .with_context(|| format!("Failed to create playlist {name}"))?;
    Ok(conn.last_insert_rowid())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlaylistAddition {
    Added,
    AlreadyPresent,
    NoSuchPlaylist,
    /// Only library tracks can be listed in a playlist.
    NotInLibrary,
}

/// Appends a library track to the end of a playlist.
///
/// Adding a track that is already a member does nothing.
pub(crate) fn add_to_playlist(
    conn: &Connection,
    playlist_id: i64,
    track_id: &str,
) -> Result<PlaylistAddition> {
    if !exists(conn, "SELECT 1 FROM playlists WHERE id = ?", &playlist_id)? {
        return Ok(PlaylistAddition::NoSuchPlaylist);
    }
    if !exists(conn, "SELECT 1 FROM library WHERE id = ?", &track_id)? {
        return Ok(PlaylistAddition::NotInLibrary);
    }

    let sql = "
        INSERT OR IGNORE INTO playlist_tracks (playlist_id, track_id, position)
        VALUES (
            ?1,
            ?2,
            (SELECT COALESCE(MAX(position), -1) + 1 FROM playlist_tracks WHERE playlist_id = ?1)
        )";

    let mut stmt = conn.prepare_cached(sql)?;
    let inserted = stmt.execute(params![playlist_id, track_id])?;

    Ok(if inserted > 0 {
        PlaylistAddition::Added
    } else {
        PlaylistAddition::AlreadyPresent
    })
}

fn exists(conn: &Connection, sql: &str, key: &dyn rusqlite::ToSql) -> Result<bool> {
    let mut stmt = conn.prepare_cached(sql)?;
    Ok(stmt.exists([key])?)
}

pub(crate) fn fetch_playlist_tracks(conn: &Connection, playlist_id: i64) -> Result<Vec<Track>> {
    let sql = format!(
        "SELECT {TRACK_COLUMNS}
         FROM playlist_tracks pt
         JOIN library lib ON lib.id = pt.track_id
         WHERE pt.playlist_id = ?
         ORDER BY pt.position"
    );

    let mut stmt = conn.prepare_cached(&sql)?;
    let results = stmt
        .query_map([playlist_id], Track::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(results)
}

/// Deletes a playlist and its membership rows. Returns whether it existed.
pub(crate) fn delete_playlist(conn: &Connection, playlist_id: i64) -> Result<bool> {
    let mut stmt = conn.prepare_cached("DELETE FROM playlists WHERE id = ?")?;
    let deleted = stmt.execute([playlist_id])?;
    Ok(deleted > 0)
}

/// Finds library tracks whose name or artist contains the query.
///
/// Queries shorter than two characters match nothing.
pub(crate) fn search_library(conn: &Connection, query: &str) -> Result<Vec<Track>> {
    let query = query.trim();
    if query.chars().count() < MIN_SEARCH_LEN {
        return Ok(vec![]);
    }

    let sql = format!(
        "SELECT {TRACK_COLUMNS}
         FROM library lib
         WHERE lib.name LIKE ?1 ESCAPE '\\' OR lib.artist LIKE ?1 ESCAPE '\\'
         ORDER BY lib.artist, lib.name"
    );

    let pattern = format!("%{}%", escape_like(query));
    let mut stmt = conn.prepare_cached(&sql)?;
    let results = stmt
        .query_map([pattern], Track::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(results)
}

/// Escapes the `LIKE` wildcards in `text` with a backslash.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Inserts a library track or refreshes the metadata of an existing one.
pub(crate) fn upsert_library_track(
    conn: &Connection,
    track: &Track,
    duration_secs: Option<u64>,
) -> Result<()> {
    let sql = "
        INSERT INTO library (id, uri, name, artist, artwork, duration)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT (id)
        DO UPDATE SET uri = ?2, name = ?3, artist = ?4, artwork = ?5, duration = ?6";

    let mut stmt = conn.prepare_cached(sql)?;
    stmt.execute(params![
        track.id,
        track.uri,
        track.name,
        track.artist,
        track.artwork,
        duration_secs.map(|d| d as i64),
    ])?;

    Ok(())
}

pub(crate) fn library_size(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM library", [], |row| row.get(0))?;
    Ok(count)
}
