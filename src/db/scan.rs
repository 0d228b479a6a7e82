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

//! Media library indexing.
//!
//! This module discovers audio files on the local filesystem and keeps the
//! `library` table in step with them.
//!
//! It utilizes `WalkDir` for directory traversal and `Lofty` for metadata
//! extraction. Track identifiers are an `xxh3` hash of the file path, so a
//! rescan maps each file back onto the same identifier and the play history
//! and favourites recorded against it survive.
//!
//! # Performance
//!
//! Each directory is processed within a single SQLite transaction to
//! maximize write throughput.

use std::{path::Path, sync::mpsc::Sender};

use anyhow::{Context, Result};
use lofty::{prelude::*, probe::Probe};
use rusqlite::Connection;
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use xxhash_rust::xxh3::xxh3_64;

use crate::{
    db::{library_size, upsert_library_track},
    events::{AppEvent, ScanEvent},
    model::Track,
};

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "opus", "m4a", "wav"];

/// How many files to process between progress events.
const PROGRESS_INTERVAL: usize = 25;

/// Derives the stable track identifier for a file path.
pub(crate) fn track_id_for(path: &Path) -> String {
    format!("{:016x}", xxh3_64(path.to_string_lossy().as_bytes()))
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| AUDIO_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Recursively scans each media directory and upserts what it finds.
///
/// Rows are only ever inserted or refreshed, never deleted. Files that
/// cannot be read are skipped with a warning.
///
/// # Returns
///
/// Returns the total number of tracks in the library after the scan.
///
/// # Errors
///
/// Returns an error if a transaction fails or if database constraints are
/// violated during insertion.
pub(crate) fn process_music_library(
    conn: &mut Connection,
    media_dirs: &[String],
    event_tx: &Sender<AppEvent>,
) -> Result<i64> {
    let _ = event_tx.send(AppEvent::Scan(ScanEvent::Started));

    for dir in media_dirs {
        let _ = event_tx.send(AppEvent::Scan(ScanEvent::StartedDirectory(dir.clone())));

        let count = process_directory(conn, Path::new(dir), event_tx)
            .with_context(|| format!("Failed to scan {dir}"))?;

        info!(directory = %dir, count, "Finished scanning directory");
        let _ = event_tx.send(AppEvent::Scan(ScanEvent::ProcessedFiles(count)));
    }

    let total = library_size(conn)?;
    let _ = event_tx.send(AppEvent::Scan(ScanEvent::Finished(total)));

    Ok(total)
}

fn process_directory(conn: &mut Connection, root: &Path, event_tx: &Sender<AppEvent>) -> Result<usize> {
    let tx = conn.transaction()?;
    let mut count = 0;

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_audio_file(e.path()))
    {
        let path = entry.path();
        let Some(uri) = path.to_str() else {
            warn!(path = ?path, "Skipping file with non UTF-8 path");
            continue;
        };

        let (track, duration) = read_track(path, uri);
        upsert_library_track(&tx, &track, duration)?;

        count += 1;
        if count % PROGRESS_INTERVAL == 0 {
            let _ = event_tx.send(AppEvent::Scan(ScanEvent::ProcessedFiles(count)));
        }
    }

    tx.commit().context("Failed to commit transaction")?;

    Ok(count)
}

/// Builds the library entry for a file, falling back to the file name when
/// the tags cannot be read.
fn read_track(path: &Path, uri: &str) -> (Track, Option<u64>) {
    let fallback_name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| uri.to_string());

    let mut track = Track {
        id: track_id_for(path),
        uri: uri.to_string(),
        name: fallback_name,
        artist: None,
        artwork: None,
    };

    let tagged_file = match Probe::open(path).and_then(|p| p.read()) {
        Ok(file) => file,
        Err(e) => {
            debug!(path = ?path, error = %e, "No readable tags");
            return (track, None);
        }
    };

    let duration = tagged_file.properties().duration().as_secs();

    if let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
        if let Some(title) = tag.title().filter(|t| !t.trim().is_empty()) {
            track.name = title.to_string();
        }
        track.artist = tag
            .artist()
            .filter(|a| !a.trim().is_empty())
            .map(|a| a.to_string());
    }

    (track, Some(duration).filter(|d| *d > 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, init_memory_db};
    use std::{fs, sync::mpsc};

    #[test]
    fn track_id_is_stable_per_path() {
        let a = track_id_for(Path::new("/music/a.mp3"));
        assert_eq!(a, track_id_for(Path::new("/music/a.mp3")));
        assert_ne!(a, track_id_for(Path::new("/music/b.mp3")));
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn only_audio_extensions_are_scanned() {
        assert!(is_audio_file(Path::new("song.MP3")));
        assert!(is_audio_file(Path::new("song.flac")));
        assert!(!is_audio_file(Path::new("cover.jpg")));
        assert!(!is_audio_file(Path::new("README")));
    }

    #[test]
    fn rescan_keeps_identifiers_and_history() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("album")).unwrap();
        fs::write(dir.path().join("album").join("Artist - Song.mp3"), b"not really audio").unwrap();
        fs::write(dir.path().join("album").join("cover.jpg"), b"image").unwrap();
        fs::write(dir.path().join("Other.ogg"), b"also not audio").unwrap();

        let mut conn = init_memory_db().unwrap();
        let (tx, rx) = mpsc::channel();
        let dirs = vec![dir.path().to_string_lossy().to_string()];

        assert_eq!(process_music_library(&mut conn, &dirs, &tx).unwrap(), 2);

        let song = db::search_library(&conn, "Song").unwrap();
        assert_eq!(song.len(), 1);
        assert_eq!(song[0].name, "Artist - Song");
        db::record_play(&conn, &song[0].id).unwrap();

        assert_eq!(process_music_library(&mut conn, &dirs, &tx).unwrap(), 2);
        assert_eq!(db::play_count(&conn, &song[0].id).unwrap(), 1);

        let events: Vec<AppEvent> = rx.try_iter().collect();
        assert!(matches!(events.first(), Some(AppEvent::Scan(ScanEvent::Started))));
        assert!(matches!(events.last(), Some(AppEvent::Scan(ScanEvent::Finished(2)))));
    }
}
