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

//! Local library state.
//!
//! This module provides state for the home listings loaded from the local
//! store (recent plays, favourites, suggestions and playlists) and for the
//! progress of a library scan.

use crate::model::{Playlist, Track};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanStatus {
    Idle,
    Scanning,
    Finished,
}

pub(crate) struct DirectoryStatus {
    pub(crate) name: String,
    pub(crate) count: usize,
}

pub(crate) struct LibraryScan {
    pub(crate) status: ScanStatus,
    pub(crate) directories: Vec<DirectoryStatus>,
    pub(crate) total: i64,
}

impl LibraryScan {
    pub(crate) fn new() -> Self {
        Self {
            status: ScanStatus::Idle,
            directories: vec![],
            total: 0,
        }
    }

    pub(crate) fn start(&mut self) {
        self.status = ScanStatus::Scanning;
        self.directories.clear();
        self.total = 0;
    }

    pub(crate) fn begin_directory(&mut self, directory: &str) {
        self.directories.push(DirectoryStatus {
            name: directory.to_string(),
            count: 0,
        });
    }

    pub(crate) fn update_directory(&mut self, count: usize) {
        if let Some(status) = self.directories.last_mut() {
            status.count = count;
        }
    }

    pub(crate) fn finish(&mut self, total: i64) {
        self.status = ScanStatus::Finished;
        self.total = total;
    }

    /// One-line summary for the status bar.
    pub(crate) fn summary(&self) -> Option<String> {
        match self.status {
            ScanStatus::Idle => None,
            ScanStatus::Scanning => {
                let files: usize = self.directories.iter().map(|d| d.count).sum();
                let current = self.directories.last().map(|d| d.name.as_str()).unwrap_or("");
                Some(format!("Scanning {current} ({files} files)"))
            }
            ScanStatus::Finished => Some(format!("Library: {} tracks", self.total)),
        }
    }
}

/// Listings shown on the home views.
#[derive(Debug, Default)]
pub(crate) struct Home {
    pub(crate) recent: Vec<Track>,
    pub(crate) favourites: Vec<Track>,
    pub(crate) suggestions: Vec<Track>,
    pub(crate) playlists: Vec<Playlist>,
}

impl Home {
    /// Replaces the listings carried by `update`, leaving the others alone.
    pub(crate) fn apply(&mut self, update: HomeUpdate) {
        if let Some(recent) = update.recent {
            self.recent = recent;
        }
        if let Some(favourites) = update.favourites {
            self.favourites = favourites;
        }
        if let Some(playlists) = update.playlists {
            self.playlists = playlists;
        }
    }
}

/// A partial refresh of the home listings.
///
/// Suggestions are only drawn on a full load, so they stay put while the
/// user works through them.
#[derive(Debug, Default)]
pub(crate) struct HomeUpdate {
    pub(crate) recent: Option<Vec<Track>>,
    pub(crate) favourites: Option<Vec<Track>>,
    pub(crate) playlists: Option<Vec<Playlist>>,
}

/// The stored playlist currently opened.
#[derive(Debug, Default)]
pub(crate) struct OpenPlaylist {
    pub(crate) id: Option<i64>,
    pub(crate) tracks: Vec<Track>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_summary_follows_progress() {
        let mut scan = LibraryScan::new();
        assert_eq!(scan.summary(), None);

        scan.start();
        scan.begin_directory("/music");
        scan.update_directory(12);
        assert_eq!(scan.summary().as_deref(), Some("Scanning /music (12 files)"));

        scan.finish(12);
        assert_eq!(scan.summary().as_deref(), Some("Library: 12 tracks"));
    }

    fn track(id: &str) -> Track {
        Track {
            id: id.into(),
            uri: format!("/music/{id}.mp3"),
            name: id.into(),
            artist: None,
            artwork: None,
        }
    }

    #[test]
    fn partial_update_keeps_suggestions() {
        let mut home = Home {
            recent: vec![track("a")],
            favourites: vec![track("f")],
            suggestions: vec![track("s1"), track("s2")],
            playlists: vec![],
        };

        home.apply(HomeUpdate {
            recent: Some(vec![track("b"), track("a")]),
            ..HomeUpdate::default()
        });

        assert_eq!(home.recent, vec![track("b"), track("a")]);
        assert_eq!(home.favourites, vec![track("f")]);
        assert_eq!(home.suggestions, vec![track("s1"), track("s2")]);
    }
}
