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

//! Domain models and core data structures.
//!
//! This module defines the central entities of the application, tracks,
//! playlists and playback settings, along with the entries that populate the
//! track table regardless of whether they came from the local library or the
//! remote catalog.

pub(crate) mod library;
pub(crate) mod queue;
pub(crate) mod search;
pub(crate) mod toast;
pub(crate) mod view;

use crate::catalog::models::{CatalogPlaylist, CatalogTrack, CatalogUser};

/// A playable track.
///
/// Tracks only live for the current session; the persistence layer stores
/// nothing but the identifier in play history and favourites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Track {
    pub(crate) id: String,
    /// Local file path or remote stream URL.
    pub(crate) uri: String,
    pub(crate) name: String,
    pub(crate) artist: Option<String>,
    pub(crate) artwork: Option<String>,
}

impl Track {
    /// A track for the internet radio stream.
    ///
    /// The radio has no identifier, so it never shows up in play history.
    pub(crate) fn radio(uri: &str) -> Self {
        Self {
            id: String::new(),
            uri: uri.to_string(),
            name: "Radio".to_string(),
            artist: None,
            artwork: None,
        }
    }

    pub(crate) fn artist_or_unknown(&self) -> &str {
        self.artist.as_deref().unwrap_or("Unknown artist")
    }
}

/// A request to resolve a catalog track into something playable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StreamRequest {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) artist: Option<String>,
    pub(crate) artwork: Option<String>,
}

impl StreamRequest {
    /// Builds the playable track once the stream URL is known.
    pub(crate) fn into_track(self, uri: String) -> Track {
        Track {
            id: self.id,
            uri,
            name: self.name,
            artist: self.artist,
            artwork: self.artwork,
        }
    }
}

impl From<&CatalogTrack> for StreamRequest {
    fn from(track: &CatalogTrack) -> Self {
        Self {
            id: track.id.clone(),
            name: track.title.clone(),
            artist: Some(track.user.name.clone()),
            artwork: track.artwork.as_ref().and_then(|a| a.medium().map(str::to_string)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum RepeatMode {
    #[default]
    Off,
    One,
    All,
}

impl RepeatMode {
    pub(crate) fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            RepeatMode::Off => "off",
            RepeatMode::One => "one",
            RepeatMode::All => "all",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Previous,
    Next,
}

/// Position, duration and transport flag of the loaded resource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PlaybackStatus {
    pub(crate) position_ms: u64,
    pub(crate) duration_ms: Option<u64>,
    pub(crate) is_playing: bool,
}

impl PlaybackStatus {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Position never runs past a known duration.
    pub(crate) fn set_position(&mut self, position_ms: u64) {
        self.position_ms = match self.duration_ms {
            Some(duration) => position_ms.min(duration),
            None => position_ms,
        };
    }

    pub(crate) fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = Some(duration_ms);
        self.position_ms = self.position_ms.min(duration_ms);
    }

    /// Playback progress in the range `0.0..=1.0`, if the duration is known.
    pub(crate) fn progress(&self) -> Option<f64> {
        match self.duration_ms {
            Some(duration) if duration > 0 => Some(self.position_ms as f64 / duration as f64),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Playlist {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) track_count: i64,
}

/// A row in the track table.
#[derive(Debug, Clone)]
pub(crate) enum Entry {
    Local(Track),
    Remote(CatalogTrack),
    CatalogPlaylist(CatalogPlaylist),
    Artist(CatalogUser),
    Playlist(Playlist),
}

impl Entry {
    pub(crate) fn title(&self) -> &str {
        match self {
            Entry::Local(track) => &track.name,
            Entry::Remote(track) => &track.title,
            Entry::CatalogPlaylist(playlist) => &playlist.playlist_name,
            Entry::Artist(user) => &user.name,
            Entry::Playlist(playlist) => &playlist.name,
        }
    }

    pub(crate) fn subtitle(&self) -> String {
        match self {
            Entry::Local(track) => track.artist_or_unknown().to_string(),
            Entry::Remote(track) => track.user.name.clone(),
            Entry::CatalogPlaylist(_) => "Playlist".to_string(),
            Entry::Artist(user) => format!("@{}", user.handle),
            Entry::Playlist(playlist) => match playlist.track_count {
                1 => format!("#{} · 1 track", playlist.id),
                count => format!("#{} · {count} tracks", playlist.id),
            },
        }
    }

    /// Whether both entries list the same item, whatever their details.
    pub(crate) fn same_item(&self, other: &Entry) -> bool {
        match (self, other) {
            (Entry::Local(a), Entry::Local(b)) => a.id == b.id,
            (Entry::Remote(a), Entry::Remote(b)) => a.id == b.id,
            (Entry::CatalogPlaylist(a), Entry::CatalogPlaylist(b)) => a.id == b.id,
            (Entry::Artist(a), Entry::Artist(b)) => a.id == b.id,
            (Entry::Playlist(a), Entry::Playlist(b)) => a.id == b.id,
            _ => false,
        }
    }

    /// Short tag shown in the first column of the table.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Entry::Local(_) => "local",
            Entry::Remote(_) => "stream",
            Entry::CatalogPlaylist(_) => "list",
            Entry::Artist(_) => "artist",
            Entry::Playlist(_) => "saved",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_mode_cycles_through_all_states() {
        let mode = RepeatMode::default();
        assert_eq!(mode, RepeatMode::Off);
        assert_eq!(mode.cycle(), RepeatMode::All);
        assert_eq!(mode.cycle().cycle(), RepeatMode::One);
        assert_eq!(mode.cycle().cycle().cycle(), RepeatMode::Off);
    }

    #[test]
    fn position_is_clamped_to_known_duration() {
        let mut status = PlaybackStatus::default();
        status.set_position(5_000);
        assert_eq!(status.position_ms, 5_000);

        status.set_duration(3_000);
        assert_eq!(status.position_ms, 3_000);

        status.set_position(9_000);
        assert_eq!(status.position_ms, 3_000);
        assert_eq!(status.progress(), Some(1.0));
    }

    #[test]
    fn reset_clears_everything() {
        let mut status = PlaybackStatus {
            position_ms: 10,
            duration_ms: Some(20),
            is_playing: true,
        };
        status.reset();
        assert_eq!(status, PlaybackStatus::default());
        assert_eq!(status.progress(), None);
    }

    #[test]
    fn stored_playlist_shows_its_id() {
        let mut playlist = Playlist {
            id: 3,
            name: "Road trip".into(),
            track_count: 5,
        };
        assert_eq!(Entry::Playlist(playlist.clone()).subtitle(), "#3 · 5 tracks");

        playlist.track_count = 1;
        assert_eq!(Entry::Playlist(playlist).subtitle(), "#3 · 1 track");
    }

    #[test]
    fn radio_track_has_no_identifier() {
        let track = Track::radio("https://radio.example/stream");
        assert!(track.id.is_empty());
        assert_eq!(track.uri, "https://radio.example/stream");
        assert_eq!(track.artist_or_unknown(), "Unknown artist");
    }
}
