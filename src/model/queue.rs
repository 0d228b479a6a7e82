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

//! Playback queue management.
//!
//! This module provides state for the player queue: an ordered list of
//! tracks with a pointer to the one currently playing. The queue is replaced
//! wholesale whenever a new playback context starts, and it decides which
//! index comes next according to the shuffle flag and repeat mode.

use rand::{rng, seq::IndexedRandom};

use crate::model::{RepeatMode, Track};

#[derive(Debug, Default)]
pub(crate) struct Queue {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl Queue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Replaces the queue, pointing the index at the track whose resource
    /// locator matches `uri`.
    ///
    /// Returns the new index, which is `None` if the track is not part of the
    /// queue.
    pub(crate) fn replace(&mut self, tracks: Vec<Track>, uri: &str) -> Option<usize> {
        self.current = tracks.iter().position(|t| t.uri == uri);
        self.tracks = tracks;
        self.current
    }

    /// Points the index at an existing entry. Out of range indices are
    /// ignored.
    pub(crate) fn select(&mut self, index: usize) {
        if index < self.tracks.len() {
            self.current = Some(index);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.tracks.clear();
        self.current = None;
    }

    pub(crate) fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub(crate) fn len(&self) -> usize {
        self.tracks.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub(crate) fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// The index `advance(previous)` should play, if any.
    pub(crate) fn previous_index(&self) -> Option<usize> {
        match self.current {
            Some(idx) if idx > 0 && idx <= self.tracks.len() => Some(idx - 1),
            _ => None,
        }
    }

    /// The index `advance(next)` should play, if any.
    ///
    /// With shuffle enabled a random entry other than the current one is
    /// picked. Otherwise the queue moves forward by one, wrapping to the
    /// start only under [`RepeatMode::All`].
    pub(crate) fn next_index(&self, shuffle: bool, repeat: RepeatMode) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }

        if shuffle {
            let candidates: Vec<usize> = (0..self.tracks.len())
                .filter(|idx| Some(*idx) != self.current)
                .collect();
            return candidates.choose(&mut rng()).copied();
        }

        let next_idx = self.current.map_or(0, |idx| idx + 1);
        if next_idx < self.tracks.len() {
            Some(next_idx)
        } else if repeat == RepeatMode::All {
            Some(0)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(n: usize) -> Track {
        Track {
            id: format!("id-{n}"),
            uri: format!("/music/{n}.mp3"),
            name: format!("Track {n}"),
            artist: None,
            artwork: None,
        }
    }

    fn queue_of(len: usize, current: usize) -> Queue {
        let mut queue = Queue::new();
        let tracks: Vec<Track> = (0..len).map(track).collect();
        let uri = tracks[current].uri.clone();
        queue.replace(tracks, &uri);
        queue
    }

    #[test]
    fn replace_points_index_at_matching_uri() {
        let mut queue = Queue::new();
        let idx = queue.replace((0..3).map(track).collect(), "/music/2.mp3");
        assert_eq!(idx, Some(2));
        assert_eq!(queue.current_index(), Some(2));
    }

    #[test]
    fn replace_without_match_has_no_index() {
        let mut queue = Queue::new();
        let idx = queue.replace((0..3).map(track).collect(), "https://elsewhere");
        assert_eq!(idx, None);
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn previous_is_none_at_start() {
        assert_eq!(queue_of(3, 0).previous_index(), None);
        assert_eq!(queue_of(3, 2).previous_index(), Some(1));
        assert_eq!(Queue::new().previous_index(), None);
    }

    #[test]
    fn next_stops_at_end_without_repeat() {
        let queue = queue_of(3, 2);
        assert_eq!(queue.next_index(false, RepeatMode::Off), None);
        assert_eq!(queue.next_index(false, RepeatMode::One), None);
    }

    #[test]
    fn next_wraps_at_end_with_repeat_all() {
        assert_eq!(queue_of(3, 2).next_index(false, RepeatMode::All), Some(0));
        assert_eq!(queue_of(3, 0).next_index(false, RepeatMode::All), Some(1));
    }

    #[test]
    fn next_on_empty_queue_is_none() {
        assert_eq!(Queue::new().next_index(true, RepeatMode::All), None);
    }

    #[test]
    fn shuffle_never_picks_current_track() {
        let queue = queue_of(4, 1);
        for _ in 0..200 {
            let idx = queue.next_index(true, RepeatMode::Off).unwrap();
            assert_ne!(idx, 1);
            assert!(idx < 4);
        }
    }

    #[test]
    fn shuffle_with_single_current_track_has_nowhere_to_go() {
        assert_eq!(queue_of(1, 0).next_index(true, RepeatMode::All), None);
    }
}
