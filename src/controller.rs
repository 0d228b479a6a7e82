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

//! Playback and queue control.
//!
//! [`PlaybackController`] owns the loaded [`Sound`], the current track, the
//! queue and the transport state. It lives on the event loop thread, so its
//! methods never overlap and at most one sound is ever loaded: the previous
//! sound is always released before a new one is opened.
//!
//! Persistence writes that follow from playback (play history, favourite
//! checks) and catalog stream resolution are queued as [`AppTask`]s for the
//! task worker. Stream resolutions are tagged with a ticket and only the
//! answer to the most recent request is played.

use std::sync::mpsc::Sender;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::{
    error::PlaybackError,
    model::{
        Direction, PlaybackStatus, RepeatMode, StreamRequest, Track, queue::Queue,
    },
    player::{AudioBackend, PlayerEvent, PlayerEventKind, PlayerState, Sound},
    tasks::AppTask,
};

pub(crate) struct PlaybackController<B: AudioBackend> {
    backend: B,
    sound: Option<B::Sound>,
    current: Option<Track>,
    queue: Queue,
    status: PlaybackStatus,
    shuffle: bool,
    repeat: RepeatMode,
    volume: f64,
    favourite: bool,
    /// Ticket of the most recent stream resolution request.
    resolution: u64,
    task_tx: Sender<AppTask>,
}

impl<B: AudioBackend> PlaybackController<B> {
    pub(crate) fn new(backend: B, task_tx: Sender<AppTask>, volume: f64) -> Self {
        Self {
            backend,
            sound: None,
            current: None,
            queue: Queue::new(),
            status: PlaybackStatus::default(),
            shuffle: false,
            repeat: RepeatMode::Off,
            volume: volume.clamp(0.0, 1.0),
            favourite: false,
            resolution: 0,
            task_tx,
        }
    }

    pub(crate) fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub(crate) fn queue(&self) -> &Queue {
        &self.queue
    }

    pub(crate) fn status(&self) -> &PlaybackStatus {
        &self.status
    }

    pub(crate) fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub(crate) fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub(crate) fn volume(&self) -> f64 {
        self.volume
    }

    pub(crate) fn is_favourite(&self) -> bool {
        self.favourite
    }

    pub(crate) fn is_loaded(&self) -> bool {
        self.sound.is_some()
    }

    /// Plays `track`, replacing the queue.
    ///
    /// The queue index points at the entry with the same resource locator,
    /// or is `None` if there is no such entry. Without a queue the queue is
    /// cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the new resource cannot be opened. The previous
    /// sound has been released by then, so the controller is left stopped
    /// with its track and queue unchanged.
    pub(crate) fn load_and_play(&mut self, track: Track, queue: Option<Vec<Track>>) -> Result<()> {
        self.load(&track)?;

        match queue {
            Some(tracks) => {
                let index = self.queue.replace(tracks, &track.uri);
                debug!(?index, len = self.queue.len(), "Queue replaced");
            }
            None => self.queue.clear(),
        }

        self.now_playing(track)
    }

    /// Plays the internet radio stream on its own.
    pub(crate) fn play_radio(&mut self, url: &str) -> Result<()> {
        self.load_and_play(Track::radio(url), None)
    }

    pub(crate) fn toggle_play_pause(&mut self) -> Result<()> {
        let Some(sound) = self.sound.as_mut() else {
            return Ok(());
        };

        if sound.is_playing() {
            sound.pause()?;
            self.status.is_playing = false;
        } else {
            sound.play()?;
            self.status.is_playing = true;
        }

        Ok(())
    }

    /// Moves through the queue.
    ///
    /// Returns `false` if there was nowhere to go, in which case nothing
    /// changes.
    pub(crate) fn advance(&mut self, direction: Direction) -> Result<bool> {
        let index = match direction {
            Direction::Previous => self.queue.previous_index(),
            Direction::Next => self.queue.next_index(self.shuffle, self.repeat),
        };

        let Some(index) = index else {
            debug!(?direction, "Nowhere to advance to");
            return Ok(false);
        };

        self.play_queue_index(index)?;
        Ok(true)
    }

    /// Handles the end of the loaded resource.
    pub(crate) fn on_playback_finished(&mut self) -> Result<()> {
        if self.repeat == RepeatMode::One {
            if let Some(track) = self.current.clone() {
                self.load(&track)?;
                return self.now_playing(track);
            }
        }

        if !self.advance(Direction::Next)? {
            info!("Reached the end of the queue");
            self.status.is_playing = false;
        }

        Ok(())
    }

    pub(crate) fn seek(&mut self, position_ms: u64) -> Result<()> {
        let Some(sound) = self.sound.as_mut() else {
            return Ok(());
        };

        let position_ms = match self.status.duration_ms {
            Some(duration) => position_ms.min(duration),
            None => position_ms,
        };

        sound.seek(position_ms)?;
        self.status.set_position(position_ms);
        Ok(())
    }

    pub(crate) fn seek_relative(&mut self, delta_ms: i64) -> Result<()> {
        let target = self.status.position_ms.saturating_add_signed(delta_ms);
        self.seek(target)
    }

    /// Sets the volume, clamped to `0.0..=1.0`.
    ///
    /// The level is remembered and applied to every sound opened later.
    pub(crate) fn set_volume(&mut self, volume: f64) -> Result<()> {
        self.volume = volume.clamp(0.0, 1.0);

        if let Some(sound) = self.sound.as_mut() {
            sound.set_volume(self.volume)?;
        }

        Ok(())
    }

    pub(crate) fn adjust_volume(&mut self, delta: f64) -> Result<()> {
        self.set_volume(self.volume + delta)
    }

    pub(crate) fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.shuffle
    }

    pub(crate) fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    pub(crate) fn cycle_repeat_mode(&mut self) -> RepeatMode {
        self.repeat = self.repeat.cycle();
        self.repeat
    }

    /// Asks the task worker to resolve a catalog track, returning the ticket
    /// the answer will carry.
    pub(crate) fn resolve_and_play(&mut self, request: StreamRequest) -> Result<u64> {
        self.resolution += 1;
        let ticket = self.resolution;

        debug!(ticket, id = %request.id, "Requesting stream resolution");

        self.task_tx
            .send(AppTask::ResolveStream { request, ticket })
            .context("Failed to queue stream resolution")?;

        Ok(ticket)
    }

    /// Plays a resolved track, unless a newer resolution has been requested
    /// since. Returns whether the track was played.
    pub(crate) fn on_stream_resolved(&mut self, ticket: u64, track: Track) -> Result<bool> {
        if ticket != self.resolution {
            debug!(ticket, latest = self.resolution, "Dropping superseded stream");
            return Ok(false);
        }

        self.load_and_play(track, None)?;
        Ok(true)
    }

    /// Reports whether a failed resolution belongs to the latest request.
    ///
    /// Playback is left exactly as it was either way.
    pub(crate) fn on_resolution_failed(&self, ticket: u64) -> bool {
        ticket == self.resolution
    }

    /// Applies a status update from the audio worker.
    ///
    /// Updates for any resource other than the loaded one are ignored.
    pub(crate) fn on_player_event(&mut self, event: PlayerEvent) -> Result<()> {
        let Some(sound) = self.sound.as_ref() else {
            return Ok(());
        };
        if sound.id() != event.resource {
            debug!(resource = ?event.resource, "Ignoring event for released resource");
            return Ok(());
        }

        match event.kind {
            PlayerEventKind::Position(position_ms) => self.status.set_position(position_ms),
            PlayerEventKind::Duration(duration_ms) => self.status.set_duration(duration_ms),
            PlayerEventKind::State(state) => self.status.is_playing = state == PlayerState::Playing,
            PlayerEventKind::Finished => self.on_playback_finished()?,
            PlayerEventKind::Failed(reason) => {
                self.status.is_playing = false;
                let uri = self.current.as_ref().map(|t| t.uri.clone()).unwrap_or_default();
                return Err(PlaybackError::Open { uri, reason }.into());
            }
        }

        Ok(())
    }

    /// Asks the task worker to flip the favourite flag of the current track.
    pub(crate) fn toggle_favourite(&self) -> Result<()> {
        let Some(track) = self.current.as_ref().filter(|t| !t.id.is_empty()) else {
            return Ok(());
        };

        self.task_tx
            .send(AppTask::ToggleFavourite(track.id.clone()))
            .context("Failed to queue favourite toggle")
    }

    /// Records the favourite flag reported for a track.
    pub(crate) fn on_favourite_status(&mut self, track_id: &str, favourite: bool) {
        if self.current.as_ref().is_some_and(|t| t.id == track_id) {
            self.favourite = favourite;
        }
    }

    fn play_queue_index(&mut self, index: usize) -> Result<()> {
        let Some(track) = self.queue.get(index).cloned() else {
            return Ok(());
        };

        self.load(&track)?;
        self.queue.select(index);
        self.now_playing(track)
    }

    /// Releases the loaded sound and opens `track` in its place.
    fn load(&mut self, track: &Track) -> Result<()> {
        if let Some(sound) = self.sound.take() {
            if let Err(e) = sound.unload() {
                warn!(error = ?e, "Failed to release previous resource");
            }
        }

        self.status.reset();

        let mut sound = self
            .backend
            .open(&track.uri)
            .with_context(|| format!("Failed to open {}", track.uri))?;

        if let Err(e) = sound.set_volume(self.volume) {
            warn!(error = ?e, "Failed to apply volume");
        }

        info!(uri = %track.uri, name = %track.name, "Now playing");

        self.sound = Some(sound);
        self.status.is_playing = true;
        Ok(())
    }

    /// Makes `track` current and queues the persistence writes for it.
    fn now_playing(&mut self, track: Track) -> Result<()> {
        self.favourite = false;

        let id = track.id.clone();
        self.current = Some(track);

        if !id.is_empty() {
            self.task_tx
                .send(AppTask::RecordPlay(id.clone()))
                .context("Failed to queue play record")?;
            self.task_tx
                .send(AppTask::CheckFavourite(id))
                .context("Failed to queue favourite check")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::ResourceId;
    use std::{
        cell::Cell,
        collections::HashSet,
        rc::Rc,
        sync::mpsc::{self, Receiver},
    };

    struct FakeSound {
        id: ResourceId,
        uri: String,
        playing: bool,
        volume: f64,
        live: Rc<Cell<usize>>,
    }

    impl Sound for FakeSound {
        fn id(&self) -> ResourceId {
            self.id
        }

        fn play(&mut self) -> Result<()> {
            self.playing = true;
            Ok(())
        }

        fn pause(&mut self) -> Result<()> {
            self.playing = false;
            Ok(())
        }

        fn is_playing(&self) -> bool {
            self.playing
        }

        fn seek(&mut self, _position_ms: u64) -> Result<()> {
            Ok(())
        }

        fn set_volume(&mut self, volume: f64) -> Result<()> {
            self.volume = volume;
            Ok(())
        }

        fn unload(self) -> Result<()> {
            self.live.set(self.live.get() - 1);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeBackend {
        live: Rc<Cell<usize>>,
        opened: Vec<String>,
        broken: HashSet<String>,
        next_id: u64,
    }

    impl AudioBackend for FakeBackend {
        type Sound = FakeSound;

        fn open(&mut self, uri: &str) -> Result<FakeSound> {
            if self.broken.contains(uri) {
                return Err(PlaybackError::Open {
                    uri: uri.to_string(),
                    reason: "unsupported format".to_string(),
                }
                .into());
            }

            self.next_id += 1;
            self.opened.push(uri.to_string());
            self.live.set(self.live.get() + 1);

            Ok(FakeSound {
                id: ResourceId(self.next_id),
                uri: uri.to_string(),
                playing: true,
                volume: 1.0,
                live: Rc::clone(&self.live),
            })
        }
    }

    type Controller = PlaybackController<FakeBackend>;

    fn track(n: usize) -> Track {
        Track {
            id: format!("id-{n}"),
            uri: format!("/music/{n}.mp3"),
            name: format!("Track {n}"),
            artist: None,
            artwork: None,
        }
    }

    fn tracks(len: usize) -> Vec<Track> {
        (0..len).map(track).collect()
    }

    fn controller() -> (Controller, Receiver<AppTask>) {
        let (task_tx, task_rx) = mpsc::channel();
        (PlaybackController::new(FakeBackend::default(), task_tx, 0.8), task_rx)
    }

    fn playing_queue(len: usize, index: usize) -> (Controller, Receiver<AppTask>) {
        let (mut controller, task_rx) = controller();
        controller.load_and_play(track(index), Some(tracks(len))).unwrap();
        (controller, task_rx)
    }

    fn loaded_uri(controller: &Controller) -> Option<&str> {
        controller.sound.as_ref().map(|s| s.uri.as_str())
    }

    fn live_sounds(controller: &Controller) -> usize {
        controller.backend.live.get()
    }

    #[test]
    fn switching_tracks_leaves_exactly_one_sound() {
        let (mut controller, _tasks) = controller();

        controller.load_and_play(track(0), None).unwrap();
        assert_eq!(live_sounds(&controller), 1);

        controller.load_and_play(track(1), None).unwrap();
        assert_eq!(live_sounds(&controller), 1);
        assert_eq!(loaded_uri(&controller), Some("/music/1.mp3"));
        assert!(controller.status().is_playing);
    }

    #[test]
    fn load_points_queue_at_track_and_applies_volume() {
        let (controller, _tasks) = playing_queue(4, 2);

        assert_eq!(controller.queue().current_index(), Some(2));
        assert_eq!(controller.current().map(|t| t.name.as_str()), Some("Track 2"));
        assert_eq!(controller.sound.as_ref().map(|s| s.volume), Some(0.8));
    }

    #[test]
    fn load_without_queue_clears_queue() {
        let (mut controller, _tasks) = playing_queue(4, 1);

        controller.load_and_play(track(9), None).unwrap();
        assert!(controller.queue().is_empty());
        assert_eq!(controller.queue().current_index(), None);
    }

    #[test]
    fn load_records_play_and_checks_favourite() {
        let (mut controller, tasks) = controller();
        controller.load_and_play(track(3), None).unwrap();

        let queued: Vec<AppTask> = tasks.try_iter().collect();
        assert!(matches!(&queued[..], [
            AppTask::RecordPlay(a),
            AppTask::CheckFavourite(b),
        ] if a == "id-3" && b == "id-3"));
    }

    #[test]
    fn radio_is_never_recorded() {
        let (mut controller, tasks) = controller();
        controller.play_radio("https://radio.example/live").unwrap();

        assert_eq!(loaded_uri(&controller), Some("https://radio.example/live"));
        assert_eq!(tasks.try_iter().count(), 0);
    }

    #[test]
    fn next_at_end_without_repeat_changes_nothing() {
        let (mut controller, _tasks) = playing_queue(3, 2);

        assert!(!controller.advance(Direction::Next).unwrap());
        assert_eq!(controller.queue().current_index(), Some(2));
        assert_eq!(controller.backend.opened.len(), 1);
    }

    #[test]
    fn finishing_last_track_without_repeat_stops() {
        let (mut controller, _tasks) = playing_queue(3, 2);

        controller.on_playback_finished().unwrap();
        assert!(!controller.status().is_playing);
        assert_eq!(controller.queue().current_index(), Some(2));
    }

    #[test]
    fn next_at_end_with_repeat_all_wraps() {
        let (mut controller, _tasks) = playing_queue(3, 2);
        controller.set_repeat_mode(RepeatMode::All);

        assert!(controller.advance(Direction::Next).unwrap());
        assert_eq!(controller.queue().current_index(), Some(0));
        assert_eq!(loaded_uri(&controller), Some("/music/0.mp3"));
        assert_eq!(live_sounds(&controller), 1);
    }

    #[test]
    fn previous_at_start_is_a_no_op() {
        let (mut controller, _tasks) = playing_queue(3, 0);

        assert!(!controller.advance(Direction::Previous).unwrap());
        assert_eq!(loaded_uri(&controller), Some("/music/0.mp3"));

        controller.advance(Direction::Next).unwrap();
        assert!(controller.advance(Direction::Previous).unwrap());
        assert_eq!(controller.queue().current_index(), Some(0));
    }

    #[test]
    fn shuffle_never_replays_current_track() {
        let (mut controller, _tasks) = playing_queue(5, 0);
        controller.toggle_shuffle();

        for _ in 0..50 {
            let before = controller.queue().current_index();
            assert!(controller.advance(Direction::Next).unwrap());
            assert_ne!(controller.queue().current_index(), before);
            assert_eq!(live_sounds(&controller), 1);
        }
    }

    #[test]
    fn repeat_one_reloads_same_track() {
        let (mut controller, _tasks) = playing_queue(3, 1);
        controller.set_repeat_mode(RepeatMode::One);

        controller.on_playback_finished().unwrap();

        assert_eq!(controller.queue().current_index(), Some(1));
        assert_eq!(controller.backend.opened, vec!["/music/1.mp3", "/music/1.mp3"]);
        assert_eq!(live_sounds(&controller), 1);
        assert!(controller.status().is_playing);
    }

    #[test]
    fn failed_resolution_keeps_current_track_playing() {
        let (mut controller, tasks) = playing_queue(2, 0);
        let _ = tasks.try_iter().count();

        let ticket = controller
            .resolve_and_play(StreamRequest {
                id: "missing".into(),
                name: "Gone".into(),
                artist: None,
                artwork: None,
            })
            .unwrap();

        assert!(matches!(
            tasks.try_recv(),
            Ok(AppTask::ResolveStream { ticket: t, .. }) if t == ticket
        ));
        assert!(controller.on_resolution_failed(ticket));

        assert_eq!(loaded_uri(&controller), Some("/music/0.mp3"));
        assert!(controller.sound.as_ref().is_some_and(|s| s.playing));
        assert!(controller.status().is_playing);
        assert_eq!(controller.queue().len(), 2);
    }

    #[test]
    fn only_latest_resolution_is_played() {
        let (mut controller, _tasks) = controller();
        let request = StreamRequest {
            id: "a".into(),
            name: "A".into(),
            artist: None,
            artwork: None,
        };

        let first = controller.resolve_and_play(request.clone()).unwrap();
        let second = controller.resolve_and_play(request.clone()).unwrap();

        let late = request.clone().into_track("https://cdn/first.mp3".into());
        assert!(!controller.on_stream_resolved(first, late).unwrap());
        assert!(!controller.is_loaded());
        assert!(!controller.on_resolution_failed(first));

        let fresh = request.into_track("https://cdn/second.mp3".into());
        assert!(controller.on_stream_resolved(second, fresh).unwrap());
        assert_eq!(loaded_uri(&controller), Some("https://cdn/second.mp3"));
    }

    #[test]
    fn open_failure_after_release_leaves_controller_stopped() {
        let (mut controller, _tasks) = playing_queue(3, 0);
        controller.backend.broken.insert("/music/1.mp3".to_string());

        assert!(controller.advance(Direction::Next).is_err());

        assert!(!controller.is_loaded());
        assert_eq!(live_sounds(&controller), 0);
        assert!(!controller.status().is_playing);
        assert_eq!(controller.current().map(|t| t.id.as_str()), Some("id-0"));
        assert_eq!(controller.queue().current_index(), Some(0));
    }

    #[test]
    fn toggle_play_pause_flips_transport() {
        let (mut controller, _tasks) = controller();
        controller.toggle_play_pause().unwrap();
        assert!(!controller.status().is_playing);

        controller.load_and_play(track(0), None).unwrap();
        controller.toggle_play_pause().unwrap();
        assert!(!controller.status().is_playing);
        assert!(controller.sound.as_ref().is_some_and(|s| !s.playing));

        controller.toggle_play_pause().unwrap();
        assert!(controller.status().is_playing);
    }

    #[test]
    fn volume_is_clamped_and_remembered() {
        let (mut controller, _tasks) = controller();
        controller.set_volume(1.7).unwrap();
        assert_eq!(controller.volume(), 1.0);

        controller.adjust_volume(-1.5).unwrap();
        assert_eq!(controller.volume(), 0.0);

        controller.set_volume(0.3).unwrap();
        controller.load_and_play(track(0), None).unwrap();
        assert_eq!(controller.sound.as_ref().map(|s| s.volume), Some(0.3));
    }

    #[test]
    fn seek_is_clamped_to_duration() {
        let (mut controller, _tasks) = controller();
        controller.seek(1_000).unwrap();
        assert_eq!(controller.status().position_ms, 0);

        controller.load_and_play(track(0), None).unwrap();
        let resource = controller.sound.as_ref().map(|s| s.id).unwrap();
        controller
            .on_player_event(PlayerEvent { resource, kind: PlayerEventKind::Duration(60_000) })
            .unwrap();

        controller.seek(90_000).unwrap();
        assert_eq!(controller.status().position_ms, 60_000);

        controller.seek_relative(-100_000).unwrap();
        assert_eq!(controller.status().position_ms, 0);
    }

    #[test]
    fn events_for_released_resources_are_ignored() {
        let (mut controller, _tasks) = controller();
        controller.load_and_play(track(0), None).unwrap();
        let stale = controller.sound.as_ref().map(|s| s.id).unwrap();
        controller.load_and_play(track(1), None).unwrap();

        controller
            .on_player_event(PlayerEvent { resource: stale, kind: PlayerEventKind::Position(5_000) })
            .unwrap();
        controller
            .on_player_event(PlayerEvent { resource: stale, kind: PlayerEventKind::Finished })
            .unwrap();

        assert_eq!(controller.status().position_ms, 0);
        assert_eq!(loaded_uri(&controller), Some("/music/1.mp3"));
    }

    #[test]
    fn finished_event_advances_queue() {
        let (mut controller, _tasks) = playing_queue(3, 0);
        let resource = controller.sound.as_ref().map(|s| s.id).unwrap();

        controller
            .on_player_event(PlayerEvent { resource, kind: PlayerEventKind::Finished })
            .unwrap();

        assert_eq!(controller.queue().current_index(), Some(1));
        assert_eq!(loaded_uri(&controller), Some("/music/1.mp3"));
    }

    #[test]
    fn playback_failure_event_is_reported() {
        let (mut controller, _tasks) = controller();
        controller.load_and_play(track(0), None).unwrap();
        let resource = controller.sound.as_ref().map(|s| s.id).unwrap();

        let err = controller
            .on_player_event(PlayerEvent {
                resource,
                kind: PlayerEventKind::Failed("decoder error".into()),
            })
            .unwrap_err();

        assert!(err.downcast_ref::<PlaybackError>().is_some());
        assert!(!controller.status().is_playing);
    }

    #[test]
    fn favourite_status_only_applies_to_current_track() {
        let (mut controller, tasks) = controller();
        controller.load_and_play(track(0), None).unwrap();
        let _ = tasks.try_iter().count();

        controller.on_favourite_status("id-9", true);
        assert!(!controller.is_favourite());

        controller.on_favourite_status("id-0", true);
        assert!(controller.is_favourite());

        controller.toggle_favourite().unwrap();
        assert!(matches!(tasks.try_recv(), Ok(AppTask::ToggleFavourite(id)) if id == "id-0"));
    }

    #[test]
    fn repeat_mode_cycles() {
        let (mut controller, _tasks) = controller();
        assert_eq!(controller.cycle_repeat_mode(), RepeatMode::All);
        assert_eq!(controller.cycle_repeat_mode(), RepeatMode::One);
        assert_eq!(controller.cycle_repeat_mode(), RepeatMode::Off);
        assert!(controller.toggle_shuffle());
        assert!(controller.shuffle());
    }
}
