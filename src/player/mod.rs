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

//! Audio playback.
//!
//! The playback controller talks to audio through the [`AudioBackend`] and
//! [`Sound`] traits. A [`Sound`] is one loaded resource: it is created by
//! [`AudioBackend::open`] and released by [`Sound::unload`], which consumes
//! the handle so it cannot be used after release.
//!
//! [`AudioPlayer`] implements the backend on top of MPV. It does not perform
//! audio processing itself but sends instructions to a background worker
//! thread, so audio operations never block the main application thread.

mod commands;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc::Sender,
};

use anyhow::Result;

use crate::{error::PlaybackError, events::AppEvent, player::commands::AudioPlayerCommand};

/// Represents the current playback status of the audio engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayerState {
    Playing,
    Paused,
    Stopped,
}

/// Identifies one loaded resource.
///
/// Every event coming back from the audio worker carries the identifier of
/// the resource it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ResourceId(pub(crate) u64);

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlayerEventKind {
    Position(u64),
    Duration(u64),
    State(PlayerState),
    Finished,
    Failed(String),
}

/// A status update from the audio worker.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlayerEvent {
    pub(crate) resource: ResourceId,
    pub(crate) kind: PlayerEventKind,
}

/// A loaded, playable audio resource.
pub(crate) trait Sound {
    fn id(&self) -> ResourceId;

    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    fn is_playing(&self) -> bool;

    /// Moves to an absolute position.
    fn seek(&mut self, position_ms: u64) -> Result<()>;

    /// Sets the volume, `0.0` to `1.0`.
    fn set_volume(&mut self, volume: f64) -> Result<()>;

    /// Releases the resource.
    fn unload(self) -> Result<()>;
}

/// Creates [`Sound`]s from resource locators.
pub(crate) trait AudioBackend {
    type Sound: Sound;

    /// Opens `uri` and starts playing it.
    fn open(&mut self, uri: &str) -> Result<Self::Sound>;
}

/// A handle to the MPV audio engine.
pub(crate) struct AudioPlayer {
    /// Channel for sending commands to the background worker thread.
    command_tx: Sender<AudioPlayerCommand>,
    /// Tracks whether the loaded resource is playing, updated by the worker.
    playing: Arc<AtomicBool>,
    next_id: u64,
}

impl AudioPlayer {
    /// Spawns the audio worker thread and returns a new player handle.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - A channel to send playback updates and errors back to
    ///   the main event loop.
    pub(crate) fn new(event_tx: Sender<AppEvent>) -> Self {
        let (command_tx, command_rx) = std::sync::mpsc::channel::<AudioPlayerCommand>();
        let playing = Arc::new(AtomicBool::new(false));

        commands::spawn_player_worker(command_rx, event_tx, Arc::clone(&playing));

        Self {
            command_tx,
            playing,
            next_id: 0,
        }
    }

    // Maps internal audio backend flags to a simplified [`PlayerState`].
    fn player_state(is_paused: bool, is_idle: bool) -> PlayerState {
        if is_idle {
            PlayerState::Stopped
        } else if is_paused {
            PlayerState::Paused
        } else {
            PlayerState::Playing
        }
    }
}

impl AudioBackend for AudioPlayer {
    type Sound = MpvSound;

    fn open(&mut self, uri: &str) -> Result<MpvSound> {
        self.next_id += 1;
        let id = ResourceId(self.next_id);

        self.command_tx
            .send(AudioPlayerCommand::Load {
                id,
                uri: uri.to_string(),
            })
            .map_err(|_| PlaybackError::WorkerGone)?;
        self.playing.store(true, Ordering::Relaxed);

        Ok(MpvSound {
            id,
            command_tx: self.command_tx.clone(),
            playing: Arc::clone(&self.playing),
        })
    }
}

/// The resource currently loaded into MPV.
pub(crate) struct MpvSound {
    id: ResourceId,
    command_tx: Sender<AudioPlayerCommand>,
    playing: Arc<AtomicBool>,
}

impl MpvSound {
    fn send(&self, command: AudioPlayerCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| PlaybackError::WorkerGone)?;
        Ok(())
    }
}

impl Sound for MpvSound {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn play(&mut self) -> Result<()> {
        self.send(AudioPlayerCommand::Play)?;
        self.playing.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.send(AudioPlayerCommand::Pause)?;
        self.playing.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }

    fn seek(&mut self, position_ms: u64) -> Result<()> {
        self.send(AudioPlayerCommand::Seek(position_ms))
    }

    fn set_volume(&mut self, volume: f64) -> Result<()> {
        self.send(AudioPlayerCommand::SetVolume(volume.clamp(0.0, 1.0)))
    }

    fn unload(self) -> Result<()> {
        self.playing.store(false, Ordering::Relaxed);
        self.send(AudioPlayerCommand::Unload(self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_state_prefers_idle_over_pause() {
        assert_eq!(AudioPlayer::player_state(false, true), PlayerState::Stopped);
        assert_eq!(AudioPlayer::player_state(true, true), PlayerState::Stopped);
        assert_eq!(AudioPlayer::player_state(true, false), PlayerState::Paused);
        assert_eq!(AudioPlayer::player_state(false, false), PlayerState::Playing);
    }
}
