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

//! MPV-backed audio playback engine and event processing.
//!
//! This module manages a background worker thread that bridges the
//! application's command-based interface and the MPV property observation
//! system.
//!
//! # Architecture
//!
//! The engine operates using a dual-channel communication pattern:
//! 1. **Command Channel**: Receives [`AudioPlayerCommand`]s from
//!    [`MpvSound`](super::MpvSound) handles.
//! 2. **Event Channel**: Broadcasts [`PlayerEvent`]s, tagged with the
//!    resource whose file MPV had started when it reported them.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, Sender, TryRecvError},
    },
    thread,
};

use anyhow::{Context, Result};
use mpv::Format;
use tracing::{debug, error, warn};

use crate::{
    events::AppEvent,
    player::{AudioPlayer, PlayerEvent, PlayerEventKind, PlayerState, ResourceId},
};

#[derive(Debug)]
pub(crate) enum AudioPlayerCommand {
    Load { id: ResourceId, uri: String },
    Play,
    Pause,
    /// Absolute position in milliseconds.
    Seek(u64),
    SetVolume(f64),
    Unload(ResourceId),
}

/// Decides which resource an MPV event belongs to.
///
/// MPV queues events asynchronously, so after a load the queue may still hold
/// events for the previous file. A loaded resource only owns events once MPV
/// has reported the start of every file requested so far.
#[derive(Debug, Default)]
struct ResourceGate {
    active: Option<ResourceId>,
    pending: Option<ResourceId>,
    starts_due: usize,
}

impl ResourceGate {
    fn load(&mut self, id: ResourceId) {
        self.active = None;
        self.pending = Some(id);
        self.starts_due += 1;
    }

    /// MPV discards a requested file that has not started yet when stopped.
    fn unload(&mut self, id: ResourceId) {
        if self.active == Some(id) {
            self.active = None;
        }
        if self.pending == Some(id) {
            self.pending = None;
        }
        self.starts_due = 0;
    }

    fn file_started(&mut self) {
        self.starts_due = self.starts_due.saturating_sub(1);
        if self.starts_due == 0 {
            if let Some(id) = self.pending.take() {
                self.active = Some(id);
            }
        }
    }

    /// The resource events are currently attributed to.
    fn owner(&self) -> Option<ResourceId> {
        self.active
    }

    /// The resource a failed command is reported against.
    fn command_target(&self) -> Option<ResourceId> {
        self.active.or(self.pending)
    }

    fn tag(&self, kind: PlayerEventKind) -> Option<PlayerEvent> {
        self.owner().map(|resource| PlayerEvent { resource, kind })
    }
}

/// Mutable state of the worker loop.
struct WorkerState {
    gate: ResourceGate,
    is_paused: bool,
    is_idle: bool,
    player_state: PlayerState,
    playing: Arc<AtomicBool>,
}

/// Spawns the audio worker thread to process playback commands.
///
/// If the internal worker returns an error, it is caught here and broadcast as
/// a fatal application event. The worker exits once every command sender has
/// been dropped.
pub(crate) fn spawn_player_worker(
    command_rx: Receiver<AudioPlayerCommand>,
    event_tx: Sender<AppEvent>,
    playing: Arc<AtomicBool>,
) {
    let error_tx = event_tx.clone();

    thread::spawn(move || {
        if let Err(e) = audio_player_worker(command_rx, event_tx, playing) {
            error!(error = ?e, "MPV worker failure");
            let _ = error_tx.send(AppEvent::FatalError(format!("MPV worker failure: {:?}", e)));
        }
    });
}

/// The primary execution loop for the audio player backend.
///
/// # Errors
///
/// Returns an error if the MPV context fails to initialize or if the event
/// channel is closed.
fn audio_player_worker(
    command_rx: Receiver<AudioPlayerCommand>,
    event_tx: Sender<AppEvent>,
    playing: Arc<AtomicBool>,
) -> Result<()> {
    let mut handler = (|| {
        let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
        builder
            .set_option("vo", "null")
            .context("Failed to set no video output")?;
        builder.build().context("Failed to build MPV handler")
    })()?;

    handler
        .observe_property::<f64>("duration", 0)
        .context("Failed to observe duration")?;
    handler
        .observe_property::<bool>("pause", 0)
        .context("Failed to observe pause")?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .context("Failed to observe time-pos")?;
    handler
        .observe_property::<bool>("idle-active", 0)
        .context("Failed to observe idle-active")?;

    let mut state = WorkerState {
        gate: ResourceGate::default(),
        is_paused: false,
        is_idle: true,
        player_state: PlayerState::Stopped,
        playing,
    };

    loop {
        if !process_commands(&mut handler, &command_rx, &mut state, &event_tx)? {
            debug!("Audio command channel closed, stopping worker");
            return Ok(());
        }
        process_mpv_events(&mut handler, &mut state, &event_tx)?;
    }
}

/// Drains and executes all pending commands.
///
/// Returns `false` once the command channel has been disconnected.
fn process_commands(
    handler: &mut mpv::MpvHandler,
    command_rx: &Receiver<AudioPlayerCommand>,
    state: &mut WorkerState,
    event_tx: &Sender<AppEvent>,
) -> Result<bool> {
    loop {
        let command = match command_rx.try_recv() {
            Ok(command) => command,
            Err(TryRecvError::Empty) => return Ok(true),
            Err(TryRecvError::Disconnected) => return Ok(false),
        };

        let result = match command {
            AudioPlayerCommand::Load { id, uri } => {
                state.gate.load(id);
                debug!(resource = id.0, %uri, "Loading resource");
                handler
                    .command(&["loadfile", &uri, "replace"])
                    .and_then(|_| handler.set_property("pause", false))
                    .map_err(|e| (Some(id), format!("{e:?}")))
            }
            AudioPlayerCommand::Play => handler
                .set_property("pause", false)
                .map_err(|e| (state.gate.command_target(), format!("{e:?}"))),
            AudioPlayerCommand::Pause => handler
                .set_property("pause", true)
                .map_err(|e| (state.gate.command_target(), format!("{e:?}"))),
            AudioPlayerCommand::Seek(position_ms) => {
                let seconds = format!("{:.3}", position_ms as f64 / 1000.0);
                handler
                    .command(&["seek", &seconds, "absolute"])
                    .map_err(|e| (state.gate.command_target(), format!("{e:?}")))
            }
            AudioPlayerCommand::SetVolume(volume) => handler
                .set_property("volume", volume * 100.0)
                .map_err(|e| (state.gate.command_target(), format!("{e:?}"))),
            AudioPlayerCommand::Unload(id) => {
                state.gate.unload(id);
                handler
                    .command(&["stop"])
                    .map_err(|e| (None, format!("{e:?}")))
            }
        };

        if let Err((resource, reason)) = result {
            warn!(?resource, %reason, "MPV command failed");
            if let Some(resource) = resource {
                send(event_tx, resource, PlayerEventKind::Failed(reason))?;
            }
        }
    }
}

/// Polls for MPV events and synchronizes the application state.
///
/// This function waits for up to 50ms for an event from the MPV context.
/// Events that arrive while no started file is owned by a resource are
/// dropped.
fn process_mpv_events(
    handler: &mut mpv::MpvHandler,
    state: &mut WorkerState,
    event_tx: &Sender<AppEvent>,
) -> Result<()> {
    let Some(mpv_event) = handler.wait_event(0.05) else {
        return Ok(());
    };

    let kind = match mpv_event {
        mpv::Event::PropertyChange { name, change, .. } => match (name, change) {
            ("duration", Format::Double(seconds)) if seconds >= 0.0 => {
                Some(PlayerEventKind::Duration(seconds_to_ms(seconds)))
            }
            ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => {
                Some(PlayerEventKind::Position(seconds_to_ms(seconds)))
            }
            ("pause", Format::Flag(pause)) => {
                state.is_paused = pause;
                None
            }
            ("idle-active", Format::Flag(idle_active)) => {
                state.is_idle = idle_active;
                None
            }
            _ => None,
        },
        mpv::Event::EndFile(Ok(mpv::EndFileReason::MPV_END_FILE_REASON_EOF)) => {
            Some(PlayerEventKind::Finished)
        }
        mpv::Event::EndFile(Err(e)) => Some(PlayerEventKind::Failed(format!("{e:?}"))),
        mpv::Event::StartFile => {
            state.gate.file_started();
            None
        }
        _ => None,
    };

    let new_player_state = AudioPlayer::player_state(state.is_paused, state.is_idle);
    state
        .playing
        .store(new_player_state == PlayerState::Playing, Ordering::Relaxed);

    if state.gate.owner().is_none() {
        return Ok(());
    }

    if new_player_state != state.player_state {
        state.player_state = new_player_state;
        emit(event_tx, state.gate.tag(PlayerEventKind::State(new_player_state)))?;
    }

    if let Some(kind) = kind {
        emit(event_tx, state.gate.tag(kind))?;
    }

    Ok(())
}

fn emit(event_tx: &Sender<AppEvent>, event: Option<PlayerEvent>) -> Result<()> {
    match event {
        Some(event) => event_tx
            .send(AppEvent::Player(event))
            .context("Failed to send player event"),
        None => Ok(()),
    }
}

fn send(event_tx: &Sender<AppEvent>, resource: ResourceId, kind: PlayerEventKind) -> Result<()> {
    emit(event_tx, Some(PlayerEvent { resource, kind }))
}

fn seconds_to_ms(seconds: f64) -> u64 {
    (seconds * 1000.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_are_rounded_to_milliseconds() {
        assert_eq!(seconds_to_ms(0.0), 0);
        assert_eq!(seconds_to_ms(1.2345), 1235);
        assert_eq!(seconds_to_ms(214.0), 214_000);
    }

    fn owner_of(gate: &ResourceGate, kind: PlayerEventKind) -> Option<ResourceId> {
        gate.tag(kind).map(|event| event.resource)
    }

    #[test]
    fn events_queued_for_previous_file_are_dropped() {
        let mut gate = ResourceGate::default();
        gate.load(ResourceId(1));
        assert_eq!(owner_of(&gate, PlayerEventKind::Position(0)), None);
        gate.file_started();
        assert_eq!(owner_of(&gate, PlayerEventKind::Position(10)), Some(ResourceId(1)));

        // The first file reached its end, then the user skipped before the
        // end-of-file event was read.
        gate.unload(ResourceId(1));
        gate.load(ResourceId(2));
        assert_eq!(owner_of(&gate, PlayerEventKind::Finished), None);
        assert_eq!(owner_of(&gate, PlayerEventKind::Position(200_000)), None);

        gate.file_started();
        assert_eq!(owner_of(&gate, PlayerEventKind::Position(0)), Some(ResourceId(2)));
        assert_eq!(owner_of(&gate, PlayerEventKind::Finished), Some(ResourceId(2)));
    }

    #[test]
    fn back_to_back_loads_wait_for_the_last_start() {
        let mut gate = ResourceGate::default();
        gate.load(ResourceId(1));
        gate.load(ResourceId(2));

        gate.file_started();
        assert_eq!(gate.owner(), None);
        assert_eq!(gate.command_target(), Some(ResourceId(2)));

        gate.file_started();
        assert_eq!(gate.owner(), Some(ResourceId(2)));
    }

    #[test]
    fn unloading_a_pending_file_leaves_nothing_owned() {
        let mut gate = ResourceGate::default();
        gate.load(ResourceId(4));
        gate.unload(ResourceId(4));
        gate.file_started();

        assert_eq!(gate.owner(), None);
        assert_eq!(gate.command_target(), None);
    }
}
