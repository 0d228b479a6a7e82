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

//! Keyboard input routing.
//!
//! A key press goes to the command line first when it is open, then to the
//! global bindings, and finally to the track table for navigation and
//! activation.

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent};

use crate::{
    App,
    events::{
        AppEvent,
        handlers::{handle_table_action, request_trending, set_main_view},
    },
    model::{Direction, toast::Toast, view::MainView},
};

const VOLUME_DELTA: f64 = 0.05;

const SEEK_DELTA_MS: i64 = 5_000;

/// Maps keyboard input to application actions and playback commands.
///
/// # Errors
///
/// Returns an error if a playback operation fails or a request cannot be
/// handed to a worker.
pub(super) fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    let event = Event::Key(key);
    if app.commander.handle_event(&event, &app.event_tx) {
        return Ok(());
    }

    if process_global_key_event(app, key)? {
        return Ok(());
    }

    if let Some(action) = app.table.as_widget().process_event(&event) {
        handle_table_action(app, action)?;
    }

    Ok(())
}

/// Returns `true` if the key is bound globally.
fn process_global_key_event(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => app.event_tx.send(AppEvent::ExitApplication)?,

        KeyCode::Char(' ') => app.controller.toggle_play_pause()?,
        KeyCode::Char('n') => {
            app.controller.advance(Direction::Next)?;
        }
        KeyCode::Char('p') => {
            app.controller.advance(Direction::Previous)?;
        }

        KeyCode::Char(',') => app.controller.seek_relative(-SEEK_DELTA_MS)?,
        KeyCode::Char('.') => app.controller.seek_relative(SEEK_DELTA_MS)?,
        KeyCode::Char('-') => app.controller.adjust_volume(-VOLUME_DELTA)?,
        KeyCode::Char('+' | '=') => app.controller.adjust_volume(VOLUME_DELTA)?,

        KeyCode::Char('x') => {
            let message = if app.controller.toggle_shuffle() {
                "Shuffle on"
            } else {
                "Shuffle off"
            };
            app.toast = Some(Toast::info(message));
        }
        KeyCode::Char('r') => {
            let mode = app.controller.cycle_repeat_mode();
            app.toast = Some(Toast::info(format!("Repeat {}", mode.label())));
        }
        KeyCode::Char('f') => app.controller.toggle_favourite()?,

        KeyCode::Char(c @ '1'..='7') => {
            if let Some(view) = MainView::from_key(c) {
                set_main_view(app, view);
                let trending = &app.listings.trending;
                let category = trending.category;
                let unfetched = trending.items.get().is_none() && !trending.items.is_loading();
                if view == MainView::Trending && unfetched {
                    request_trending(app, category)?;
                }
            }
        }

        _ => return Ok(false),
    }

    Ok(true)
}
