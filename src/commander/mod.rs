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

//! Command-line input logic and state management.
//!
//! This module implements a command-line component: it manages a text input
//! while command mode is active, and when a command is submitted it parses
//! the buffer and dispatches the resulting [`Command`] as an application
//! event.

use std::sync::mpsc::Sender;

use crossterm::event::{Event, KeyCode};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::{
    catalog::TrendingCategory,
    events::AppEvent,
    model::{RepeatMode, toast::Toast},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Quit,
    Search(String),
    Trending(TrendingCategory),
    Radio,
    Lyrics,
    Scan,
    NewPlaylist(String),
    /// Adds the highlighted (or playing) track to a stored playlist.
    AddToPlaylist(i64),
    DeletePlaylist(i64),
    /// Volume as a percentage.
    Volume(u8),
    /// Sets the repeat mode, or cycles it when none is given.
    Repeat(Option<RepeatMode>),
}

pub(crate) struct Commander {
    active: bool,
    pub(crate) input: Input,
}

impl Commander {
    pub(crate) fn new() -> Self {
        Self {
            active: false,
            input: Input::default(),
        }
    }

    pub(crate) fn active(&self) -> bool {
        self.active
    }

    /// Returns `true` if the event was consumed by the command line.
    pub(crate) fn handle_event(&mut self, event: &Event, event_tx: &Sender<AppEvent>) -> bool {
        let Event::Key(key_event) = event else {
            return false;
        };

        if !self.active {
            if key_event.code == KeyCode::Char(':') {
                self.active = true;
                return true;
            }
            return false;
        }

        match key_event.code {
            KeyCode::Esc => {
                self.active = false;
                self.input.reset();
            }
            KeyCode::Enter => {
                let buffer = self.input.value().trim().to_string();
                self.input.reset();
                self.active = false;

                if !buffer.is_empty() {
                    let event = match parse_command(&buffer) {
                        Ok(command) => AppEvent::Command(command),
                        Err(message) => AppEvent::Notify(Toast::error(message)),
                    };
                    let _ = event_tx.send(event);
                }
            }
            _ => {
                self.input.handle_event(event);
            }
        }

        true
    }
}

pub(crate) fn parse_command(buffer: &str) -> Result<Command, String> {
    let parts: Vec<&str> = buffer.split_whitespace().collect();

    match parts.as_slice() {
        ["q"] => Ok(Command::Quit),

        ["search", query @ ..] if !query.is_empty() => Ok(Command::Search(query.join(" "))),
        ["search"] => Err("Usage: search <text>".to_string()),

        ["trending"] => Ok(Command::Trending(TrendingCategory::Week)),
        ["trending", category] => category.parse().map(Command::Trending),

        ["radio"] => Ok(Command::Radio),
        ["lyrics"] => Ok(Command::Lyrics),
        ["scan"] => Ok(Command::Scan),

        ["plnew", name @ ..] if !name.is_empty() => Ok(Command::NewPlaylist(name.join(" "))),
        ["plnew"] => Err("Usage: plnew <name>".to_string()),

        ["pladd", id] => parse_id(id).map(Command::AddToPlaylist),
        ["pldel", id] => parse_id(id).map(Command::DeletePlaylist),

        ["vol", volume] => match volume.parse::<u8>() {
            Ok(volume) if volume <= 100 => Ok(Command::Volume(volume)),
            _ => Err("Volume must be between 0 and 100".to_string()),
        },

        ["repeat"] => Ok(Command::Repeat(None)),
        ["repeat", mode] => match *mode {
            "off" => Ok(Command::Repeat(Some(RepeatMode::Off))),
            "one" => Ok(Command::Repeat(Some(RepeatMode::One))),
            "all" => Ok(Command::Repeat(Some(RepeatMode::All))),
            other => Err(format!("Unknown repeat mode: {other}")),
        },

        [cmd, ..] => Err(format!("Unknown command: {cmd}")),
        [] => Err("Empty command".to_string()),
    }
}

fn parse_id(id: &str) -> Result<i64, String> {
    id.parse().map_err(|_| format!("Invalid playlist id: {id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use std::sync::mpsc;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn search_joins_words() {
        assert_eq!(
            parse_command("search  daft   punk"),
            Ok(Command::Search("daft punk".into()))
        );
        assert!(parse_command("search").is_err());
    }

    #[test]
    fn trending_defaults_to_week() {
        assert_eq!(
            parse_command("trending"),
            Ok(Command::Trending(TrendingCategory::Week))
        );
        assert_eq!(
            parse_command("trending artists"),
            Ok(Command::Trending(TrendingCategory::Artists))
        );
        assert!(parse_command("trending decade").is_err());
    }

    #[test]
    fn playlist_commands_need_numeric_ids() {
        assert_eq!(parse_command("pladd 3"), Ok(Command::AddToPlaylist(3)));
        assert_eq!(parse_command("pldel 9"), Ok(Command::DeletePlaylist(9)));
        assert!(parse_command("pladd three").is_err());
        assert_eq!(
            parse_command("plnew Late Night"),
            Ok(Command::NewPlaylist("Late Night".into()))
        );
    }

    #[test]
    fn volume_is_bounded() {
        assert_eq!(parse_command("vol 40"), Ok(Command::Volume(40)));
        assert!(parse_command("vol 101").is_err());
        assert!(parse_command("vol -1").is_err());
    }

    #[test]
    fn repeat_accepts_optional_mode() {
        assert_eq!(parse_command("repeat"), Ok(Command::Repeat(None)));
        assert_eq!(
            parse_command("repeat one"),
            Ok(Command::Repeat(Some(RepeatMode::One)))
        );
        assert!(parse_command("repeat twice").is_err());
    }

    #[test]
    fn unknown_command_is_reported() {
        assert_eq!(parse_command("dance"), Err("Unknown command: dance".into()));
    }

    #[test]
    fn submitted_command_is_sent_and_mode_exits() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();

        assert!(!commander.handle_event(&key(KeyCode::Char('x')), &tx));
        assert!(commander.handle_event(&key(KeyCode::Char(':')), &tx));
        assert!(commander.active());

        for c in "scan".chars() {
            commander.handle_event(&key(KeyCode::Char(c)), &tx);
        }
        commander.handle_event(&key(KeyCode::Enter), &tx);

        assert!(!commander.active());
        assert!(matches!(rx.try_recv(), Ok(AppEvent::Command(Command::Scan))));
    }

    #[test]
    fn escape_discards_input() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();

        commander.handle_event(&key(KeyCode::Char(':')), &tx);
        commander.handle_event(&key(KeyCode::Char('q')), &tx);
        commander.handle_event(&key(KeyCode::Esc), &tx);

        assert!(!commander.active());
        assert_eq!(commander.input.value(), "");
        assert!(rx.try_recv().is_err());
    }
}
