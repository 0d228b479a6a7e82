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

//! Terminal background colour control.
//!
//! Uses OSC 11 and OSC 111 escape sequences, which most modern terminal
//! emulators understand. Terminals that don't simply ignore them.

use std::io::{self, Write};

use ratatui::style::Color;

use crate::theme::Theme;

/// Paints the terminal background with `colour`.
///
/// Colours without an RGB form leave the background untouched.
pub(crate) fn set_terminal_bg(colour: Color) {
    if let Some(hex) = Theme::to_hex(colour) {
        write_sequence(&format!("\x1b]11;{hex}\x07"));
    }
}

/// Restores the user's own terminal background.
pub(crate) fn reset_terminal_bg() {
    write_sequence("\x1b]111\x07");
}

fn write_sequence(sequence: &str) {
    let mut stdout = io::stdout();
    let _ = stdout.write_all(sequence.as_bytes());
    let _ = stdout.flush();
}
