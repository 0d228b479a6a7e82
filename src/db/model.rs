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

//! Database row mapping for domain models.
//!
//! This module provides the conversion logic between raw SQLite result rows
//! and the domain models, for use with [`rusqlite::Statement::query_map`].

use rusqlite::Row;

use crate::model::{Playlist, Track};

impl Track {
    /// Maps a row selected as `id, uri, name, artist, artwork`.
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            uri: row.get(1)?,
            name: row.get(2)?,
            artist: row.get(3)?,
            artwork: row.get(4)?,
        })
    }
}

impl Playlist {
    /// Maps a row selected as `id, name, track_count`.
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            track_count: row.get(2)?,
        })
    }
}
