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

//! Wire models for the remote catalog API.

use serde::Deserialize;

/// Every listing endpoint wraps its payload in `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub(crate) data: Option<Vec<T>>,
}

impl<T> Envelope<T> {
    pub(crate) fn into_data(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub(crate) struct Artwork {
    #[serde(rename = "150x150")]
    pub(crate) small: Option<String>,
    #[serde(rename = "480x480")]
    pub(crate) medium: Option<String>,
    #[serde(rename = "1000x1000")]
    pub(crate) large: Option<String>,
}

impl Artwork {
    /// The medium size, falling back to whatever else is available.
    pub(crate) fn medium(&self) -> Option<&str> {
        self.medium
            .as_deref()
            .or(self.small.as_deref())
            .or(self.large.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub(crate) struct CatalogUser {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) handle: String,
    #[serde(default)]
    pub(crate) profile_picture: Option<Artwork>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub(crate) struct CatalogTrack {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) user: CatalogUser,
    #[serde(default)]
    pub(crate) artwork: Option<Artwork>,
    /// Length in seconds.
    #[serde(default)]
    pub(crate) duration: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub(crate) struct CatalogPlaylist {
    pub(crate) id: String,
    pub(crate) playlist_name: String,
    #[serde(default)]
    pub(crate) artwork: Option<Artwork>,
}
