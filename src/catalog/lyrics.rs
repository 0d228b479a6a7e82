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

//! Lyrics lookup.

use std::time::Duration;

use reqwest::{StatusCode, blocking::Client};
use serde::Deserialize;
use tracing::debug;

use crate::{
    catalog::{DEFAULT_USER_AGENT, endpoint},
    config::AppConfig,
    error::CatalogError,
    model::Track,
};

#[derive(Debug, Deserialize)]
struct LyricsResponse {
    #[serde(default)]
    lyrics: Option<String>,
}

pub(crate) struct LyricsClient {
    client: Client,
    base: String,
}

impl LyricsClient {
    pub(crate) fn new(base: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        Self::new(
            &config.lyrics_base,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Looks up lyrics, returning `None` when the service has none.
    pub(crate) fn fetch(&self, artist: &str, title: &str) -> Result<Option<String>, CatalogError> {
        let url = endpoint(&self.base, &[artist, title])?;

        debug!(artist, title, "Fetching lyrics");

        let response = self.client.get(url).send()?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body: LyricsResponse = response.json()?;
                Ok(body.lyrics.filter(|text| !text.trim().is_empty()))
            }
            status => Err(CatalogError::from_status(status.as_u16())),
        }
    }
}

/// Works out the artist and title to look lyrics up by.
///
/// Local files without tags are often named `Artist - Title`, so when the
/// artist is unknown the name is split on the first ` - `.
pub(crate) fn lyrics_query(track: &Track) -> (String, String) {
    if let Some(artist) = track.artist.as_deref().filter(|a| !a.trim().is_empty()) {
        return (artist.to_string(), track.name.clone());
    }

    match track.name.split_once(" - ") {
        Some((artist, title)) => (artist.trim().to_string(), title.trim().to_string()),
        None => (String::new(), track.name.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn track(name: &str, artist: Option<&str>) -> Track {
        Track {
            id: "1".into(),
            uri: "/music/1.mp3".into(),
            name: name.into(),
            artist: artist.map(str::to_string),
            artwork: None,
        }
    }

    #[test]
    fn query_uses_known_artist() {
        let (artist, title) = lyrics_query(&track("Yellow", Some("Coldplay")));
        assert_eq!(artist, "Coldplay");
        assert_eq!(title, "Yellow");
    }

    #[test]
    fn query_splits_name_when_artist_unknown() {
        let (artist, title) = lyrics_query(&track("Coldplay - Yellow", None));
        assert_eq!(artist, "Coldplay");
        assert_eq!(title, "Yellow");

        let (artist, title) = lyrics_query(&track("Untitled", None));
        assert!(artist.is_empty());
        assert_eq!(title, "Untitled");
    }

    #[test]
    fn fetch_returns_lyrics_text() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/Coldplay/Yellow")
            .with_status(200)
            .with_body(r#"{ "lyrics": "Look at the stars" }"#)
            .create();

        let client = LyricsClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        let lyrics = client.fetch("Coldplay", "Yellow").unwrap();

        mock.assert();
        assert_eq!(lyrics.as_deref(), Some("Look at the stars"));
    }

    #[test]
    fn fetch_not_found_is_none() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/Nobody/Nothing")
            .with_status(404)
            .with_body(r#"{ "error": "No lyrics found" }"#)
            .create();

        let client = LyricsClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        assert_eq!(client.fetch("Nobody", "Nothing").unwrap(), None);
    }
}
