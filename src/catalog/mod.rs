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

//! Remote streaming catalog client.
//!
//! This module wraps the catalog's HTTP API: free-text track search, trending
//! listings and resolution of a track identifier to a streamable URL. All
//! calls are blocking and are only ever made from the task worker thread.
//!
//! HTTP status codes are mapped onto [`CatalogError`] classes so callers can
//! turn them into user-facing messages.

pub(crate) mod lyrics;
pub(crate) mod models;

use std::{str::FromStr, time::Duration};

use reqwest::{
    blocking::Client,
    header::{ACCEPT, HeaderMap, HeaderValue, LOCATION},
    redirect::Policy,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::{
    catalog::models::{CatalogPlaylist, CatalogTrack, CatalogUser, Envelope},
    config::AppConfig,
    error::CatalogError,
};

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("melodia/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum TrendingCategory {
    #[default]
    Week,
    Month,
    Year,
    AllTime,
    Playlists,
    Artists,
}

impl TrendingCategory {
    fn time_param(self) -> Option<&'static str> {
        match self {
            TrendingCategory::Month => Some("month"),
            TrendingCategory::Year => Some("year"),
            TrendingCategory::AllTime => Some("allTime"),
            _ => None,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            TrendingCategory::Week => "Trending this week",
            TrendingCategory::Month => "Trending this month",
            TrendingCategory::Year => "Trending this year",
            TrendingCategory::AllTime => "Trending of all time",
            TrendingCategory::Playlists => "Trending playlists",
            TrendingCategory::Artists => "Popular artists",
        }
    }
}

impl FromStr for TrendingCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(TrendingCategory::Week),
            "month" => Ok(TrendingCategory::Month),
            "year" => Ok(TrendingCategory::Year),
            "all" | "alltime" => Ok(TrendingCategory::AllTime),
            "playlists" => Ok(TrendingCategory::Playlists),
            "artists" => Ok(TrendingCategory::Artists),
            other => Err(format!("Unknown trending category: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum TrendingItems {
    Tracks(Vec<CatalogTrack>),
    Playlists(Vec<CatalogPlaylist>),
    Artists(Vec<CatalogUser>),
}

/// Blocking HTTP client for the streaming catalog.
pub(crate) struct CatalogClient {
    client: Client,
    /// Stream resolution must see the redirect itself, so it gets a client
    /// that never follows one.
    stream_client: Client,
    api_base: String,
    discovery_base: String,
}

impl CatalogClient {
    pub(crate) fn new(
        api_base: &str,
        discovery_base: &str,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .default_headers(headers.clone())
            .build()?;

        let stream_client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .default_headers(headers)
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            client,
            stream_client,
            api_base: api_base.trim_end_matches('/').to_string(),
            discovery_base: discovery_base.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        Self::new(
            &config.api_base,
            &config.discovery_base,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Searches catalog tracks by free text.
    ///
    /// A blank query returns no results without touching the network.
    pub(crate) fn search_tracks(&self, query: &str) -> Result<Vec<CatalogTrack>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(vec![]);
        }

        let mut url = endpoint(&self.discovery_base, &["tracks", "search"])?;
        url.query_pairs_mut().append_pair("query", query);

        self.get_data(url)
    }

    pub(crate) fn trending_tracks(
        &self,
        category: TrendingCategory,
    ) -> Result<Vec<CatalogTrack>, CatalogError> {
        let mut url = endpoint(&self.discovery_base, &["tracks", "trending"])?;
        if let Some(time) = category.time_param() {
            url.query_pairs_mut().append_pair("time", time);
        }

        self.get_data(url)
    }

    pub(crate) fn trending_playlists(&self) -> Result<Vec<CatalogPlaylist>, CatalogError> {
        let url = endpoint(&self.discovery_base, &["playlists", "trending"])?;
        self.get_data(url)
    }

    pub(crate) fn trending_artists(&self) -> Result<Vec<CatalogUser>, CatalogError> {
        let mut url = endpoint(&self.discovery_base, &["users", "search"])?;
        url.query_pairs_mut().append_pair("sort_method", "popular");
        self.get_data(url)
    }

    /// Fetches whichever listing the category names.
    pub(crate) fn trending(
        &self,
        category: TrendingCategory,
    ) -> Result<TrendingItems, CatalogError> {
        match category {
            TrendingCategory::Playlists => Ok(TrendingItems::Playlists(self.trending_playlists()?)),
            TrendingCategory::Artists => Ok(TrendingItems::Artists(self.trending_artists()?)),
            tracks => Ok(TrendingItems::Tracks(self.trending_tracks(tracks)?)),
        }
    }

    /// Resolves a catalog track identifier to a directly streamable URL.
    ///
    /// The stream endpoint answers with a redirect whose target is the audio
    /// itself; that target is returned without being fetched. A success
    /// response means the endpoint served the audio directly.
    pub(crate) fn resolve_stream_url(&self, track_id: &str) -> Result<String, CatalogError> {
        let url = endpoint(&self.api_base, &["tracks", track_id, "stream"])?;

        debug!(track_id, %url, "Resolving stream url");

        let response = self.stream_client.get(url).send()?;
        let status = response.status();

        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .ok_or(CatalogError::MissingRedirect)?;
            let target = response.url().join(location)?;
            debug!(track_id, %target, "Stream url resolved");
            return Ok(target.to_string());
        }

        if status.is_success() {
            return Ok(response.url().to_string());
        }

        Err(CatalogError::from_status(status.as_u16()))
    }

    fn get_data<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, CatalogError> {
        debug!(%url, "Catalog request");

        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::from_status(status.as_u16()));
        }

        let envelope: Envelope<T> = response.json()?;
        Ok(envelope.into_data())
    }
}

/// Joins path segments onto a base URL, percent-encoding each segment.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> Result<Url, CatalogError> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| CatalogError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client_for(server: &Server) -> CatalogClient {
        CatalogClient::new(&server.url(), &server.url(), Duration::from_secs(5)).unwrap()
    }

    fn track_json(id: &str, title: &str) -> String {
        format!(
            r#"{{ "id": "{id}", "title": "{title}", "user": {{ "id": "u", "name": "Someone", "handle": "someone" }} }}"#
        )
    }

    #[test]
    fn endpoint_appends_and_encodes_segments() {
        let url = endpoint("https://api.example.com/v1", &["tracks", "a b", "stream"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/tracks/a%20b/stream");

        let url = endpoint("http://127.0.0.1:8080", &["tracks"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/tracks");
    }

    #[test]
    fn category_parses_command_names() {
        assert_eq!("month".parse::<TrendingCategory>(), Ok(TrendingCategory::Month));
        assert_eq!("all".parse::<TrendingCategory>(), Ok(TrendingCategory::AllTime));
        assert!("decade".parse::<TrendingCategory>().is_err());
    }

    #[test]
    fn blank_search_makes_no_request() {
        let client = CatalogClient::new(
            "http://127.0.0.1:9",
            "http://127.0.0.1:9",
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(client.search_tracks("   ").unwrap().is_empty());
    }

    #[test]
    fn search_sends_encoded_query() {
        let mut server = Server::new();
        let body = format!(r#"{{ "data": [{}] }}"#, track_json("1", "Around the World"));
        let mock = server
            .mock("GET", "/tracks/search")
            .match_query(Matcher::UrlEncoded("query".into(), "daft punk".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create();

        let tracks = client_for(&server).search_tracks(" daft punk ").unwrap();

        mock.assert();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "Around the World");
    }

    #[test]
    fn trending_month_uses_time_parameter() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/tracks/trending")
            .match_query(Matcher::UrlEncoded("time".into(), "month".into()))
            .with_status(200)
            .with_body(format!(r#"{{ "data": [{}, {}] }}"#, track_json("1", "A"), track_json("2", "B")))
            .create();

        let items = client_for(&server).trending(TrendingCategory::Month).unwrap();

        mock.assert();
        match items {
            TrendingItems::Tracks(tracks) => assert_eq!(tracks.len(), 2),
            other => panic!("unexpected items: {other:?}"),
        }
    }

    #[test]
    fn trending_playlists_without_data_is_empty() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/playlists/trending")
            .with_status(200)
            .with_body("{}")
            .create();

        let playlists = client_for(&server).trending_playlists().unwrap();
        assert!(playlists.is_empty());
    }

    #[test]
    fn resolve_returns_redirect_location() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/tracks/D7KyD/stream")
            .with_status(302)
            .with_header("location", "https://cdn.example.com/audio/D7KyD.mp3")
            .create();

        let url = client_for(&server).resolve_stream_url("D7KyD").unwrap();

        mock.assert();
        assert_eq!(url, "https://cdn.example.com/audio/D7KyD.mp3");
    }

    #[test]
    fn resolve_redirect_without_location_is_an_error() {
        let mut server = Server::new();
        let _mock = server.mock("GET", "/tracks/x/stream").with_status(302).create();

        let err = client_for(&server).resolve_stream_url("x").unwrap_err();
        assert!(matches!(err, CatalogError::MissingRedirect));
    }

    #[test]
    fn resolve_maps_not_found_and_rate_limit() {
        let mut server = Server::new();
        let _gone = server.mock("GET", "/tracks/gone/stream").with_status(404).create();
        let _busy = server.mock("GET", "/tracks/busy/stream").with_status(429).create();

        let client = client_for(&server);
        assert!(matches!(client.resolve_stream_url("gone"), Err(CatalogError::NotFound)));
        assert!(matches!(client.resolve_stream_url("busy"), Err(CatalogError::RateLimited)));
    }

    #[test]
    fn unreachable_catalog_is_offline() {
        let client = CatalogClient::new(
            "http://127.0.0.1:1",
            "http://127.0.0.1:1",
            Duration::from_secs(2),
        )
        .unwrap();

        let err = client.trending_artists().unwrap_err();
        assert!(matches!(err, CatalogError::Offline(_)), "got {err:?}");
    }
}
