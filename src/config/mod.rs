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

//! Application configuration.
//!
//! This module manages the application configuration file.

use serde::{Deserialize, Serialize};
use tracing::warn;

const CONFIG_NAME: &str = "melodia";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    pub media_dirs: Vec<String>,
    pub database_file: String,
    pub api_base: String,
    pub discovery_base: String,
    pub lyrics_base: String,
    pub radio_stream_url: String,
    pub request_timeout_secs: u64,
    pub initial_volume: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            media_dirs: vec![],
            database_file: "melodia.db".to_string(),
            api_base: "https://api.audius.co/v1".to_string(),
            discovery_base: "https://discoveryprovider.audius.co/v1".to_string(),
            lyrics_base: "https://api.lyrics.ovh/v1".to_string(),
            radio_stream_url: "https://stream.zeno.fm/qnozhn4xig7uv".to_string(),
            request_timeout_secs: 15,
            initial_volume: 1.0,
        }
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load configuration, using defaults");
        AppConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{ "media_dirs": ["/srv/music"], "request_timeout_secs": 5 }"#)
                .unwrap();
        assert_eq!(cfg.media_dirs, vec!["/srv/music".to_string()]);
        assert_eq!(cfg.request_timeout_secs, 5);
        assert_eq!(cfg.database_file, "melodia.db");
        assert_eq!(cfg.initial_volume, 1.0);
    }
}
