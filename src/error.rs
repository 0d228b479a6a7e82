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

//! Error types and user-facing messages.
//!
//! Failures are caught at the boundary nearest their origin and converted to
//! a short notification with [`user_message`]. Nothing is retried and no
//! error is allowed to take down the event loop.

use thiserror::Error;

pub(crate) const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// Failures talking to the remote catalog.
#[derive(Debug, Error)]
pub(crate) enum CatalogError {
    #[error("content not found")]
    NotFound,

    #[error("rate limited by catalog")]
    RateLimited,

    #[error("request timed out")]
    Timeout,

    #[error("catalog unreachable: {0}")]
    Offline(String),

    #[error("catalog returned status {0}")]
    Status(u16),

    #[error("stream redirect without a location")]
    MissingRedirect,

    #[error("invalid catalog url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout
        } else if err.is_connect() {
            CatalogError::Offline(err.to_string())
        } else if let Some(status) = err.status() {
            CatalogError::from_status(status.as_u16())
        } else {
            CatalogError::Http(err)
        }
    }
}

impl CatalogError {
    pub(crate) fn from_status(status: u16) -> Self {
        match status {
            404 => CatalogError::NotFound,
            429 => CatalogError::RateLimited,
            other => CatalogError::Status(other),
        }
    }

    pub(crate) fn user_message(&self) -> &'static str {
        match self {
            CatalogError::NotFound => "Content not found.",
            CatalogError::RateLimited => "Too many requests. Try again in a few minutes.",
            CatalogError::Timeout => "Request timed out. Check your connection.",
            CatalogError::Offline(_) => "No connection. Check your internet.",
            _ => GENERIC_MESSAGE,
        }
    }
}

/// Failures of the audio backend.
#[derive(Debug, Error)]
pub(crate) enum PlaybackError {
    #[error("could not open {uri}: {reason}")]
    Open { uri: String, reason: String },

    #[error("audio worker is not running")]
    WorkerGone,
}

/// Maps any failure to the message shown to the user.
pub(crate) fn user_message(err: &anyhow::Error) -> &'static str {
    if let Some(catalog) = err.downcast_ref::<CatalogError>() {
        return catalog.user_message();
    }
    if err.downcast_ref::<PlaybackError>().is_some() {
        return "This track could not be played.";
    }
    if err.downcast_ref::<rusqlite::Error>().is_some() {
        return "Could not access your music library.";
    }
    GENERIC_MESSAGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn status_codes_map_to_classes() {
        assert!(matches!(CatalogError::from_status(404), CatalogError::NotFound));
        assert!(matches!(CatalogError::from_status(429), CatalogError::RateLimited));
        assert!(matches!(CatalogError::from_status(500), CatalogError::Status(500)));
    }

    #[test]
    fn known_failures_have_specific_messages() {
        let err = anyhow::Error::new(CatalogError::NotFound);
        assert_eq!(user_message(&err), "Content not found.");

        let err = anyhow::Error::new(CatalogError::Offline("refused".into()));
        assert_eq!(user_message(&err), "No connection. Check your internet.");

        let err = anyhow::Error::new(CatalogError::Status(503));
        assert_eq!(user_message(&err), GENERIC_MESSAGE);
    }

    #[test]
    fn context_does_not_hide_the_cause() {
        let err: anyhow::Result<()> = Err(CatalogError::RateLimited).context("Failed to search");
        assert_eq!(
            user_message(&err.unwrap_err()),
            "Too many requests. Try again in a few minutes."
        );

        let err: anyhow::Result<()> =
            Err(rusqlite::Error::InvalidQuery).context("Failed to load favourites");
        assert_eq!(user_message(&err.unwrap_err()), "Could not access your music library.");
    }

    #[test]
    fn playback_failures_and_unknown_errors() {
        let err = anyhow::Error::new(PlaybackError::WorkerGone);
        assert_eq!(user_message(&err), "This track could not be played.");

        let err = anyhow::anyhow!("something odd");
        assert_eq!(user_message(&err), GENERIC_MESSAGE);
    }
}
