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

//! Catalog search, trending and lyrics state.
//!
//! Requests to the remote catalog are answered out of order by the task
//! worker. Each request is tagged with a ticket and only the answer to the
//! most recently issued ticket is kept, so a slow response can never
//! overwrite a newer one.

use crate::{
    catalog::{TrendingCategory, TrendingItems, models::CatalogTrack},
    model::Track,
};

/// Holds the answer to the latest issued request.
#[derive(Debug)]
pub(crate) struct Latest<T> {
    issued: u64,
    value: Option<T>,
    loading: bool,
}

impl<T> Default for Latest<T> {
    fn default() -> Self {
        Self {
            issued: 0,
            value: None,
            loading: false,
        }
    }
}

impl<T> Latest<T> {
    /// Issues a new ticket, superseding any request still in flight.
    pub(crate) fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.loading = true;
        self.issued
    }

    pub(crate) fn is_current(&self, ticket: u64) -> bool {
        ticket == self.issued
    }

    /// Stores `value` if `ticket` is the latest one issued.
    ///
    /// Returns `false` and drops the value for superseded tickets.
    pub(crate) fn accept(&mut self, ticket: u64, value: T) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.value = Some(value);
        self.loading = false;
        true
    }

    /// Marks the latest request as finished without a value.
    pub(crate) fn fail(&mut self, ticket: u64) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.loading = false;
        true
    }

    pub(crate) fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.loading
    }
}

/// Matches from the local library followed by catalog matches.
#[derive(Debug, Default)]
pub(crate) struct SearchResults {
    pub(crate) local: Vec<Track>,
    pub(crate) remote: Vec<CatalogTrack>,
}

#[derive(Debug, Default)]
pub(crate) struct Search {
    pub(crate) query: String,
    pub(crate) results: Latest<SearchResults>,
}

impl Search {
    pub(crate) fn begin(&mut self, query: &str) -> u64 {
        self.query = query.to_string();
        self.results.issue()
    }

    pub(crate) fn local(&self) -> &[Track] {
        self.results.get().map(|r| r.local.as_slice()).unwrap_or_default()
    }

    pub(crate) fn remote(&self) -> &[CatalogTrack] {
        self.results.get().map(|r| r.remote.as_slice()).unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub(crate) struct Trending {
    pub(crate) category: TrendingCategory,
    pub(crate) items: Latest<TrendingItems>,
}

impl Trending {
    pub(crate) fn begin(&mut self, category: TrendingCategory) -> u64 {
        self.category = category;
        self.items.issue()
    }
}

#[derive(Debug, Default)]
pub(crate) struct Lyrics {
    /// Identifies the track the lyrics were requested for.
    pub(crate) track_name: String,
    pub(crate) text: Latest<Option<String>>,
}

impl Lyrics {
    pub(crate) fn begin(&mut self, track_name: &str) -> u64 {
        self.track_name = track_name.to_string();
        self.text.issue()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_keeps_only_newest_ticket() {
        let mut latest = Latest::default();
        let first = latest.issue();
        let second = latest.issue();
        assert!(latest.is_loading());

        assert!(latest.accept(second, "second"));
        assert!(!latest.accept(first, "first"));
        assert_eq!(latest.get(), Some(&"second"));
        assert!(!latest.is_loading());
    }

    #[test]
    fn stale_failure_keeps_loading_flag() {
        let mut latest: Latest<u32> = Latest::default();
        let first = latest.issue();
        let _second = latest.issue();
        assert!(!latest.fail(first));
        assert!(latest.is_loading());
    }

    #[test]
    fn search_begin_records_query() {
        let mut search = Search::default();
        let ticket = search.begin("daft punk");
        assert_eq!(search.query, "daft punk");
        assert!(search.results.is_current(ticket));
        assert!(search.local().is_empty());
        assert!(search.remote().is_empty());
    }
}
