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

//! The listings behind each view.

use crate::{
    catalog::TrendingItems,
    model::{
        Entry, Track,
        library::{Home, OpenPlaylist},
        search::{Lyrics, Search, Trending},
    },
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum MainView {
    #[default]
    Recent,
    Favourites,
    Suggestions,
    Trending,
    Search,
    Playlists,
    PlaylistTracks,
    Lyrics,
}

impl MainView {
    /// Views reachable with the number keys, in key order.
    pub(crate) const NUMBERED: [MainView; 7] = [
        MainView::Recent,
        MainView::Favourites,
        MainView::Suggestions,
        MainView::Trending,
        MainView::Search,
        MainView::Playlists,
        MainView::Lyrics,
    ];

    /// The view bound to a number key, `'1'` to `'7'`.
    pub(crate) fn from_key(key: char) -> Option<Self> {
        let index = key.to_digit(10)?.checked_sub(1)?;
        Self::NUMBERED.get(index as usize).copied()
    }

    pub(crate) fn title(self) -> &'static str {
        match self {
            MainView::Recent => "Recent",
            MainView::Favourites => "Favourites",
            MainView::Suggestions => "Suggestions",
            MainView::Trending => "Trending",
            MainView::Search => "Search",
            MainView::Playlists => "Playlists",
            MainView::PlaylistTracks => "Playlist",
            MainView::Lyrics => "Lyrics",
        }
    }
}

/// Everything the views list.
#[derive(Debug, Default)]
pub(crate) struct Listings {
    pub(crate) home: Home,
    pub(crate) playlist: OpenPlaylist,
    pub(crate) search: Search,
    pub(crate) trending: Trending,
    pub(crate) lyrics: Lyrics,
}

impl Listings {
    /// The table rows for a view. The lyrics view has none.
    pub(crate) fn entries(&self, view: MainView) -> Vec<Entry> {
        match view {
            MainView::Recent => local(&self.home.recent),
            MainView::Favourites => local(&self.home.favourites),
            MainView::Suggestions => local(&self.home.suggestions),
            MainView::Trending => match self.trending.items.get() {
                Some(TrendingItems::Tracks(tracks)) => {
                    tracks.iter().cloned().map(Entry::Remote).collect()
                }
                Some(TrendingItems::Playlists(playlists)) => {
                    playlists.iter().cloned().map(Entry::CatalogPlaylist).collect()
                }
                Some(TrendingItems::Artists(artists)) => {
                    artists.iter().cloned().map(Entry::Artist).collect()
                }
                None => vec![],
            },
            MainView::Search => {
                let mut entries = local(self.search.local());
                entries.extend(self.search.remote().iter().cloned().map(Entry::Remote));
                entries
            }
            MainView::Playlists => self
                .home
                .playlists
                .iter()
                .cloned()
                .map(Entry::Playlist)
                .collect(),
            MainView::PlaylistTracks => local(&self.playlist.tracks),
            MainView::Lyrics => vec![],
        }
    }

    /// Whether the view is waiting for a catalog answer.
    pub(crate) fn is_loading(&self, view: MainView) -> bool {
        match view {
            MainView::Trending => self.trending.items.is_loading(),
            MainView::Search => self.search.results.is_loading(),
            MainView::Lyrics => self.lyrics.text.is_loading(),
            _ => false,
        }
    }
}

fn local(tracks: &[Track]) -> Vec<Entry> {
    tracks.iter().cloned().map(Entry::Local).collect()
}

/// The local tracks among `entries`, in order.
///
/// Activating a local track plays it with these as the queue.
pub(crate) fn local_queue(entries: &[Entry]) -> Vec<Track> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            Entry::Local(track) => Some(track.clone()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::models::{CatalogTrack, CatalogUser},
        model::search::SearchResults,
    };

    fn track(n: usize) -> Track {
        Track {
            id: format!("id-{n}"),
            uri: format!("/music/{n}.mp3"),
            name: format!("Track {n}"),
            artist: None,
            artwork: None,
        }
    }

    fn remote(id: &str) -> CatalogTrack {
        CatalogTrack {
            id: id.into(),
            title: format!("Remote {id}"),
            user: CatalogUser {
                id: "u".into(),
                name: "Someone".into(),
                handle: "someone".into(),
                profile_picture: None,
            },
            artwork: None,
            duration: None,
        }
    }

    #[test]
    fn number_keys_map_to_views() {
        assert_eq!(MainView::from_key('1'), Some(MainView::Recent));
        assert_eq!(MainView::from_key('7'), Some(MainView::Lyrics));
        assert_eq!(MainView::from_key('0'), None);
        assert_eq!(MainView::from_key('8'), None);
        assert_eq!(MainView::from_key('x'), None);
    }

    #[test]
    fn search_lists_local_before_remote() {
        let mut listings = Listings::default();
        let ticket = listings.search.begin("track");
        assert!(listings.is_loading(MainView::Search));

        listings.search.results.accept(
            ticket,
            SearchResults {
                local: vec![track(1)],
                remote: vec![remote("r1"), remote("r2")],
            },
        );

        let entries = listings.entries(MainView::Search);
        let kinds: Vec<&str> = entries.iter().map(Entry::kind).collect();
        assert_eq!(kinds, vec!["local", "stream", "stream"]);
        assert!(!listings.is_loading(MainView::Search));
    }

    #[test]
    fn queue_skips_non_local_entries() {
        let entries = vec![
            Entry::Local(track(0)),
            Entry::Remote(remote("r")),
            Entry::Local(track(1)),
        ];

        let queue = local_queue(&entries);
        assert_eq!(queue, vec![track(0), track(1)]);
    }

    #[test]
    fn empty_trending_has_no_entries() {
        let listings = Listings::default();
        assert!(listings.entries(MainView::Trending).is_empty());
        assert!(listings.entries(MainView::Lyrics).is_empty());
    }
}
