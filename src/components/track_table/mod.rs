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

//! Interactive track table widget and state management.
//!
//! This module provides the table every listing is shown in. It separates
//! persistent state (`TrackTableState`) from the transient widget view
//! (`TrackTable`), and reports activation back to the caller as a
//! [`TrackTableAction`] rather than acting on it.

mod event;
mod render;

use ratatui::widgets::TableState;

use crate::model::Entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrackTableAction {
    /// The entry at this index was activated.
    Activate(usize),
}

pub(crate) struct TrackTableState {
    pub(crate) entries: Vec<Entry>,
    pub(crate) table_state: TableState,
}

impl TrackTableState {
    pub(crate) fn new() -> Self {
        Self {
            entries: vec![],
            table_state: TableState::new(),
        }
    }

    /// Replaces the rows.
    ///
    /// The highlight follows the highlighted item if it is still listed,
    /// otherwise it stays at the same row, kept in range.
    pub(crate) fn set_entries(&mut self, entries: Vec<Entry>) {
        let followed = self
            .selected_entry()
            .and_then(|current| entries.iter().position(|e| e.same_item(current)));
        let selected = match (followed, self.table_state.selected(), entries.len()) {
            (_, _, 0) => None,
            (Some(i), _, _) => Some(i),
            (None, Some(i), len) => Some(i.min(len - 1)),
            (None, None, _) => Some(0),
        };
        self.entries = entries;
        self.table_state.select(selected);
    }

    /// Moves the highlight back to the top, for a freshly opened listing.
    pub(crate) fn reset_selection(&mut self) {
        let selected = (!self.entries.is_empty()).then_some(0);
        self.table_state.select(selected);
        *self.table_state.offset_mut() = 0;
    }

    pub(crate) fn selected_entry(&self) -> Option<&Entry> {
        self.table_state.selected().and_then(|i| self.entries.get(i))
    }

    pub(crate) fn as_widget(&mut self) -> TrackTable<'_> {
        TrackTable {
            entries: &self.entries,
            table_state: &mut self.table_state,
        }
    }
}

pub(crate) struct TrackTable<'a> {
    entries: &'a [Entry],
    table_state: &'a mut TableState,
}

impl TrackTable<'_> {
    fn goto_next(&mut self) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn goto_previous(&mut self) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn goto_first(&mut self) {
        if !self.entries.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    fn goto_last(&mut self) {
        if let Some(last) = self.entries.len().checked_sub(1) {
            self.table_state.select(Some(last));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Track;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

    fn entries(n: usize) -> Vec<Entry> {
        (0..n)
            .map(|i| {
                Entry::Local(Track {
                    id: format!("{i}"),
                    uri: format!("/music/{i}.mp3"),
                    name: format!("Track {i}"),
                    artist: None,
                    artwork: None,
                })
            })
            .collect()
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn navigation_wraps_around() {
        let mut state = TrackTableState::new();
        state.set_entries(entries(3));
        assert_eq!(state.table_state.selected(), Some(0));

        state.as_widget().process_event(&key('k'));
        assert_eq!(state.table_state.selected(), Some(2));

        state.as_widget().process_event(&key('j'));
        assert_eq!(state.table_state.selected(), Some(0));

        state.as_widget().process_event(&key('G'));
        assert_eq!(state.table_state.selected(), Some(2));

        state.as_widget().process_event(&key('g'));
        assert_eq!(state.table_state.selected(), Some(0));
    }

    #[test]
    fn enter_activates_highlighted_row() {
        let mut state = TrackTableState::new();
        state.set_entries(entries(3));
        state.as_widget().process_event(&key('j'));

        let enter = Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        let action = state.as_widget().process_event(&enter);
        assert_eq!(action, Some(TrackTableAction::Activate(1)));
    }

    #[test]
    fn highlight_follows_reordered_track() {
        let mut state = TrackTableState::new();
        state.set_entries(entries(3));
        state.as_widget().process_event(&key('j'));
        assert_eq!(state.selected_entry().map(Entry::title), Some("Track 1"));

        let mut reordered = entries(4);
        reordered.rotate_right(1);
        state.set_entries(reordered);

        assert_eq!(state.table_state.selected(), Some(2));
        assert_eq!(state.selected_entry().map(Entry::title), Some("Track 1"));
    }

    #[test]
    fn shrinking_listing_clamps_highlight() {
        let mut state = TrackTableState::new();
        state.set_entries(entries(5));
        state.as_widget().process_event(&key('G'));

        state.set_entries(entries(2));
        assert_eq!(state.table_state.selected(), Some(1));

        state.set_entries(vec![]);
        assert_eq!(state.table_state.selected(), None);
        assert!(state.selected_entry().is_none());
    }
}
