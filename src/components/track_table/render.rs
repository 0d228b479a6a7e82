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

//! UI rendering logic for the track table.
//!
//! This module handles the visual representation of entries, including
//! column layout, highlighting, and theme application using the Ratatui
//! widget system.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Cell, Row, Table},
};

use crate::{components::TrackTable, render::Render, theme::Theme};

impl Render for TrackTable<'_> {
    fn draw(&mut self, f: &mut Frame, area: Rect, theme: &Theme) {
        let rows = self.entries.iter().map(|entry| {
            Row::new(vec![
                Cell::from(Line::from(entry.kind()).style(Style::default().fg(theme.table_kind_fg))),
                Cell::from(Line::from(entry.title()).style(Style::default().fg(theme.table_title_fg))),
                Cell::from(Line::from(entry.subtitle()).style(Style::default().fg(theme.table_subtitle_fg))),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(7),
                Constraint::Percentage(60),
                Constraint::Percentage(40),
            ],
        )
        .header(
            Row::new(vec![Cell::from(""), Cell::from("Title"), Cell::from("By")])
                .style(Style::default().add_modifier(Modifier::BOLD).fg(theme.accent_colour))
                .bottom_margin(1),
        )
        .row_highlight_style(Style::default().bg(theme.table_highlight_bg).fg(theme.accent_colour))
        .block(Block::default());

        f.render_stateful_widget(table, area, &mut *self.table_state);
    }
}
