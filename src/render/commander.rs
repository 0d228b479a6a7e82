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

//! Render the command line.
//!
//! The line doubles as the status bar: while command mode is inactive it
//! shows the latest notification, or library scan progress.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::App;

pub(crate) fn draw_commander(f: &mut Frame, area: Rect, app: &App) {
    let commander = &app.commander;

    let container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1)])
        .horizontal_margin(1)
        .split(area);

    if commander.active() {
        let line = Line::from(vec![
            Span::styled(":", Style::default().fg(app.theme.accent_colour)),
            Span::raw(commander.input.value()),
        ]);
        f.render_widget(
            Paragraph::new(line).style(
                Style::default()
                    .fg(app.theme.table_title_fg)
                    .bg(app.theme.gauge_track_colour),
            ),
            container[0],
        );

        let cursor_x = container[0].x + 1 + commander.input.visual_cursor() as u16;
        f.set_cursor_position((cursor_x, container[0].y));
        return;
    }

    let status = match &app.toast {
        Some(toast) => Paragraph::new(toast.message.as_str())
            .style(Style::default().fg(app.theme.toast_colour(toast.kind))),
        None => Paragraph::new(app.scan.summary().unwrap_or_default())
            .style(Style::default().fg(app.theme.dim_fg)),
    };
    f.render_widget(status, container[0]);
}
