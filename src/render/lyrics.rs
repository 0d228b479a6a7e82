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

//! Render the lyrics of the playing track.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::App;

pub(crate) fn draw_lyrics(f: &mut Frame, area: Rect, app: &App) {
    let lyrics = &app.listings.lyrics;

    let mut lines = vec![
        Line::from(Span::styled(
            lyrics.track_name.as_str(),
            Style::default()
                .fg(app.theme.accent_colour)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    match lyrics.text.get() {
        _ if lyrics.text.is_loading() => lines.push(Line::from("Loading...")),
        Some(Some(text)) => lines.extend(text.lines().map(Line::from)),
        Some(None) => lines.push(Line::from("No lyrics found")),
        None => lines.push(Line::from("Use :lyrics to look up the playing track")),
    }

    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.table_title_fg))
            .wrap(Wrap { trim: false }),
        area,
    );
}
