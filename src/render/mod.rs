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

//! User interface rendering logic.
//!
//! This module handles the translation of the [`App`] state into visual
//! widgets using the `ratatui` framework. It is responsible for layout
//! management, widget styling, and terminal frame composition.
//!
//! # Rendering Pipeline
//!
//! The primary entry point is the [`draw`] function, which is called after
//! every processed event, ticks included.

mod commander;
mod icons;
mod lyrics;
mod player;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    App,
    model::view::MainView,
    render::{commander::draw_commander, lyrics::draw_lyrics, player::draw_player},
    theme::Theme,
};

pub(crate) trait Render {
    fn draw(&mut self, f: &mut Frame, area: Rect, theme: &Theme);
}

/// Renders the user interface to the terminal frame.
///
/// The screen is split into a view bar, the main listing, the player bar and
/// a single line shared by the command line and notifications.
pub(crate) fn draw(f: &mut Frame, app: &mut App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_view_bar(f, outer[0], app);

    let main = outer[1].inner(Margin::new(1, 1));
    if app.main_view == MainView::Lyrics {
        draw_lyrics(f, main, app);
    } else if app.table.entries.is_empty() {
        let message = if app.listings.is_loading(app.main_view) {
            "Loading..."
        } else {
            "Nothing here yet"
        };
        f.render_widget(
            Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(app.theme.dim_fg)),
            main,
        );
    } else {
        app.table.as_widget().draw(f, main, &app.theme);
    }

    draw_player(f, outer[2], app);

    draw_commander(f, outer[3], app);
}

fn draw_view_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::raw(" ")];

    for (i, view) in MainView::NUMBERED.iter().enumerate() {
        let current = *view == app.main_view
            || (*view == MainView::Playlists && app.main_view == MainView::PlaylistTracks);
        let style = if current {
            Style::default()
                .fg(app.theme.accent_colour)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.dim_fg)
        };
        spans.push(Span::styled(format!("{} {}", i + 1, view.title()), style));
        spans.push(Span::raw("  "));
    }

    let title = match app.main_view {
        MainView::Trending => app.listings.trending.category.label().to_string(),
        MainView::Search if !app.listings.search.query.is_empty() => {
            format!("Results for \"{}\"", app.listings.search.query)
        }
        MainView::PlaylistTracks => {
            let name = app
                .listings
                .playlist
                .id
                .and_then(|id| app.listings.home.playlists.iter().find(|p| p.id == id))
                .map(|p| p.name.as_str())
                .unwrap_or("Playlist");
            name.to_string()
        }
        _ => String::new(),
    };

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(40)])
        .split(area);

    f.render_widget(Paragraph::new(Line::from(spans)), layout[0]);
    f.render_widget(
        Paragraph::new(format!("{title} "))
            .alignment(Alignment::Right)
            .style(Style::default().fg(app.theme.accent_colour)),
        layout[1],
    );
}
