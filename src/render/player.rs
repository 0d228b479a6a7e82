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

//! Render the music player bar.
//!
//! Shows the current track, playback time, player flags, the volume and a
//! progress gauge.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::{
    App,
    model::RepeatMode,
    render::icons::{
        FAVOURITE, ICON_PAUSE, ICON_PLAY, ICON_REPEAT, ICON_SHUFFLE, ICON_STOP, NOT_FAVOURITE,
    },
    util::format::{format_time, format_volume},
};

/// Renders the player bar including track info and controls.
pub(crate) fn draw_player(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(inner_area);

    let controller = &app.controller;
    let status = controller.status();
    let accent = Style::default()
        .fg(app.theme.accent_colour)
        .add_modifier(Modifier::BOLD);

    let info = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(24)])
        .split(rows[0]);

    let track_line = match controller.current() {
        Some(track) => {
            let icon = match (controller.is_loaded(), status.is_playing) {
                (false, _) => ICON_STOP,
                (true, true) => ICON_PLAY,
                (true, false) => ICON_PAUSE,
            };
            let mut spans = vec![
                Span::raw(format!("{icon} ")).fg(app.theme.table_title_fg),
                Span::styled(track.name.as_str(), accent),
                Span::raw(" by "),
                Span::styled(track.artist_or_unknown(), accent),
            ];
            let queue = controller.queue();
            if let Some(index) = queue.current_index() {
                spans.push(Span::raw(format!("  [{}/{}]", index + 1, queue.len())).fg(app.theme.dim_fg));
            }
            Line::from(spans)
        }
        None => Line::from(vec![
            Span::raw(format!("{ICON_STOP} ")).fg(app.theme.table_title_fg),
            Span::raw("Nothing playing").fg(app.theme.dim_fg),
        ]),
    };
    f.render_widget(Paragraph::new(track_line), info[0]);

    if controller.current().is_some() {
        let duration = status
            .duration_ms
            .map(format_time)
            .unwrap_or_else(|| "--:--".to_string());
        let time_line = Line::from(vec![
            Span::styled(format_time(status.position_ms), accent),
            Span::raw(" / "),
            Span::styled(duration, accent),
        ]);
        f.render_widget(Paragraph::new(time_line).alignment(Alignment::Right), info[1]);
    }

    let controls = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(20), Constraint::Length(5)])
        .split(rows[1]);

    let flag = |on: bool| {
        if on {
            Style::default().fg(app.theme.accent_colour)
        } else {
            Style::default().fg(app.theme.dim_fg)
        }
    };
    let favourite = if controller.is_favourite() { FAVOURITE } else { NOT_FAVOURITE };
    let flags = Line::from(vec![
        Span::styled(format!("{ICON_SHUFFLE} shuffle"), flag(controller.shuffle())),
        Span::raw("  "),
        Span::styled(
            format!("{ICON_REPEAT} {}", controller.repeat().label()),
            flag(controller.repeat() != RepeatMode::Off),
        ),
        Span::raw("  "),
        Span::styled(favourite, flag(controller.is_favourite())),
    ]);
    f.render_widget(Paragraph::new(flags), controls[0]);

    let volume_gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(app.theme.accent_colour)
                .bg(app.theme.gauge_track_colour),
        )
        .ratio(controller.volume().clamp(0.0, 1.0))
        .label("")
        .use_unicode(true);
    f.render_widget(volume_gauge, controls[1]);
    f.render_widget(
        Paragraph::new(format_volume(controller.volume()))
            .alignment(Alignment::Right)
            .fg(app.theme.table_title_fg),
        controls[2],
    );

    let position_gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(app.theme.accent_colour)
                .bg(app.theme.gauge_track_colour),
        )
        .ratio(status.progress().unwrap_or(0.0).clamp(0.0, 1.0))
        .label("")
        .use_unicode(true);
    f.render_widget(position_gauge, rows[2]);
}
