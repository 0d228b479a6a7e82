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

/// Formats a duration in milliseconds as `MM:SS`, or `H:MM:SS` from one hour
/// up.
///
/// Used for track positions and durations in the player bar.
pub(crate) fn format_time(millis: u64) -> String {
    let total_seconds = millis / 1000;
    let hours = total_seconds / 3600;
    let mins = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}")
    } else {
        format!("{mins:02}:{secs:02}")
    }
}

/// Volume in the range `0.0..=1.0` as a whole percentage.
pub(crate) fn format_volume(volume: f64) -> String {
    format!("{}%", (volume.clamp(0.0, 1.0) * 100.0).round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(65_999), "01:05");
        assert_eq!(format_time(599_000), "09:59");
    }

    #[test]
    fn formats_hours_when_needed() {
        assert_eq!(format_time(3_600_000), "1:00:00");
        assert_eq!(format_time(3_725_000), "1:02:05");
    }

    #[test]
    fn volume_is_a_rounded_percentage() {
        assert_eq!(format_volume(0.456), "46%");
        assert_eq!(format_volume(1.5), "100%");
    }
}
