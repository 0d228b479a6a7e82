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

//! Short-lived user notifications.

use std::time::{Duration, Instant};

pub(crate) const TOAST_DURATION: Duration = Duration::from_millis(3500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug)]
pub(crate) struct Toast {
    pub(crate) message: String,
    pub(crate) kind: ToastKind,
    shown_at: Instant,
}

impl Toast {
    pub(crate) fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            shown_at: Instant::now(),
        }
    }

    pub(crate) fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Success)
    }

    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Error)
    }

    pub(crate) fn info(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Info)
    }

    pub(crate) fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= TOAST_DURATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_expires_after_duration() {
        let toast = Toast::error("boom");
        assert_eq!(toast.kind, ToastKind::Error);
        assert!(!toast.is_expired(Instant::now()));
        assert!(toast.is_expired(Instant::now() + TOAST_DURATION));
    }
}
