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

//! File-based logging.
//!
//! The TUI owns the terminal, so log output goes to a daily rotating file
//! instead of stdout. The log level is controlled with `RUST_LOG`.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use tracing_appender::{non_blocking::WorkerGuard, rolling::{RollingFileAppender, Rotation}};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_DIR: &str = ".logs";
const LOG_FILE_PREFIX: &str = "melodia";
const DEFAULT_FILTER: &str = "melodia=debug,warn";

/// Installs the global tracing subscriber.
///
/// The returned guard flushes buffered log lines when dropped, so it must be
/// held for the lifetime of the application.
pub(crate) fn init_logging() -> Result<WorkerGuard> {
    let log_dir = Path::new(LOG_DIR);
    if !log_dir.exists() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!("Logging initialized - logs written to {}/", LOG_DIR);

    Ok(guard)
}
