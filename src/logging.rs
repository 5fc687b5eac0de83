// SPDX-License-Identifier: MIT
//
// File logging.
//
// stdout is the screen, so nothing may ever be logged there. A subscriber is
// installed only when TILDE_LOG names a file; the fmt layer writes plain
// text (no ANSI) through a non-rotating tracing-appender file writer.
//
//   TILDE_LOG=/tmp/tilde.log TILDE_LOG_LEVEL=trace tilde notes.txt

use std::path::{Path, PathBuf};

use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Path of the log file. Unset means no logging.
pub const LOG_ENV: &str = "TILDE_LOG";

/// Maximum level: `off`, `error`, `warn`, `info`, `debug`, `trace`.
pub const LEVEL_ENV: &str = "TILDE_LOG_LEVEL";

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("log path has no file name: {}", .0.display())]
    NoFileName(PathBuf),

    #[error("invalid log level: {0}")]
    Level(String),

    #[error("cannot create log file {}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: tracing_appender::rolling::InitError,
    },

    #[error("cannot install the log subscriber")]
    Install(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Level filter from the `TILDE_LOG_LEVEL` value, `info` when unset.
pub fn parse_level(value: Option<&str>) -> Result<LevelFilter, LogError> {
    match value.map(str::trim) {
        None | Some("") => Ok(LevelFilter::INFO),
        Some(s) => s.parse().map_err(|_| LogError::Level(s.to_string())),
    }
}

/// A writer that appends to exactly `path`, never rotating.
pub fn file_appender(path: &Path) -> Result<RollingFileAppender, LogError> {
    let name = path
        .file_name()
        .ok_or_else(|| LogError::NoFileName(path.to_path_buf()))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(dir)
        .map_err(|source| LogError::Create {
            path: path.to_path_buf(),
            source,
        })
}

/// Install the global subscriber if `path` is set.
///
/// Returns whether logging is on.
pub fn init(path: Option<&Path>, level: Option<&str>) -> Result<bool, LogError> {
    let Some(path) = path else {
        return Ok(false);
    };
    let level = parse_level(level)?;
    let appender = file_appender(path)?;

    tracing_subscriber::fmt()
        .with_writer(appender)
        .with_ansi(false)
        .with_max_level(level)
        .try_init()
        .map_err(LogError::Install)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), %level, "logging started");
    Ok(true)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
