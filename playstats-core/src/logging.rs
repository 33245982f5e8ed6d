//! File logging for playstats
//!
//! One file per UTC day under the XDG state directory
//! (`~/.local/state/playstats/playstats.YYYY-MM-DD.log`). Only the newest
//! `[logging] max_files` files are kept. Nothing is written to the terminal,
//! so report output on stdout stays clean for `--export`.

use crate::config::{Config, LoggingConfig, LOG_PREFIX, LOG_SUFFIX};
use crate::error::{Error, Result};
use chrono::Utc;
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Install the global file subscriber.
///
/// `RUST_LOG` overrides `[logging] level`. Fails with [`Error::Logging`] when
/// the appender cannot be built or a subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    let log_dir = Config::state_dir();
    std::fs::create_dir_all(&log_dir)?;

    // Retention of 0 would disable pruning entirely
    let keep = config.max_files.max(1);
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix(LOG_SUFFIX)
        .max_log_files(keep)
        .build(&log_dir)
        .map_err(|e| Error::Logging(e.to_string()))?;

    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    tracing::info!(
        log_file = %log_file_path().display(),
        level = %config.level,
        max_files = keep,
        "Logging initialized"
    );

    Ok(LoggingGuard { _guard: guard })
}

/// Route events to the test harness output. Safe to call from every test.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

/// Flushes buffered log lines when dropped; hold it for the life of `main`.
pub struct LoggingGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Today's log file.
pub fn log_file_path() -> PathBuf {
    Config::log_path(Utc::now().date_naive())
}
