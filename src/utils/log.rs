// src/utils/log.rs

//! Log sink setup with server-style formatting.
//!
//! Lines look like `[2026-01-01 12:00:00] [INFO] message` and go either to
//! stderr or, when configured, to an append-only file.

use chrono::Local;
use log::{Level, Record};

/// Target marking records that must surface as CRITICAL.
///
/// The `log` facade stops at `error`, so critical records are error records
/// sent to this target.
pub const CRITICAL: &str = "critical";

/// Level label for a record, honoring the critical target.
pub fn level_label(record: &Record<'_>) -> &'static str {
    if record.target() == CRITICAL {
        return "CRITICAL";
    }
    match record.level() {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

/// Format a log record with timestamp and level.
pub fn format_line(record: &Record<'_>) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("[{}] [{}] {}", timestamp, level_label(record), record.args())
}

/// Initialize the global logger.
///
/// `RUST_LOG` wins over the configured level; `verbose` forces debug.
#[cfg(feature = "cli")]
pub fn init(
    config: &crate::models::LoggingConfig,
    verbose: bool,
) -> crate::error::Result<()> {
    use std::fs::OpenOptions;
    use std::io::Write;

    use env_logger::{Builder, Env, Target};

    let level = if verbose { "debug" } else { config.level.as_str() };
    let mut builder = Builder::from_env(Env::default().default_filter_or(level));
    builder.format(|buf, record| writeln!(buf, "{}", format_line(record)));

    if let Some(path) = config.sink_path() {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder
        .try_init()
        .map_err(|e| crate::error::AppError::config(format!("logger already set: {e}")))
}
