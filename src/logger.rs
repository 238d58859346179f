//! Debug logging support for blockmove
//!
//! When debug mode is enabled via config or `--debug`, operations are logged to
//! `blockmove.log` in the configuration directory.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry};

/// File name of the debug log inside the log directory
pub const LOG_FILE_NAME: &str = "blockmove.log";

/// Environment variable overriding the default filter
pub const LOG_ENV: &str = "BLOCKMOVE_LOG";

/// Initialize the debug logging system
///
/// Returns the path to the log file, or None if logging is not enabled.
pub fn init_debug_logging(debug_enabled: bool, log_dir: &Path) -> Result<Option<PathBuf>> {
    if !debug_enabled {
        return Ok(None);
    }

    if let Err(e) = fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))
    {
        // logging must never break a run
        eprintln!("Warning: Could not create log file: {:#}", e);
        return Ok(None);
    }

    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(log_dir)
    {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!(
                "Warning: Could not open log file {}: {}",
                log_dir.join(LOG_FILE_NAME).display(),
                e
            );
            return Ok(None);
        }
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("blockmove=debug"));

    let subscriber = registry()
        .with(
            fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    Ok(Some(log_dir.join(LOG_FILE_NAME)))
}
