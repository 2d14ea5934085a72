//! Tracing subscriber initialization.
//!
//! The library only emits `tracing` events (queries issued, results applied or
//! discarded, fetch failures, actions). The binary routes them to a log file so
//! stdout stays reserved for the rendered view.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// The directory path that failed to be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid log file path (no filename component)
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// Log path has no parent directory
    #[error("Log path has no parent directory: {0:?}")]
    NoParentDirectory(PathBuf),

    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// `RUST_LOG` if it parses, otherwise `default`.
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Split `log_path` into the directory and file name the appender needs.
fn split_log_path(log_path: &Path) -> Result<(&Path, &str), LoggingError> {
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    let directory = log_path
        .parent()
        .ok_or_else(|| LoggingError::NoParentDirectory(log_path.to_path_buf()))?;

    Ok((directory, file_name))
}

/// Initialize the global subscriber, logging to `log_path` at [`DEFAULT_FILTER`].
///
/// # Errors
///
/// See [`init_with_default`].
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    init_with_default(log_path, DEFAULT_FILTER)
}

/// Initialize the global subscriber with file-based logging.
///
/// Respects `RUST_LOG`, falling back to `default_filter`. Creates the log
/// directory if it doesn't exist. ANSI colours are off.
///
/// # Errors
///
/// Returns `LoggingError::DirectoryCreation` if the directory cannot be made,
/// `LoggingError::InvalidPath` for a path without a UTF-8 file name, and
/// `LoggingError::SubscriberAlreadySet` on a second initialization.
pub fn init_with_default(log_path: &Path, default_filter: &str) -> Result<(), LoggingError> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| LoggingError::DirectoryCreation {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let (directory, file_name) = split_log_path(log_path)?;
    let file_appender = tracing_appender::rolling::never(directory, file_name);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_writer(file_appender)
        .with_ansi(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}


#[cfg(test)]
#[path = "logging_tests.rs"]
mod event_tests;
