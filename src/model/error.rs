//! Error types for recbrowse.
//!
//! This module defines a hierarchical error taxonomy using `thiserror`. Errors compose via
//! `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error for the binary, wrapping every domain failure
//!   - [`InputError`] - Item file reading/decoding failures
//!   - [`BrowserError`] - Controller failures surfaced to the caller
//!     - [`DataSourceError`] - A fetch was rejected by the data source
//!   - [`ConfigError`](crate::config::ConfigError) - Config file failures
//!   - [`LoggingError`](crate::logging::LoggingError) - Tracing setup failures
//!
//! # Error Recovery Strategy
//!
//! Fetch failures are **non-fatal**: the controller leaves the visible page, matched count
//! and selection exactly as they were before the failed request, and the caller decides
//! whether to retry. A stale result is not an error at all and never reaches this module.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all failure modes of the binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read or decode the item file.
    #[error("Failed to load items: {0}")]
    Input(#[from] InputError),

    /// The browser controller reported a failure.
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Writing the rendered view failed.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Errors encountered when loading records from an item file.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified item file does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use recbrowse::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.json")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.json"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was attempted.
        path: PathBuf,
    },

    /// The file is not valid JSON.
    #[error("Invalid JSON in {path}: {reason}")]
    Json {
        /// File being decoded (`<memory>` for in-memory input).
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// The document is an object but has no array under the configured items key.
    #[error("No item array under key '{key}'")]
    MissingItems {
        /// The configured items key.
        key: String,
    },

    /// An element of the item array is not an object.
    #[error("Item {index} is not an object")]
    NotAnObject {
        /// Position of the offending element.
        index: usize,
    },

    /// Generic I/O error reading the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A data source could not produce a result.
///
/// Cloneable so a single failure can be fanned out to tests and log lines alike.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataSourceError {
    /// The backend could not be reached or timed out.
    #[error("Data source unavailable: {0}")]
    Unavailable(String),

    /// The backend refused the query.
    #[error("Query rejected: {reason}")]
    Rejected {
        /// Backend-supplied reason.
        reason: String,
    },

    /// The data source was disposed before the request was made.
    #[error("Data source has been disposed")]
    Disposed,
}

/// Failures reported by the browser controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrowserError {
    /// The fetch for the current generation failed; visible state is unchanged.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] DataSourceError),

    /// The controller was disposed; no further events are accepted.
    #[error("Browser has been disposed")]
    Disposed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_wraps_data_source_error() {
        let err: BrowserError = DataSourceError::Unavailable("timeout".into()).into();
        assert_eq!(err.to_string(), "Fetch failed: Data source unavailable: timeout");
    }

    #[test]
    fn app_error_converts_from_input_error() {
        let err: AppError = InputError::MissingItems {
            key: "items".into(),
        }
        .into();
        assert!(matches!(err, AppError::Input(_)));
        assert!(err.to_string().contains("'items'"));
    }

    #[test]
    fn not_an_object_reports_index() {
        let msg = InputError::NotAnObject { index: 3 }.to_string();
        assert_eq!(msg, "Item 3 is not an object");
    }
}
