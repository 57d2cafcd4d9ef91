//! Error types for script-dl
//!
//! Errors are split by pipeline stage so workers can report the exact
//! failure category for an item:
//! - [`ScrapeError`] — transport, status, and content-block extraction
//! - [`PersistError`] — artifact creation and writing, per artifact and op
//! - [`Error`] — crate-level errors, including pre-pipeline configuration
//!   failures (the only errors that abort a run)

use std::path::PathBuf;
use thiserror::Error;

use crate::types::FailureKind;

/// Result type alias for script-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for script-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "endpoint")
        key: Option<String>,
    },

    /// Scrape failure (transport, status, or extraction)
    #[error("scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    /// Artifact persistence failure
    #[error("persistence error: {0}")]
    Persist(#[from] PersistError),

    /// Network error outside the per-item scrape path
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error (config files)
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Feature CSV has an unexpected shape
    #[error("invalid feature file {path}: {reason}")]
    InvalidFeatureFile {
        /// The offending CSV path
        path: PathBuf,
        /// Why the file was rejected
        reason: String,
    },

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Per-item scrape errors
///
/// Each variant is terminal for its work item; none abort the pool.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Request could not be completed (connect, timeout, body read)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("unexpected status code {status} for {url}")]
    UnexpectedStatus {
        /// The HTTP status code returned
        status: u16,
        /// The requested URL
        url: String,
    },

    /// Zero or multiple content blocks were found in the page
    ///
    /// Pages for unknown titles still carry an empty placeholder container,
    /// so zero matches means "not found" and multiple matches means the page
    /// layout is ambiguous; neither can be resolved automatically.
    #[error("expected 1 content block, found {found}")]
    MatchCount {
        /// How many non-empty content blocks were found
        found: usize,
    },
}

/// Per-item artifact persistence errors
///
/// Open and write failures are distinct variants per artifact because each
/// maps to a different report category.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Failed to create the text artifact
    #[error("failed to create {path}: {source}")]
    TxtOpen {
        /// The text artifact path
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to write the text artifact
    #[error("failed to write {path}: {source}")]
    TxtWrite {
        /// The text artifact path
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to create the metadata artifact
    #[error("failed to create {path}: {source}")]
    MetaOpen {
        /// The metadata artifact path
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to write the metadata artifact
    #[error("failed to write {path}: {source}")]
    MetaWrite {
        /// The metadata artifact path
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

impl PersistError {
    /// The report category this persistence failure maps to
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            PersistError::TxtOpen { .. } => FailureKind::TxtOpen,
            PersistError::TxtWrite { .. } => FailureKind::TxtWrite,
            PersistError::MetaOpen { .. } => FailureKind::MetaOpen,
            PersistError::MetaWrite { .. } => FailureKind::MetaWrite,
        }
    }
}
