//! Error types for the command-line harness.

use lineseek::SearchError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by harness commands.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Search session failure
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Failed to write a fixture file
    #[error("Failed to write fixture {path}: {source}")]
    Fixture {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to read the file for the linear reference
    #[error("Failed to read {path}: {source}")]
    Reference {
        /// File being scanned
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A command-line key could not be parsed as the selected key type
    #[error("Invalid {key_type} key '{value}': {reason}")]
    InvalidKey {
        /// Raw argument
        value: String,
        /// Selected key type
        key_type: &'static str,
        /// Parser message
        reason: String,
    },

    /// Invalid option combination
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to write results to stdout
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// JSON encoding failed
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Differential check found disagreements
    #[error("Verification failed: {mismatches} mismatches")]
    VerificationFailed {
        /// Number of mismatching queries
        mismatches: usize,
    },
}

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;
