//! Error types for sorted file lookups.
//!
//! All errors use thiserror for consistent error handling across the codebase.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for lookup operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors produced while decoding a single line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Line bytes are not valid UTF-8
    #[error("Line is not valid UTF-8")]
    InvalidUtf8,

    /// Separator does not occur in the line
    #[error("Missing separator '{separator}' in line: {line:?}")]
    MissingSeparator {
        /// Expected separator
        separator: String,
        /// Offending line (newline stripped)
        line: String,
    },

    /// Key field failed type conversion
    #[error("Invalid key {value:?}: {reason}")]
    InvalidKey {
        /// Raw key text
        value: String,
        /// Conversion error message
        reason: String,
    },

    /// Value field failed type conversion
    #[error("Invalid value {value:?}: {reason}")]
    InvalidValue {
        /// Raw value text
        value: String,
        /// Conversion error message
        reason: String,
    },
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Backtrack step must move the cursor
    #[error("Backtrack step must be greater than zero")]
    ZeroBacktrackStep,
}

/// Errors returned by [`SortedFile`](crate::SortedFile) and its helpers.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Failed to open the sorted file
    #[error("Failed to open {path}: {source}")]
    Open {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Seek or read failure on an open file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File holds no line to take bounds from
    #[error("File is empty: no line to establish bounds")]
    EmptyFile,

    /// A line could not be decoded
    #[error("Malformed line at offset {offset}: {source}")]
    Parse {
        /// Byte offset where the line starts
        offset: u64,
        /// Decoder failure
        #[source]
        source: CodecError,
    },

    /// Key is absent or outside the file's key range
    #[error("Key not found: {key}")]
    NotFound {
        /// Debug rendering of the requested key
        key: String,
    },

    /// Invalid search configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SearchError {
    /// Returns `true` for the not-found outcome.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SearchError::NotFound {
            key: "25".to_string(),
        };
        assert_eq!(err.to_string(), "Key not found: 25");
        assert!(err.is_not_found());

        let err = SearchError::Parse {
            offset: 12,
            source: CodecError::MissingSeparator {
                separator: ":".to_string(),
                line: "garbage".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Malformed line at offset 12: Missing separator ':' in line: \"garbage\""
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_config_error_conversion() {
        let err: SearchError = ConfigError::ZeroBacktrackStep.into();
        assert!(err.to_string().contains("Backtrack step"));
    }
}
