//! Search session configuration.
//!
//! The codec decides how lines are split and typed; `SearchConfig` holds the
//! knobs that change how the session walks the file.
//!
//! # Example
//!
//! ```
//! use lineseek::SearchConfig;
//!
//! let config = SearchConfig::default()
//!     .with_unique(false)
//!     .with_backtrack_step(64);
//! config.validate().expect("valid configuration");
//!
//! assert!(!config.unique);
//! assert_eq!(config.backtrack_step, 64);
//! ```

use crate::error::ConfigError;

/// Default distance in bytes between backtracking probes
pub const DEFAULT_BACKTRACK_STEP: u64 = 20;

/// Session options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Each key appears on at most one line.
    ///
    /// When `false`, lookups return every record of a key-run, which costs a
    /// backtracking scan per lookup.
    pub unique: bool,

    /// Bytes to step back per probe when looking for the start of a key-run
    pub backtrack_step: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            unique: true,
            backtrack_step: DEFAULT_BACKTRACK_STEP,
        }
    }
}

impl SearchConfig {
    /// Set whether keys are unique.
    #[must_use]
    pub const fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Set the backtracking step.
    #[must_use]
    pub const fn with_backtrack_step(mut self, step: u64) -> Self {
        self.backtrack_step = step;
        self
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroBacktrackStep`] if the step is zero.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.backtrack_step == 0 {
            return Err(ConfigError::ZeroBacktrackStep);
        }
        Ok(())
    }
}
