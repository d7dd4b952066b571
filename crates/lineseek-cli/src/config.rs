//! Command-line configuration.
//!
//! Session options come from CLI arguments, then environment variables, then
//! defaults:
//! - `--separator` / `LINESEEK_SEPARATOR` (default `:`)
//! - `--key-type` / `LINESEEK_KEY_TYPE` (`int` or `string`, default `int`)
//! - `--non-unique` / `LINESEEK_NON_UNIQUE`
//! - `--backtrack-step` / `LINESEEK_BACKTRACK_STEP` (default 20)
//!
//! # Example
//!
//! ```
//! use clap::Parser;
//! use lineseek_cli::{Cli, Command};
//!
//! let cli = Cli::parse_from(["lineseek", "find", "data.txt", "42", "--non-unique"]);
//! match cli.command {
//!     Command::Find { session, key, .. } => {
//!         assert_eq!(key, "42");
//!         assert!(!session.search_config().unique);
//!     }
//!     _ => unreachable!(),
//! }
//! ```

use crate::error::{HarnessError, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use lineseek::{DEFAULT_BACKTRACK_STEP, DEFAULT_SEPARATOR, SearchConfig};
use std::fmt;
use std::path::PathBuf;

/// Top-level command line.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "lineseek",
    about = "Binary search and range scans over sorted key/value text files",
    version
)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse from the process arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }
}

/// Harness subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write a sorted fixture file
    Generate(GenerateArgs),

    /// Look up one key
    Find {
        #[command(flatten)]
        session: SessionArgs,
        /// Key to look up
        key: String,
        /// Print results as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Print every record with `min <= key <= max`
    Between {
        #[command(flatten)]
        session: SessionArgs,
        /// Lower key bound (inclusive)
        min: String,
        /// Upper key bound (inclusive)
        max: String,
        /// Print results as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Print the first and last records and the searchable size
    Bounds {
        #[command(flatten)]
        session: SessionArgs,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check lookups and range scans against a linear read of the file
    Verify {
        #[command(flatten)]
        session: SessionArgs,
        /// Number of key windows to check with range scans
        #[arg(long, default_value_t = 100)]
        windows: usize,
    },
}

/// Key type used to decode lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeyType {
    /// Signed 64-bit integers
    Int,
    /// Strings, compared bytewise
    String,
}

impl KeyType {
    /// Lowercase name as used on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::String => "string",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options shared by every command that opens a file.
#[derive(Debug, Clone, Args)]
pub struct SessionArgs {
    /// Sorted key/value file
    pub file: PathBuf,

    /// Separator between key and value
    #[arg(long, env = "LINESEEK_SEPARATOR", default_value = DEFAULT_SEPARATOR)]
    pub separator: String,

    /// Key type
    #[arg(long, value_enum, env = "LINESEEK_KEY_TYPE", default_value_t = KeyType::Int)]
    pub key_type: KeyType,

    /// Keys may repeat on consecutive lines
    #[arg(long, env = "LINESEEK_NON_UNIQUE")]
    pub non_unique: bool,

    /// Bytes per backtracking probe when locating a key-run
    #[arg(long, env = "LINESEEK_BACKTRACK_STEP", default_value_t = DEFAULT_BACKTRACK_STEP)]
    pub backtrack_step: u64,
}

impl SessionArgs {
    /// Library configuration for these options.
    #[must_use]
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig::default()
            .with_unique(!self.non_unique)
            .with_backtrack_step(self.backtrack_step)
    }

    /// Validate session options.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::InvalidConfig` if the separator is empty, and
    /// the library's error for an invalid `SearchConfig`. A missing file is
    /// reported when the session opens.
    pub fn validate(&self) -> Result<()> {
        if self.separator.is_empty() {
            return Err(HarnessError::InvalidConfig(
                "separator must not be empty".to_string(),
            ));
        }
        self.search_config()
            .validate()
            .map_err(|e| HarnessError::Search(e.into()))
    }
}

/// Options for `generate`.
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Output file, overwritten if present
    pub output: PathBuf,

    /// Number of distinct keys
    #[arg(long, default_value_t = 10_000)]
    pub records: usize,

    /// Repeat each key 1 to 10 times
    #[arg(long)]
    pub non_unique: bool,

    /// Separator between key and value
    #[arg(long, env = "LINESEEK_SEPARATOR", default_value = DEFAULT_SEPARATOR)]
    pub separator: String,

    /// RNG seed; a time-based seed is used and logged when omitted
    #[arg(long)]
    pub seed: Option<u64>,
}
