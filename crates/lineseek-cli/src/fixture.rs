//! Sorted fixture files for exercising lookups.
//!
//! Keys start at zero and grow by a random gap each step, so the file holds
//! gaps to miss as well as keys to hit. Each value starts with its key so a
//! wrong answer is easy to spot by eye.

use crate::error::{HarnessError, Result};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Parameters for one fixture file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureSpec {
    /// Number of distinct keys
    pub keys: usize,
    /// Whether each key appears exactly once
    pub unique: bool,
    /// Largest gap between consecutive keys
    pub max_gap: i64,
    /// Largest run of one key when not unique
    pub max_run: usize,
    /// Largest number of `ABC` repetitions in a value
    pub max_repeat: usize,
    /// Separator written between key and value
    pub separator: String,
    /// RNG seed
    pub seed: u64,
}

impl FixtureSpec {
    /// Fixture of `keys` distinct keys, unique, `:`-separated.
    #[must_use]
    pub fn new(keys: usize, seed: u64) -> Self {
        Self {
            keys,
            unique: true,
            max_gap: 10,
            max_run: 10,
            max_repeat: 10,
            separator: lineseek::DEFAULT_SEPARATOR.to_string(),
            seed,
        }
    }

    /// Set whether keys repeat.
    #[must_use]
    pub const fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Set the separator.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

/// What a fixture run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureSummary {
    /// Distinct keys written
    pub keys: usize,
    /// Lines written
    pub lines: usize,
    /// Last key written, `None` for an empty fixture
    pub max_key: Option<i64>,
}

/// Write a fixture to `writer`.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_fixture<W: Write>(spec: &FixtureSpec, writer: &mut W) -> std::io::Result<FixtureSummary> {
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let mut key: i64 = 0;
    let mut summary = FixtureSummary {
        keys: 0,
        lines: 0,
        max_key: None,
    };

    for _ in 0..spec.keys {
        key += rng.random_range(1..=spec.max_gap);
        let run = if spec.unique {
            1
        } else {
            rng.random_range(1..=spec.max_run)
        };
        for _ in 0..run {
            let repeat = rng.random_range(1..=spec.max_repeat);
            writeln!(writer, "{key}{}{key}{}", spec.separator, "ABC".repeat(repeat))?;
        }
        summary.keys += 1;
        summary.lines += run;
        summary.max_key = Some(key);
    }

    Ok(summary)
}

/// Create (or truncate) `path` and write a fixture into it.
///
/// # Errors
///
/// Returns `HarnessError::Fixture` if the file cannot be created or written.
pub fn generate_file(spec: &FixtureSpec, path: &Path) -> Result<FixtureSummary> {
    let wrap = |source| HarnessError::Fixture {
        path: path.to_path_buf(),
        source,
    };

    debug!("Generating fixture {:?} with {:?}", path, spec);
    let file = File::create(path).map_err(wrap)?;
    let mut writer = BufWriter::new(file);
    let summary = write_fixture(spec, &mut writer).map_err(wrap)?;
    writer.flush().map_err(wrap)?;

    info!(
        "Wrote {} lines ({} keys, seed {}) to {}",
        summary.lines,
        summary.keys,
        spec.seed,
        path.display()
    );
    Ok(summary)
}
