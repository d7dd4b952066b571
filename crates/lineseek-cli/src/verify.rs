//! Differential checks against a linear read of the file.
//!
//! The reference is built by decoding every line in order, which is slow but
//! obviously correct. Every distinct key is then looked up through
//! [`SortedFile`], and a set of key windows is compared with `between`.

use crate::error::{HarnessError, Result};
use lineseek::{LineCodec, Record, SearchConfig, SortedFile};
use serde::Serialize;
use std::fmt::Debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// One query whose answer differed from the reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    /// The query, e.g. `find 42` or `between 10..=20`
    pub query: String,
    /// Reference answer
    pub expected: String,
    /// Answer from the search
    pub actual: String,
}

/// Outcome of a verification run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    /// Lines in the reference
    pub lines: usize,
    /// Distinct keys looked up
    pub keys_checked: usize,
    /// Key windows scanned
    pub ranges_checked: usize,
    /// Disagreements found
    pub mismatches: Vec<Mismatch>,
}

impl VerifyReport {
    /// Whether every query matched the reference
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Decode every non-blank line of `path` in file order.
///
/// # Errors
///
/// Returns `HarnessError::Reference` on read failure and a parse error for
/// the first malformed line.
pub fn load_reference<C: LineCodec>(
    path: &Path,
    codec: &C,
) -> Result<Vec<Record<C::Key, C::Value>>> {
    let wrap = |source| HarnessError::Reference {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = BufReader::new(File::open(path).map_err(wrap)?);
    let mut records = Vec::new();
    let mut line = Vec::new();
    let mut offset = 0u64;

    loop {
        line.clear();
        let read = reader.read_until(b'\n', &mut line).map_err(wrap)?;
        if read == 0 {
            break;
        }
        if !line.iter().all(u8::is_ascii_whitespace) {
            let (key, value) = codec
                .decode(&line)
                .map_err(|source| lineseek::SearchError::Parse { offset, source })?;
            records.push(Record::new(key, value));
        }
        offset += read as u64;
    }

    Ok(records)
}

/// Group consecutive records by key: `(key, start, end)` index ranges.
fn key_runs<K: Ord, V>(records: &[Record<K, V>]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=records.len() {
        if i == records.len() || records[i].key != records[start].key {
            runs.push((start, i));
            start = i;
        }
    }
    runs
}

/// Check `find` for every key and `between` over about `windows` key
/// windows.
///
/// # Errors
///
/// Returns an error if the file cannot be read or opened as a session.
/// Query failures are reported as mismatches instead.
pub fn verify<C>(path: &Path, codec: C, config: SearchConfig, windows: usize) -> Result<VerifyReport>
where
    C: LineCodec,
    C::Value: PartialEq + Debug,
{
    let reference = load_reference(path, &codec)?;
    let mut sorted = SortedFile::open(path, codec, config)?;
    let runs = key_runs(&reference);
    let mut report = VerifyReport {
        lines: reference.len(),
        ..VerifyReport::default()
    };

    debug!(
        "Verifying {} lines, {} distinct keys",
        reference.len(),
        runs.len()
    );

    for &(start, end) in &runs {
        let expected = &reference[start..end];
        let key = &expected[0].key;
        report.keys_checked += 1;

        if config.unique {
            match sorted.find_value(key) {
                Ok(value) if expected.iter().any(|r| r.value == value) => {}
                actual => report.mismatches.push(Mismatch {
                    query: format!("find {key:?}"),
                    expected: format!("one of {:?}", values(expected)),
                    actual: format!("{actual:?}"),
                }),
            }
        } else {
            match sorted.find_all(key) {
                Ok(found) if found == expected => {}
                actual => report.mismatches.push(Mismatch {
                    query: format!("find {key:?}"),
                    expected: format!("{:?}", values(expected)),
                    actual: format!("{:?}", actual.as_ref().map(|found| values(found))),
                }),
            }
        }
    }

    let step = (runs.len() / windows.max(1)).max(1);
    for first in (0..runs.len()).step_by(step) {
        let last = (first + step).min(runs.len() - 1);
        let (low_index, _) = runs[first];
        let (high_start, high_end) = runs[last];
        let low = &reference[low_index].key;
        let high = &reference[high_start].key;
        let expected = &reference[low_index..high_end];
        report.ranges_checked += 1;

        match sorted.between(low, high) {
            Ok(found) if found == expected => {}
            actual => report.mismatches.push(Mismatch {
                query: format!("between {low:?}..={high:?}"),
                expected: format!("{} records", expected.len()),
                actual: match actual {
                    Ok(found) => format!("{} records", found.len()),
                    Err(e) => e.to_string(),
                },
            }),
        }
    }

    if report.is_ok() {
        info!(
            "Verified {} keys and {} ranges: no mismatches",
            report.keys_checked, report.ranges_checked
        );
    } else {
        warn!("{} mismatches", report.mismatches.len());
    }
    Ok(report)
}

fn values<K, V: Debug>(records: &[Record<K, V>]) -> Vec<&V> {
    records.iter().map(|r| &r.value).collect()
}
