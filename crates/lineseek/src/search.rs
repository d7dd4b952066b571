//! Binary search over byte offsets
//!
//! The search space is the byte range of the file rather than a list of
//! lines. Each probe picks the midpoint of the current window, skips the
//! fragment of the line it landed in and decodes the next complete line.
//! The compared line therefore sits slightly past the midpoint; the window
//! adjustments below account for that.

use crate::codec::LineCodec;
use crate::error::{Result, SearchError};
use crate::reader::LineReader;
use std::cmp::Ordering;
use std::io::{Read, Seek};
use tracing::trace;

/// Outcome of one binary search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe<V> {
    /// Value of the matching line, if one was found
    pub value: Option<V>,
    /// Reader offset when the search stopped
    pub offset: u64,
    /// Number of lines decoded
    pub iterations: u32,
}

impl<V> Probe<V> {
    const fn miss(offset: u64, iterations: u32) -> Self {
        Self {
            value: None,
            offset,
            iterations,
        }
    }

    /// Check if the search found the target
    pub const fn is_hit(&self) -> bool {
        self.value.is_some()
    }
}

/// Search `[0, file_size)` for a line whose key equals `target`.
///
/// Lines starting at or after `file_size` compare greater than any key, so
/// probes landing in the last line or in trailing blank lines narrow the
/// window downward. The search gives up as soon as an adjustment leaves the
/// window empty or unchanged.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] if a probed line fails to decode and
/// [`SearchError::Io`] on read failure.
pub fn binary_search<R, C>(
    reader: &mut LineReader<R>,
    codec: &C,
    target: &C::Key,
    file_size: u64,
) -> Result<Probe<C::Value>>
where
    R: Read + Seek,
    C: LineCodec,
{
    let mut window = (0, file_size);
    let mut iterations = 0;
    let mut line = Vec::new();

    loop {
        let (low, high) = window;
        let mid = low + (high - low) / 2;
        if mid >= high {
            reader.seek(mid)?;
            return Ok(Probe::miss(mid, iterations));
        }

        iterations += 1;
        let line_start = reader.seek_to_next_line_start(mid)?;
        line.clear();
        let read = if line_start < file_size {
            reader.read_line(&mut line)?
        } else {
            0
        };

        let ordering = if read == 0 {
            Ordering::Greater
        } else {
            let (key, value) = codec.decode(&line).map_err(|source| SearchError::Parse {
                offset: line_start,
                source,
            })?;
            match key.cmp(target) {
                Ordering::Equal => {
                    trace!("Probe {iterations}: hit at offset {line_start}");
                    return Ok(Probe {
                        value: Some(value),
                        offset: reader.position(),
                        iterations,
                    });
                }
                other => other,
            }
        };

        let next = match ordering {
            Ordering::Greater => (low, mid + 1),
            _ => (mid.saturating_sub(1), high),
        };
        trace!(
            "Probe {iterations}: window [{low}, {high}) mid {mid} line {line_start} -> {ordering:?}"
        );

        if next.0 >= next.1 || next == window {
            return Ok(Probe::miss(reader.position(), iterations));
        }
        window = next;
    }
}
