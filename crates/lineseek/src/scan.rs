//! Key-range scans
//!
//! A range scan needs the first line of a possibly long run of equal keys.
//! Binary search only lands somewhere inside or next to that run, so the
//! scanner walks backward in fixed steps until it sees a key below the range,
//! then reads forward line by line.
//!
//! Long runs of a single key cost one backward probe per step; the scan stays
//! correct but slows down linearly with the run length.

use crate::codec::LineCodec;
use crate::error::{Result, SearchError};
use crate::reader::LineReader;
use crate::record::Record;
use std::io::{Read, Seek};
use std::iter::FusedIterator;
use tracing::trace;

/// Find where a forward scan for keys `>= low` has to start.
///
/// Probes `seed - step`, `seed - 2*step`, ... while the probe offset stays
/// above zero. Each probe decodes the first complete line after it; the scan
/// starts right after the first line whose key is below `low`. Returns 0 if
/// no such line turns up.
///
/// # Errors
///
/// A probed line that fails to decode is fatal: it would decide where the
/// scan begins.
pub fn locate_scan_start<R, C>(
    reader: &mut LineReader<R>,
    codec: &C,
    low: &C::Key,
    seed: u64,
    step: u64,
    file_size: u64,
) -> Result<u64>
where
    R: Read + Seek,
    C: LineCodec,
{
    let mut line = Vec::new();
    let mut probe = seed.checked_sub(step);

    while let Some(offset) = probe.filter(|&offset| offset > 0) {
        let line_start = reader.seek_to_next_line_start(offset)?;
        // Probes near the end may land past the last line; keep backing off
        if line_start < file_size {
            line.clear();
            reader.read_line(&mut line)?;
            let (key, _) = codec.decode(&line).map_err(|source| SearchError::Parse {
                offset: line_start,
                source,
            })?;
            trace!("Backtrack probe at {offset}: line {line_start} key {key:?}");
            if key < *low {
                return Ok(reader.position());
            }
        }
        probe = offset.checked_sub(step);
    }

    Ok(0)
}

/// Lazy forward scan yielding every record with `low <= key <= high`.
///
/// Lines with keys below `low` are skipped, the scan stops at the first key
/// above `high`. A line that fails to decode is yielded as an error and the
/// scan moves on to the next line; I/O errors end the scan.
pub struct RangeScan<'a, R, C: LineCodec> {
    reader: &'a mut LineReader<R>,
    codec: &'a C,
    low: C::Key,
    high: C::Key,
    end: u64,
    line: Vec<u8>,
    done: bool,
}

impl<'a, R: Read + Seek, C: LineCodec> RangeScan<'a, R, C> {
    /// Start scanning at `start`, stopping at `end` at the latest.
    pub(crate) fn new(
        reader: &'a mut LineReader<R>,
        codec: &'a C,
        low: C::Key,
        high: C::Key,
        start: u64,
        end: u64,
    ) -> Result<Self> {
        reader.seek(start)?;
        Ok(Self {
            reader,
            codec,
            low,
            high,
            end,
            line: Vec::new(),
            done: false,
        })
    }

    /// A scan that yields nothing.
    pub(crate) fn empty(
        reader: &'a mut LineReader<R>,
        codec: &'a C,
        low: C::Key,
        high: C::Key,
    ) -> Self {
        Self {
            reader,
            codec,
            low,
            high,
            end: 0,
            line: Vec::new(),
            done: true,
        }
    }

    /// Offset of the next line to be read
    pub fn position(&self) -> u64 {
        self.reader.position()
    }
}

impl<R: Read + Seek, C: LineCodec> Iterator for RangeScan<'_, R, C> {
    type Item = Result<Record<C::Key, C::Value>>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let line_start = self.reader.position();
            if line_start >= self.end {
                self.done = true;
                break;
            }

            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => {
                    self.done = true;
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }

            let (key, value) = match self.codec.decode(&self.line) {
                Ok(pair) => pair,
                Err(source) => {
                    return Some(Err(SearchError::Parse {
                        offset: line_start,
                        source,
                    }));
                }
            };

            if key < self.low {
                continue;
            }
            if key > self.high {
                self.done = true;
                break;
            }
            return Some(Ok(Record::new(key, value)));
        }
        None
    }
}

impl<R: Read + Seek, C: LineCodec> FusedIterator for RangeScan<'_, R, C> {}
