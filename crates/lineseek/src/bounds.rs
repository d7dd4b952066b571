//! File bounds resolution
//!
//! The first and last records of a sorted file bracket every key it can hold.
//! They are read once when a session opens so that out-of-range queries and
//! exact hits on either end never touch the file again.

use crate::codec::LineCodec;
use crate::error::{Result, SearchError};
use crate::reader::LineReader;
use std::io::{self, Read, Seek};
use tracing::debug;

/// Chunk size for backward scans from the end of the file
const BACKWARD_CHUNK: usize = 256;

/// Cached minimum and maximum records plus the searchable length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bounds<K, V> {
    /// Key of the first line
    pub min_key: K,
    /// Value of the first line
    pub min_value: V,
    /// Key of the last complete line
    pub max_key: K,
    /// Value of the last complete line
    pub max_value: V,
    /// Offset just past the last line's newline; trailing blank lines are
    /// excluded
    pub file_size: u64,
}

impl<K: Ord, V> Bounds<K, V> {
    /// Read the first and last lines of `reader` and decode them.
    ///
    /// # Errors
    ///
    /// - [`SearchError::EmptyFile`] when the source holds nothing but newlines
    /// - [`SearchError::Parse`] when either boundary line fails to decode
    /// - [`SearchError::Io`] on read failure
    pub fn resolve<R, C>(reader: &mut LineReader<R>, codec: &C) -> Result<Self>
    where
        R: Read + Seek,
        C: LineCodec<Key = K, Value = V>,
    {
        let len = reader.len();
        let content_end = rposition(reader, len, |b| b != b'\n')?.map_or(0, |i| i + 1);
        if content_end == 0 {
            return Err(SearchError::EmptyFile);
        }

        let mut line = Vec::new();
        reader.read_line_at(0, &mut line)?;
        let (min_key, min_value) = codec
            .decode(&line)
            .map_err(|source| SearchError::Parse { offset: 0, source })?;

        let last_start = rposition(reader, content_end, |b| b == b'\n')?.map_or(0, |i| i + 1);
        line.clear();
        line.resize((content_end - last_start) as usize, 0);
        reader.read_exact_at(last_start, &mut line)?;
        let (max_key, max_value) = codec.decode(&line).map_err(|source| SearchError::Parse {
            offset: last_start,
            source,
        })?;

        let file_size = if content_end < len {
            content_end + 1
        } else {
            len
        };

        debug!(
            "Resolved bounds: last line at {last_start}, searchable size {file_size} of {len} bytes"
        );

        Ok(Self {
            min_key,
            min_value,
            max_key,
            max_value,
            file_size,
        })
    }

    /// Check whether `key` lies within `[min_key, max_key]`
    pub fn contains(&self, key: &K) -> bool {
        self.min_key <= *key && *key <= self.max_key
    }

    /// Check whether `[low, high]` intersects `[min_key, max_key]`
    pub fn overlaps(&self, low: &K, high: &K) -> bool {
        low <= high && *low <= self.max_key && *high >= self.min_key
    }
}

/// Offset of the last byte in `[0, end)` matching `pred`, scanning backward.
fn rposition<R: Read + Seek>(
    reader: &mut LineReader<R>,
    end: u64,
    pred: impl Fn(u8) -> bool,
) -> io::Result<Option<u64>> {
    let mut chunk = [0u8; BACKWARD_CHUNK];
    let mut high = end;
    while high > 0 {
        let low = high.saturating_sub(BACKWARD_CHUNK as u64);
        let buf = &mut chunk[..(high - low) as usize];
        reader.read_exact_at(low, buf)?;
        if let Some(i) = buf.iter().rposition(|&b| pred(b)) {
            return Ok(Some(low + i as u64));
        }
        high = low;
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::SeparatedCodec;
    use crate::error::CodecError;
    use std::io::Cursor;

    fn resolve(data: &[u8]) -> Result<Bounds<u32, String>> {
        let mut reader = LineReader::new(Cursor::new(data.to_vec()))?;
        Bounds::resolve(&mut reader, &SeparatedCodec::default())
    }

    #[test]
    fn test_resolve_simple_file() {
        let bounds = resolve(b"10:a\n20:b\n30:c\n40:d\n").unwrap();
        assert_eq!(bounds.min_key, 10);
        assert_eq!(bounds.min_value, "a");
        assert_eq!(bounds.max_key, 40);
        assert_eq!(bounds.max_value, "d");
        assert_eq!(bounds.file_size, 20);
    }

    #[test]
    fn test_resolve_trailing_blank_lines() {
        let bounds = resolve(b"10:a\n20:b\n\n\n\n").unwrap();
        assert_eq!(bounds.max_key, 20);
        assert_eq!(bounds.file_size, 10);
    }

    #[test]
    fn test_resolve_without_trailing_newline() {
        let bounds = resolve(b"10:a\n20:b").unwrap();
        assert_eq!(bounds.max_key, 20);
        assert_eq!(bounds.max_value, "b");
        assert_eq!(bounds.file_size, 9);
    }

    #[test]
    fn test_resolve_single_line() {
        let bounds = resolve(b"7:only\n").unwrap();
        assert_eq!(bounds.min_key, 7);
        assert_eq!(bounds.max_key, 7);
        assert_eq!(bounds.file_size, 7);
    }

    #[test]
    fn test_resolve_long_last_line() {
        let mut data = b"1:short\n".to_vec();
        data.extend_from_slice(format!("2:{}\n", "x".repeat(1000)).as_bytes());
        let bounds = resolve(&data).unwrap();
        assert_eq!(bounds.max_key, 2);
        assert_eq!(bounds.max_value.len(), 1000);
        assert_eq!(bounds.file_size, data.len() as u64);
    }

    #[test]
    fn test_resolve_empty_file() {
        assert!(matches!(resolve(b""), Err(SearchError::EmptyFile)));
        assert!(matches!(resolve(b"\n\n"), Err(SearchError::EmptyFile)));
    }

    #[test]
    fn test_resolve_malformed_boundaries() {
        let err = resolve(b"oops\n20:b\n").unwrap_err();
        assert!(matches!(
            err,
            SearchError::Parse {
                offset: 0,
                source: CodecError::MissingSeparator { .. }
            }
        ));

        let err = resolve(b"10:a\nbad:b\n").unwrap_err();
        assert!(matches!(err, SearchError::Parse { offset: 5, .. }));
    }

    #[test]
    fn test_contains_and_overlaps() {
        let bounds = resolve(b"10:a\n40:d\n").unwrap();
        assert!(bounds.contains(&10));
        assert!(bounds.contains(&25));
        assert!(bounds.contains(&40));
        assert!(!bounds.contains(&9));
        assert!(!bounds.contains(&41));

        assert!(bounds.overlaps(&0, &10));
        assert!(bounds.overlaps(&40, &100));
        assert!(bounds.overlaps(&15, &35));
        assert!(!bounds.overlaps(&41, &100));
        assert!(!bounds.overlaps(&0, &9));
        assert!(!bounds.overlaps(&30, &20));
    }
}
