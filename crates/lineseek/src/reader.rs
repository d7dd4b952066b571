//! Buffered line access at arbitrary byte offsets

use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};

/// Buffered reader over a seekable source that tracks its own position.
///
/// Every search and scan goes through one `LineReader`, which owns the only
/// cursor on the underlying handle. Seeks within the current buffer reuse it
/// instead of issuing a new read.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: BufReader<R>,
    position: u64,
    len: u64,
}

impl<R: Read + Seek> LineReader<R> {
    /// Wrap a seekable source, measuring its length.
    pub fn new(inner: R) -> io::Result<Self> {
        let mut inner = BufReader::new(inner);
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self {
            inner,
            position: 0,
            len,
        })
    }

    /// Total length of the source in bytes
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Check if the source has no bytes
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current cursor offset
    pub const fn position(&self) -> u64 {
        self.position
    }

    /// Move the cursor to `offset`.
    pub fn seek(&mut self, offset: u64) -> io::Result<()> {
        if offset == self.position {
            return Ok(());
        }
        match (i64::try_from(offset), i64::try_from(self.position)) {
            (Ok(target), Ok(current)) => self.inner.seek_relative(target - current)?,
            _ => {
                self.inner.seek(SeekFrom::Start(offset))?;
            }
        }
        self.position = offset;
        Ok(())
    }

    /// Append the line under the cursor (newline included) to `buf`.
    ///
    /// Returns the number of bytes read; zero means end of file.
    pub fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        let read = self.inner.read_until(b'\n', buf)?;
        self.position += read as u64;
        Ok(read)
    }

    /// Seek to `offset` and read the line starting there.
    pub fn read_line_at(&mut self, offset: u64, buf: &mut Vec<u8>) -> io::Result<usize> {
        self.seek(offset)?;
        self.read_line(buf)
    }

    /// Seek to `offset`, discard the rest of the line containing it and
    /// return the offset of the following line start.
    ///
    /// The byte at `offset` always belongs to the discarded fragment, even
    /// when `offset` is itself a line start. The result is [`len`](Self::len)
    /// when no further line exists.
    pub fn seek_to_next_line_start(&mut self, offset: u64) -> io::Result<u64> {
        self.seek(offset)?;
        let skipped = self.inner.skip_until(b'\n')?;
        self.position += skipped as u64;
        Ok(self.position)
    }

    /// Fill `buf` with the bytes starting at `offset`.
    pub fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        self.seek(offset)?;
        self.inner.read_exact(buf)?;
        self.position += buf.len() as u64;
        Ok(())
    }

    /// Release the reader, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const DATA: &[u8] = b"10:a\n20:bb\n30:ccc\n";

    fn reader() -> LineReader<Cursor<&'static [u8]>> {
        LineReader::new(Cursor::new(DATA)).unwrap()
    }

    #[test]
    fn test_len_and_position() {
        let r = reader();
        assert_eq!(r.len(), 18);
        assert!(!r.is_empty());
        assert_eq!(r.position(), 0);

        let empty = LineReader::new(Cursor::new(Vec::new())).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_read_lines_in_order() {
        let mut r = reader();
        let mut buf = Vec::new();
        assert_eq!(r.read_line(&mut buf).unwrap(), 5);
        assert_eq!(buf, b"10:a\n");
        assert_eq!(r.position(), 5);

        buf.clear();
        r.read_line(&mut buf).unwrap();
        assert_eq!(buf, b"20:bb\n");

        buf.clear();
        r.read_line(&mut buf).unwrap();
        buf.clear();
        assert_eq!(r.read_line(&mut buf).unwrap(), 0);
        assert_eq!(r.position(), 18);
    }

    #[test]
    fn test_next_line_start_mid_line() {
        let mut r = reader();
        // Offsets 0..=4 belong to the first line, 5..=10 to the second
        for offset in 0..5 {
            assert_eq!(r.seek_to_next_line_start(offset).unwrap(), 5);
        }
        for offset in 5..11 {
            assert_eq!(r.seek_to_next_line_start(offset).unwrap(), 11);
        }
    }

    #[test]
    fn test_next_line_start_at_end() {
        let mut r = reader();
        assert_eq!(r.seek_to_next_line_start(11).unwrap(), 18);
        assert_eq!(r.seek_to_next_line_start(17).unwrap(), 18);
        assert_eq!(r.seek_to_next_line_start(18).unwrap(), 18);
    }

    #[test]
    fn test_next_line_start_without_trailing_newline() {
        let mut r = LineReader::new(Cursor::new(b"1:a\n2:b".as_slice())).unwrap();
        assert_eq!(r.seek_to_next_line_start(5).unwrap(), 7);
        let mut buf = Vec::new();
        assert_eq!(r.read_line(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_backward_and_forward_seeks() {
        let mut r = reader();
        let mut buf = Vec::new();
        r.read_line_at(11, &mut buf).unwrap();
        assert_eq!(buf, b"30:ccc\n");

        buf.clear();
        r.read_line_at(5, &mut buf).unwrap();
        assert_eq!(buf, b"20:bb\n");

        let mut bytes = [0u8; 4];
        r.read_exact_at(0, &mut bytes).unwrap();
        assert_eq!(&bytes, b"10:a");
        assert_eq!(r.position(), 4);
    }
}
