//! Cursor-tracked little-endian stream primitives.
//!
//! ARDF records are byte-aligned and little-endian throughout. Every reader
//! in this module consumes forward from the current cursor; the only jumps
//! are explicit absolute offsets taken from pointer fields. The cursor
//! position is tracked here so decode errors can report the offending byte
//! offset without an extra seek.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{ArdfError, Result};

/// A position-tracked reader over an ARDF byte stream.
///
/// Generic over `Read + Seek` so decoders run identically on a buffered
/// file handle and on an in-memory `Cursor` in tests.
pub struct ArdfStream<R> {
    inner: R,
    pos: u64,
}

impl ArdfStream<BufReader<File>> {
    /// Open a file for decoding. The handle is closed when the stream is
    /// dropped, on every exit path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read + Seek> ArdfStream<R> {
    /// Wrap a stream positioned at its start.
    pub fn new(inner: R) -> Self {
        Self { inner, pos: 0 }
    }

    /// Current byte offset in the stream.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Seek to an absolute byte offset.
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        self.pos = offset;
        Ok(())
    }

    /// Skip `count` bytes forward.
    pub fn skip(&mut self, count: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Current(count as i64))?;
        self.pos += count;
        Ok(())
    }

    /// Move the cursor `count` bytes backward.
    pub fn rewind_by(&mut self, count: u64) -> Result<()> {
        let target = self.pos.checked_sub(count).ok_or_else(|| {
            ArdfError::InvalidFormat(format!(
                "cannot rewind {count} bytes from offset {}",
                self.pos
            ))
        })?;
        self.seek_to(target)
    }

    fn wrap(&self, e: io::Error) -> ArdfError {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            ArdfError::Truncated { offset: self.pos }
        } else {
            ArdfError::Io(e)
        }
    }

    /// Read a little-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32> {
        let v = self.inner.read_u32::<LittleEndian>().map_err(|e| self.wrap(e))?;
        self.pos += 4;
        Ok(v)
    }

    /// Read a little-endian `u64`.
    pub fn read_u64(&mut self) -> Result<u64> {
        let v = self.inner.read_u64::<LittleEndian>().map_err(|e| self.wrap(e))?;
        self.pos += 8;
        Ok(v)
    }

    /// Read a little-endian `i32`.
    pub fn read_i32(&mut self) -> Result<i32> {
        let v = self.inner.read_i32::<LittleEndian>().map_err(|e| self.wrap(e))?;
        self.pos += 4;
        Ok(v)
    }

    /// Read exactly `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.inner.read_exact(&mut buf).map_err(|e| self.wrap(e))?;
        self.pos += len as u64;
        Ok(buf)
    }

    /// Read a 4-byte tag field.
    pub fn read_tag_bytes(&mut self) -> Result<[u8; 4]> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf).map_err(|e| self.wrap(e))?;
        self.pos += 4;
        Ok(buf)
    }

    /// Read `count` consecutive little-endian `i32` words.
    pub fn read_i32_vec(&mut self, count: usize) -> Result<Vec<i32>> {
        let mut out = vec![0i32; count];
        self.inner
            .read_i32_into::<LittleEndian>(&mut out)
            .map_err(|e| self.wrap(e))?;
        self.pos += 4 * count as u64;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn stream(bytes: Vec<u8>) -> ArdfStream<Cursor<Vec<u8>>> {
        ArdfStream::new(Cursor::new(bytes))
    }

    #[test]
    fn test_primitive_reads_advance_cursor() {
        let mut s = stream(vec![
            0x01, 0x00, 0x00, 0x00, // u32 = 1
            0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // u64 = 2
            0xFF, 0xFF, 0xFF, 0xFF, // i32 = -1
        ]);
        assert_eq!(s.read_u32().unwrap(), 1);
        assert_eq!(s.read_u64().unwrap(), 2);
        assert_eq!(s.read_i32().unwrap(), -1);
        assert_eq!(s.position(), 16);
    }

    #[test]
    fn test_truncated_read_reports_offset() {
        let mut s = stream(vec![0x01, 0x02]);
        match s.read_u32() {
            Err(ArdfError::Truncated { offset }) => assert_eq!(offset, 0),
            other => panic!("expected Truncated, got {other:?}"),
        }
    }

    #[test]
    fn test_seek_skip_rewind() {
        let mut s = stream((0u8..32).collect());
        s.seek_to(8).unwrap();
        s.skip(4).unwrap();
        assert_eq!(s.position(), 12);
        s.rewind_by(8).unwrap();
        assert_eq!(s.position(), 4);
        assert_eq!(s.read_bytes(2).unwrap(), vec![4, 5]);
    }

    #[test]
    fn test_rewind_past_start_fails() {
        let mut s = stream(vec![0u8; 4]);
        assert!(s.rewind_by(1).is_err());
    }

    #[test]
    fn test_read_i32_vec() {
        let mut bytes = Vec::new();
        for v in [3i32, -5, 7] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let mut s = stream(bytes);
        assert_eq!(s.read_i32_vec(3).unwrap(), vec![3, -5, 7]);
    }
}
