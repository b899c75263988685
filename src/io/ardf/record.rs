//! Record tags and the fixed 16-byte record prolog.
//!
//! Every ARDF record begins with the same prolog: a CRC-32 word, the
//! declared record size in bytes (prolog included), a 4-byte ASCII type tag
//! (never NUL-terminated), and one miscellaneous word. Which bytes follow
//! depends entirely on the tag, so reading the prolog performs no
//! validation; the caller checks the tag against what its position in the
//! walk requires.

use std::fmt;
use std::io::{Read, Seek};

use crate::error::{ArdfError, Result};
use crate::io::ardf::stream::ArdfStream;

/// A 4-byte ASCII record type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordTag(pub [u8; 4]);

impl RecordTag {
    /// File-level magic record.
    pub const ARDF: RecordTag = RecordTag(*b"ARDF");
    /// Top-level pointer table.
    pub const FTOC: RecordTag = RecordTag(*b"FTOC");
    /// Text-pointer table.
    pub const TTOC: RecordTag = RecordTag(*b"TTOC");
    /// Text-pointer table entry (index + pointer).
    pub const TOFF: RecordTag = RecordTag(*b"TOFF");
    /// Image branch table / pointer-table entry.
    pub const IMAG: RecordTag = RecordTag(*b"IMAG");
    /// Volume branch table / pointer-table entry.
    pub const VOLM: RecordTag = RecordTag(*b"VOLM");
    /// Pointer-table entry: next-file pointer.
    pub const NEXT: RecordTag = RecordTag(*b"NEXT");
    /// Pointer-table entry: thumbnail pointer.
    pub const THMB: RecordTag = RecordTag(*b"THMB");
    /// Pointer-table entry.
    pub const NSET: RecordTag = RecordTag(*b"NSET");
    /// Inline image sample table.
    pub const IBOX: RecordTag = RecordTag(*b"IBOX");
    /// Inline image sample table entry (one line of samples).
    pub const IDAT: RecordTag = RecordTag(*b"IDAT");
    /// Volume line-pointer table.
    pub const VTOC: RecordTag = RecordTag(*b"VTOC");
    /// Volume line-pointer table entry.
    pub const VOFF: RecordTag = RecordTag(*b"VOFF");
    /// Image definition (grid shape + title).
    pub const IDEF: RecordTag = RecordTag(*b"IDEF");
    /// Volume definition (grid shape + title).
    pub const VDEF: RecordTag = RecordTag(*b"VDEF");
    /// Free-text note record.
    pub const TEXT: RecordTag = RecordTag(*b"TEXT");
    /// Volume channel name.
    pub const VCHN: RecordTag = RecordTag(*b"VCHN");
    /// Channel-list terminator carrying an auxiliary text blob.
    pub const XDEF: RecordTag = RecordTag(*b"XDEF");
    /// Image branch terminator.
    pub const GAMI: RecordTag = RecordTag(*b"GAMI");
    /// Volume branch terminator.
    pub const MLOV: RecordTag = RecordTag(*b"MLOV");
    /// Point header record.
    pub const VSET: RecordTag = RecordTag(*b"VSET");
    /// Point name record.
    pub const VNAM: RecordTag = RecordTag(*b"VNAM");
    /// Point waveform record (one per channel).
    pub const VDAT: RecordTag = RecordTag(*b"VDAT");
    /// End-of-point filler record.
    pub const XDAT: RecordTag = RecordTag(*b"XDAT");

    /// Construct a tag from raw bytes.
    pub const fn new(bytes: [u8; 4]) -> Self {
        RecordTag(bytes)
    }

    /// The raw tag bytes.
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for RecordTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

/// The fixed 16-byte prolog of every ARDF record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Declared CRC-32 of the record. Not verified by this decoder.
    pub crc32: u32,
    /// Declared record size in bytes, prolog included.
    pub size: u32,
    /// The 4-byte type tag.
    pub tag: RecordTag,
    /// Miscellaneous word; meaning depends on the record type.
    pub misc: u32,
    /// Byte offset of the record's first byte, for error reporting.
    pub offset: u64,
}

impl RecordHeader {
    /// Read a record prolog at `at`, or at the current cursor when `None`.
    ///
    /// Consumes exactly 16 bytes and leaves the cursor at the start of the
    /// record payload.
    pub fn read<R: Read + Seek>(
        stream: &mut ArdfStream<R>,
        at: Option<u64>,
    ) -> Result<RecordHeader> {
        if let Some(offset) = at {
            stream.seek_to(offset)?;
        }
        let offset = stream.position();
        let crc32 = stream.read_u32()?;
        let size = stream.read_u32()?;
        let tag = RecordTag(stream.read_tag_bytes()?);
        let misc = stream.read_u32()?;
        Ok(RecordHeader {
            crc32,
            size,
            tag,
            misc,
            offset,
        })
    }

    /// Fail with [`ArdfError::MalformedTag`] unless this record carries the
    /// expected tag.
    pub fn expect(&self, expected: RecordTag) -> Result<()> {
        if self.tag == expected {
            Ok(())
        } else {
            Err(ArdfError::MalformedTag {
                expected,
                found: self.tag,
                offset: self.offset,
            })
        }
    }
}
