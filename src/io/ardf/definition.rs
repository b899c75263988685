//! IDEF/VDEF definition blocks: grid shape and branch title.

use std::io::{Read, Seek};

use crate::error::{ArdfError, Result};
use crate::io::ardf::record::{RecordHeader, RecordTag};
use crate::io::ardf::stream::ArdfStream;
use crate::io::ardf::text::decode_permissive;

/// Fixed skip region between the grid counts and the title, keyed by tag.
const IDEF_SKIP: u32 = 96;
const VDEF_SKIP: u32 = 144;

/// Length of the title field.
const TITLE_LEN: u32 = 32;

/// Grid shape and title of an image or volume branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definition {
    /// Points per scan line.
    pub points: u32,
    /// Number of scan lines.
    pub lines: u32,
    /// Branch title, NUL-stripped.
    pub title: String,
}

/// Read an `IDEF` or `VDEF` record at `at` (or the current cursor).
///
/// The cursor is realigned to the exact end of the record from its declared
/// size, so slack bytes after the title never desynchronize the walk.
pub fn read_definition<R: Read + Seek>(
    stream: &mut ArdfStream<R>,
    at: Option<u64>,
    expected: RecordTag,
) -> Result<Definition> {
    let skip = match expected {
        RecordTag::IDEF => IDEF_SKIP,
        RecordTag::VDEF => VDEF_SKIP,
        tag => {
            return Err(ArdfError::InvalidFormat(format!(
                "'{tag}' is not a definition record tag"
            )))
        }
    };

    let header = RecordHeader::read(stream, at)?;
    header.expect(expected)?;

    let points = stream.read_u32()?;
    let lines = stream.read_u32()?;
    stream.skip(skip as u64)?;
    let title = decode_permissive(&stream.read_bytes(TITLE_LEN as usize)?);

    let remaining = header.size as i64 - 8 - skip as i64 - 16 - TITLE_LEN as i64;
    if remaining < 0 {
        return Err(ArdfError::InvalidFormat(format!(
            "'{expected}' record at offset {} declares size {} smaller than its fixed layout",
            header.offset, header.size
        )));
    }
    stream.skip(remaining as u64)?;

    Ok(Definition {
        points,
        lines,
        title,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn definition_bytes(tag: &[u8; 4], skip: u32, slack: u32) -> Vec<u8> {
        let size = 16 + 8 + skip + 32 + slack;
        let mut out = Vec::new();
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(tag);
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&64u32.to_le_bytes()); // points
        out.extend_from_slice(&32u32.to_le_bytes()); // lines
        out.extend(std::iter::repeat(0u8).take(skip as usize));
        let mut title = [0u8; 32];
        title[..6].copy_from_slice(b"Height");
        out.extend_from_slice(&title);
        out.extend(std::iter::repeat(0xAB).take(slack as usize));
        out
    }

    #[test]
    fn test_read_idef() {
        let mut s = ArdfStream::new(Cursor::new(definition_bytes(b"IDEF", 96, 0)));
        let def = read_definition(&mut s, None, RecordTag::IDEF).unwrap();
        assert_eq!(def.points, 64);
        assert_eq!(def.lines, 32);
        assert_eq!(def.title, "Height");
        assert_eq!(s.position(), 152);
    }

    #[test]
    fn test_read_vdef_realigns_past_slack() {
        let mut s = ArdfStream::new(Cursor::new(definition_bytes(b"VDEF", 144, 12)));
        let def = read_definition(&mut s, None, RecordTag::VDEF).unwrap();
        assert_eq!(def.lines, 32);
        // 16 + 8 + 144 + 32 + 12 slack
        assert_eq!(s.position(), 212);
    }

    #[test]
    fn test_tag_mismatch_is_fatal() {
        let mut s = ArdfStream::new(Cursor::new(definition_bytes(b"IDEF", 96, 0)));
        assert!(matches!(
            read_definition(&mut s, None, RecordTag::VDEF),
            Err(ArdfError::MalformedTag { .. })
        ));
    }

    #[test]
    fn test_undersized_record_is_invalid() {
        let mut bytes = definition_bytes(b"IDEF", 96, 0);
        bytes[4..8].copy_from_slice(&100u32.to_le_bytes()); // too small for the layout
        let mut s = ArdfStream::new(Cursor::new(bytes));
        assert!(matches!(
            read_definition(&mut s, None, RecordTag::IDEF),
            Err(ArdfError::InvalidFormat(_))
        ));
    }
}
