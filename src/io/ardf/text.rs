//! TEXT records and `key:value` note parsing.

use std::io::{Read, Seek};

use indexmap::IndexMap;

use crate::error::Result;
use crate::io::ardf::record::{RecordHeader, RecordTag};
use crate::io::ardf::stream::ArdfStream;
use crate::types::Scalar;

/// Decode bytes permissively: UTF-8 first, Windows-1252 as the best-effort
/// fallback for note blobs written by older acquisition software. Embedded
/// NULs are stripped either way.
pub fn decode_permissive(bytes: &[u8]) -> String {
    let decoded = match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (cow, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            cow.into_owned()
        }
    };
    decoded.replace('\0', "")
}

/// Read a `TEXT` record at `at`: reserved word, note length, note bytes.
pub fn read_text<R: Read + Seek>(stream: &mut ArdfStream<R>, at: u64) -> Result<String> {
    let header = RecordHeader::read(stream, Some(at))?;
    header.expect(RecordTag::TEXT)?;

    stream.read_u32()?; // reserved
    let size_note = stream.read_u32()?;
    let bytes = stream.read_bytes(size_note as usize)?;
    Ok(decode_permissive(&bytes))
}

/// Parse a free-text note blob into a key → scalar table.
///
/// Lines are separated by CR; only lines with exactly one `:` are kept.
/// Values are coerced by [`Scalar::parse`]. Later occurrences of a key
/// overwrite earlier ones.
pub fn parse_notes(text: &str) -> IndexMap<String, Scalar> {
    let mut notes = IndexMap::new();
    for line in text.split('\r') {
        let mut parts = line.split(':');
        if let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) {
            notes.insert(key.to_string(), Scalar::parse(value));
        }
    }
    notes
}
