//! Table-of-contents records.
//!
//! TOCs come in four shapes, selected by the table's type tag. All four
//! share the same prolog after the record header: `size_table: u64`,
//! `numb_entry: u32`, `size_entry: u32`. Each entry then begins with its own
//! 16-byte record header whose tag selects the entry layout:
//!
//! - pointer tables (`FTOC/IMAG/VOLM/NEXT/THMB/NSET`) — one absolute file
//!   offset per entry, bucketed by the entry tag;
//! - text tables (`TTOC`) — `TOFF` entries carrying an index + pointer pair;
//! - inline tables (`IBOX`) — `IDAT` entries carrying `(size_entry − 16) / 4`
//!   raw sample words, one scan line per entry;
//! - volume index tables (`VTOC`) — `VOFF` entries carrying point/line
//!   counters and the absolute pointer to that line's first point record.
//!
//! A table whose declared record size is 0 is a legitimately absent table
//! and decodes to an empty TOC of the expected shape. A zero-size entry is
//! skipped without consuming a payload. An entry tag outside the table's
//! known set is a fatal decode error.

use std::io::{Read, Seek};

use crate::error::{ArdfError, Result};
use crate::io::ardf::record::{RecordHeader, RecordTag};
use crate::io::ardf::stream::ArdfStream;

/// Pointer table: absolute file offsets bucketed by entry tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointerToc {
    /// Total byte span of the table, header included.
    pub size_table: u64,
    /// `IMAG` entries: image branch offsets.
    pub images: Vec<u64>,
    /// `VOLM` entries: volume branch offsets.
    pub volumes: Vec<u64>,
    /// `NEXT` entries.
    pub next: Vec<u64>,
    /// `NSET` entries.
    pub nset: Vec<u64>,
    /// `THMB` entries: thumbnail offsets.
    pub thumbnails: Vec<u64>,
}

/// Text table: parallel index/pointer arrays from `TOFF` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextToc {
    pub size_table: u64,
    pub indices: Vec<u64>,
    pub pointers: Vec<u64>,
}

/// Inline sample table: one row of raw `i32` words per `IDAT` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineToc {
    pub size_table: u64,
    pub rows: Vec<Vec<i32>>,
}

/// Volume index table: per-line counters and line pointers from `VOFF`
/// entries. A line pointer of 0 means no data is stored for that line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeIndexToc {
    pub size_table: u64,
    pub point_counters: Vec<u32>,
    pub line_counters: Vec<u32>,
    pub line_pointers: Vec<u64>,
}

/// A decoded table of contents, one variant per table shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Toc {
    Pointer(PointerToc),
    Text(TextToc),
    Inline(InlineToc),
    VolumeIndex(VolumeIndexToc),
}

/// The table shape a given tag decodes as.
fn table_class(tag: RecordTag) -> Option<TocClass> {
    match tag {
        RecordTag::FTOC
        | RecordTag::IMAG
        | RecordTag::VOLM
        | RecordTag::NEXT
        | RecordTag::THMB
        | RecordTag::NSET => Some(TocClass::Pointer),
        RecordTag::TTOC | RecordTag::TOFF => Some(TocClass::Text),
        RecordTag::IBOX | RecordTag::IDAT => Some(TocClass::Inline),
        RecordTag::VTOC | RecordTag::VOFF => Some(TocClass::VolumeIndex),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TocClass {
    Pointer,
    Text,
    Inline,
    VolumeIndex,
}

/// Read a TOC at `at` (or the current cursor), requiring `expected` as the
/// table tag. A record declaring size 0 yields an empty table.
pub fn read_toc<R: Read + Seek>(
    stream: &mut ArdfStream<R>,
    at: Option<u64>,
    expected: RecordTag,
) -> Result<Toc> {
    let class = table_class(expected).ok_or(ArdfError::UnknownRecordType {
        tag: expected,
        offset: at.unwrap_or(0),
    })?;

    let header = RecordHeader::read(stream, at)?;
    if header.size == 0 {
        return Ok(empty_toc(class));
    }
    header.expect(expected)?;

    let size_table = stream.read_u64()?;
    let numb_entry = stream.read_u32()?;
    let size_entry = stream.read_u32()?;

    match class {
        TocClass::Pointer => read_pointer_entries(stream, size_table, numb_entry),
        TocClass::Text => read_text_entries(stream, size_table, numb_entry),
        TocClass::Inline => read_inline_entries(stream, size_table, numb_entry, size_entry),
        TocClass::VolumeIndex => read_volume_entries(stream, size_table, numb_entry),
    }
}

fn empty_toc(class: TocClass) -> Toc {
    match class {
        TocClass::Pointer => Toc::Pointer(PointerToc::default()),
        TocClass::Text => Toc::Text(TextToc::default()),
        TocClass::Inline => Toc::Inline(InlineToc::default()),
        TocClass::VolumeIndex => Toc::VolumeIndex(VolumeIndexToc::default()),
    }
}

fn read_pointer_entries<R: Read + Seek>(
    stream: &mut ArdfStream<R>,
    size_table: u64,
    numb_entry: u32,
) -> Result<Toc> {
    let mut toc = PointerToc {
        size_table,
        ..PointerToc::default()
    };
    for _ in 0..numb_entry {
        let entry = RecordHeader::read(stream, None)?;
        if entry.size == 0 {
            continue;
        }
        let bucket = match entry.tag {
            RecordTag::IMAG => &mut toc.images,
            RecordTag::VOLM => &mut toc.volumes,
            RecordTag::NEXT => &mut toc.next,
            RecordTag::NSET => &mut toc.nset,
            RecordTag::THMB => &mut toc.thumbnails,
            tag => {
                return Err(ArdfError::UnknownRecordType {
                    tag,
                    offset: entry.offset,
                })
            }
        };
        bucket.push(stream.read_u64()?);
    }
    Ok(Toc::Pointer(toc))
}

fn read_text_entries<R: Read + Seek>(
    stream: &mut ArdfStream<R>,
    size_table: u64,
    numb_entry: u32,
) -> Result<Toc> {
    let mut toc = TextToc {
        size_table,
        ..TextToc::default()
    };
    for _ in 0..numb_entry {
        let entry = RecordHeader::read(stream, None)?;
        if entry.size == 0 {
            continue;
        }
        entry.expect(RecordTag::TOFF)?;
        toc.indices.push(stream.read_u64()?);
        toc.pointers.push(stream.read_u64()?);
    }
    Ok(Toc::Text(toc))
}

fn read_inline_entries<R: Read + Seek>(
    stream: &mut ArdfStream<R>,
    size_table: u64,
    numb_entry: u32,
    size_entry: u32,
) -> Result<Toc> {
    // Samples per entry come from the table prolog, not the entry headers.
    if size_entry < 16 || (size_entry - 16) % 4 != 0 {
        return Err(ArdfError::InvalidFormat(format!(
            "inline table declares entry size {size_entry}, expected 16 + 4n"
        )));
    }
    let words = ((size_entry - 16) / 4) as usize;

    let mut toc = InlineToc {
        size_table,
        ..InlineToc::default()
    };
    for _ in 0..numb_entry {
        let entry = RecordHeader::read(stream, None)?;
        if entry.size == 0 {
            continue;
        }
        entry.expect(RecordTag::IDAT)?;
        toc.rows.push(stream.read_i32_vec(words)?);
    }
    Ok(Toc::Inline(toc))
}

fn read_volume_entries<R: Read + Seek>(
    stream: &mut ArdfStream<R>,
    size_table: u64,
    numb_entry: u32,
) -> Result<Toc> {
    let mut toc = VolumeIndexToc {
        size_table,
        ..VolumeIndexToc::default()
    };
    for _ in 0..numb_entry {
        let entry = RecordHeader::read(stream, None)?;
        if entry.size == 0 {
            continue;
        }
        entry.expect(RecordTag::VOFF)?;
        toc.point_counters.push(stream.read_u32()?);
        toc.line_counters.push(stream.read_u32()?);
        stream.read_u64()?; // reserved
        toc.line_pointers.push(stream.read_u64()?);
    }
    Ok(Toc::VolumeIndex(toc))
}

/// Read a pointer-class TOC.
pub fn read_pointer_toc<R: Read + Seek>(
    stream: &mut ArdfStream<R>,
    at: Option<u64>,
    expected: RecordTag,
) -> Result<PointerToc> {
    match read_toc(stream, at, expected)? {
        Toc::Pointer(toc) => Ok(toc),
        _ => Err(ArdfError::InvalidFormat(format!(
            "'{expected}' is not a pointer table"
        ))),
    }
}

/// Read a text-class TOC.
pub fn read_text_toc<R: Read + Seek>(
    stream: &mut ArdfStream<R>,
    at: Option<u64>,
    expected: RecordTag,
) -> Result<TextToc> {
    match read_toc(stream, at, expected)? {
        Toc::Text(toc) => Ok(toc),
        _ => Err(ArdfError::InvalidFormat(format!(
            "'{expected}' is not a text table"
        ))),
    }
}

/// Read an inline-class TOC.
pub fn read_inline_toc<R: Read + Seek>(
    stream: &mut ArdfStream<R>,
    at: Option<u64>,
    expected: RecordTag,
) -> Result<InlineToc> {
    match read_toc(stream, at, expected)? {
        Toc::Inline(toc) => Ok(toc),
        _ => Err(ArdfError::InvalidFormat(format!(
            "'{expected}' is not an inline table"
        ))),
    }
}

/// Read a volume-index-class TOC.
pub fn read_volume_index_toc<R: Read + Seek>(
    stream: &mut ArdfStream<R>,
    at: Option<u64>,
    expected: RecordTag,
) -> Result<VolumeIndexToc> {
    match read_toc(stream, at, expected)? {
        Toc::VolumeIndex(toc) => Ok(toc),
        _ => Err(ArdfError::InvalidFormat(format!(
            "'{expected}' is not a volume index table"
        ))),
    }
}
