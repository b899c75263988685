//! The container walker: one top-to-bottom pass over an ARDF file.
//!
//! The walk validates the file-level `ARDF` record, reads the top-level
//! pointer table and note table, then descends into each image branch
//! (`IMAG` → `TTOC` → `IDEF` → `IBOX` → `GAMI`) and each volume branch
//! (`VOLM` → `TTOC` → `VDEF` → `VCHN`* `XDEF` → `VTOC` → `MLOV`),
//! producing a [`FileStructure`]. Image samples are materialized here;
//! volume waveforms are left behind their line pointers for the channel
//! assembler.

use std::io::{Read, Seek};
use std::path::Path;

use indexmap::IndexMap;
use ndarray::Array2;

use crate::document::{FileStructure, Image, Volume};
use crate::error::{ArdfError, Result};
use crate::io::ardf::definition::read_definition;
use crate::io::ardf::point::read_vset;
use crate::io::ardf::record::{RecordHeader, RecordTag};
use crate::io::ardf::stream::ArdfStream;
use crate::io::ardf::text::{decode_permissive, parse_notes, read_text};
use crate::io::ardf::toc::{
    read_inline_toc, read_pointer_toc, read_text_toc, read_volume_index_toc,
};
use crate::notification::{Notification, NotificationType};

/// Length of a `VCHN` channel-name field.
const CHANNEL_NAME_LEN: usize = 32;

/// Parse a container file into a [`FileStructure`].
///
/// The file handle is held only for the duration of this call and closed on
/// every exit path.
pub fn parse_container<P: AsRef<Path>>(path: P) -> Result<FileStructure> {
    let mut stream = ArdfStream::open(path)?;
    parse_stream(&mut stream)
}

/// Parse a container from any seekable stream positioned anywhere; the walk
/// always starts from offset 0.
pub fn parse_stream<R: Read + Seek>(stream: &mut ArdfStream<R>) -> Result<FileStructure> {
    let file_header = RecordHeader::read(stream, Some(0))?;
    file_header.expect(RecordTag::ARDF)?;

    let ftoc = read_pointer_toc(stream, None, RecordTag::FTOC)?;
    // The note table sits immediately after the top table's declared span.
    let ttoc = read_text_toc(stream, Some(16 + ftoc.size_table), RecordTag::TTOC)?;

    let mut structure = FileStructure::default();

    let main_note = match ttoc.pointers.first() {
        Some(&ptr) => read_text(stream, ptr)?,
        None => String::new(),
    };
    let mut combined_note = main_note.clone();

    for (index, &image_ptr) in ftoc.images.iter().enumerate() {
        let branch = read_image_branch(stream, image_ptr, index)?;
        // The quick note (or failing that the thumbnail note) of the last
        // image branch supplements the file's main note.
        if let Some(extra) = branch.quick_note.or(branch.thumb_note) {
            combined_note = format!("{main_note}{extra}");
        } else {
            combined_note = main_note.clone();
        }
        structure.images.push(branch.image);
    }

    if !combined_note.is_empty() {
        structure.notes = parse_notes(&combined_note);
    }

    for (index, &volume_ptr) in ftoc.volumes.iter().enumerate() {
        let volume = read_volume_branch(stream, volume_ptr, index, &mut structure.notifications)?;
        structure.volumes.push(volume);
    }

    Ok(structure)
}

struct ImageBranch {
    image: Image,
    thumb_note: Option<String>,
    quick_note: Option<String>,
}

fn read_image_branch<R: Read + Seek>(
    stream: &mut ArdfStream<R>,
    branch_ptr: u64,
    index: usize,
) -> Result<ImageBranch> {
    let imag = read_pointer_toc(stream, Some(branch_ptr), RecordTag::IMAG)?;
    let ttoc = read_text_toc(stream, Some(branch_ptr + imag.size_table), RecordTag::TTOC)?;
    let def = read_definition(
        stream,
        Some(branch_ptr + imag.size_table + ttoc.size_table),
        RecordTag::IDEF,
    )?;

    // The sample block is inline: one IDAT row per scan line.
    let ibox = read_inline_toc(stream, None, RecordTag::IBOX)?;
    RecordHeader::read(stream, None)?.expect(RecordTag::GAMI)?;

    let width = ibox.rows.first().map(Vec::len).unwrap_or(0);
    let mut flat = Vec::with_capacity(ibox.rows.len() * width);
    for row in &ibox.rows {
        flat.extend_from_slice(row);
    }
    let data = Array2::from_shape_vec((ibox.rows.len(), width), flat).map_err(|_| {
        ArdfError::InvalidFormat(format!(
            "image {index} ('{}'): ragged inline sample block",
            def.title
        ))
    })?;

    let mut note = IndexMap::new();
    let mut thumb_note = None;
    let mut quick_note = None;
    let multi = ttoc.pointers.len() > 1;
    for (slot, &text_ptr) in ttoc.pointers.iter().enumerate() {
        let text = read_text(stream, text_ptr)?;
        if multi {
            match slot {
                0 => {} // duplicate of the file's main note
                1 => thumb_note = Some(text),
                2 => note = parse_notes(&text),
                3 => quick_note = Some(text),
                _ => {
                    return Err(ArdfError::InvalidFormat(format!(
                        "image {index} ('{}'): unexpected note in slot {slot}, expected at most 4",
                        def.title
                    )))
                }
            }
        } else {
            note = parse_notes(&text);
        }
    }

    Ok(ImageBranch {
        image: Image { def, data, note },
        thumb_note,
        quick_note,
    })
}

fn read_volume_branch<R: Read + Seek>(
    stream: &mut ArdfStream<R>,
    branch_ptr: u64,
    index: usize,
    notifications: &mut Vec<Notification>,
) -> Result<Volume> {
    let volm = read_pointer_toc(stream, Some(branch_ptr), RecordTag::VOLM)?;
    let ttoc = read_text_toc(stream, Some(branch_ptr + volm.size_table), RecordTag::TTOC)?;
    let def = read_definition(
        stream,
        Some(branch_ptr + volm.size_table + ttoc.size_table),
        RecordTag::VDEF,
    )?;

    let mut channels = Vec::new();
    let mut xdef_text = String::new();
    loop {
        let header = RecordHeader::read(stream, None)?;
        match header.tag {
            RecordTag::VCHN => {
                let name = decode_permissive(&stream.read_bytes(CHANNEL_NAME_LEN)?);
                let remaining = header.size as i64 - 16 - CHANNEL_NAME_LEN as i64;
                if remaining < 0 {
                    return Err(ArdfError::InvalidFormat(format!(
                        "VCHN record at offset {} declares size {} smaller than its layout",
                        header.offset, header.size
                    )));
                }
                stream.skip(remaining as u64)?;
                channels.push(name);
            }
            RecordTag::XDEF => {
                stream.read_u32()?; // reserved
                let size_text = stream.read_u32()?;
                xdef_text = decode_permissive(&stream.read_bytes(size_text as usize)?);
                let remaining = header.size as i64 - 16 - 8 - size_text as i64;
                if remaining < 0 {
                    return Err(ArdfError::InvalidFormat(format!(
                        "XDEF record at offset {} declares text length {} beyond its size {}",
                        header.offset, size_text, header.size
                    )));
                }
                stream.skip(remaining as u64)?;
                break;
            }
            tag => {
                return Err(ArdfError::UnknownRecordType {
                    tag,
                    offset: header.offset,
                })
            }
        }
    }

    let vtoc = read_volume_index_toc(stream, None, RecordTag::VTOC)?;
    RecordHeader::read(stream, None)?.expect(RecordTag::MLOV)?;

    // Direction flags come from the first stored line: a line number that
    // differs from its nominal row means the physical storage order is
    // reversed; a first point index of 0 means the forward sweep is stored
    // first.
    let mut scan_down = false;
    let mut trace_first = true;
    let mut derived = false;
    for (row, &line_ptr) in vtoc.line_pointers.iter().enumerate() {
        if line_ptr != 0 {
            let vset = read_vset(stream, Some(line_ptr))?;
            scan_down = vset.line as usize != row;
            trace_first = vset.point == 0;
            derived = true;
            break;
        }
    }
    if !derived {
        notifications.push(Notification::new(
            NotificationType::Warning,
            format!(
                "volume {index} ('{}'): no stored lines, direction flags defaulted",
                def.title
            ),
        ));
    }

    let missing = vtoc.line_pointers.iter().filter(|&&p| p == 0).count();
    if missing > 0 && derived {
        notifications.push(Notification::new(
            NotificationType::MissingData,
            format!(
                "volume {index} ('{}'): {missing} of {} lines have no stored data",
                def.title,
                vtoc.line_pointers.len()
            ),
        ));
    }

    Ok(Volume {
        def,
        channels,
        xdef_text,
        line_pointers: vtoc.line_pointers,
        scan_down,
        trace_first,
    })
}
