//! Synthetic ARDF fixture builder.
//!
//! Emits byte-exact container files: the file-level record, the top-level
//! pointer and note tables, image branches with inline sample blocks, and
//! volume branches with per-line point-record runs. Pointer fields are
//! back-patched once the pointed-to bytes are laid down.
//!
//! The builder also records the byte offset of every tag field it writes,
//! which the tag-flip fuzz tests use to corrupt tags and nothing else.

#![allow(dead_code)]

use std::path::PathBuf;

const HEADER_LEN: u32 = 16;

/// One image branch: a title and a rectangular block of inline samples.
#[derive(Debug, Clone)]
pub struct ImageSpec {
    pub title: String,
    /// Samples, one row per scan line; all rows the same width.
    pub rows: Vec<Vec<i32>>,
    /// Optional per-image note text.
    pub note: Option<String>,
}

impl ImageSpec {
    pub fn new(title: &str, rows: Vec<Vec<i32>>) -> Self {
        Self {
            title: title.to_string(),
            rows,
            note: None,
        }
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }
}

/// One volume branch.
#[derive(Debug, Clone)]
pub struct VolumeSpec {
    pub title: String,
    pub channels: Vec<String>,
    pub points: u32,
    pub lines: u32,
    /// `waveforms[line][point][channel]` in logical order.
    pub waveforms: Vec<Vec<Vec<Vec<i32>>>>,
    /// Store lines in reverse physical order.
    pub scan_down: bool,
    /// Store points forward (trace) or reversed (retrace-first).
    pub trace_first: bool,
    /// Logical lines emitted with a zero line pointer and no data.
    pub empty_lines: Vec<usize>,
}

impl VolumeSpec {
    /// A volume where every waveform is `base + line*100 + point*10 + channel`.
    pub fn synthetic(title: &str, channels: &[&str], lines: u32, points: u32, wave_len: usize) -> Self {
        let waveforms = (0..lines)
            .map(|l| {
                (0..points)
                    .map(|p| {
                        (0..channels.len())
                            .map(|c| {
                                (0..wave_len)
                                    .map(|i| (l * 100 + p * 10) as i32 + c as i32 + i as i32)
                                    .collect()
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect();
        Self {
            title: title.to_string(),
            channels: channels.iter().map(|c| c.to_string()).collect(),
            points,
            lines,
            waveforms,
            scan_down: false,
            trace_first: true,
            empty_lines: Vec::new(),
        }
    }
}

/// A built fixture: the raw file bytes plus the offsets of all tag fields.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub bytes: Vec<u8>,
    pub tag_offsets: Vec<usize>,
}

impl Fixture {
    /// Write the fixture to a uniquely named file in the system temp dir.
    pub fn write_temp(&self, label: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "ardfrust_{label}_{}.ardf",
            std::process::id()
        ));
        std::fs::write(&path, &self.bytes).expect("write fixture");
        path
    }
}

struct Writer {
    bytes: Vec<u8>,
    tag_offsets: Vec<usize>,
}

impl Writer {
    fn new() -> Self {
        Self {
            bytes: Vec::new(),
            tag_offsets: Vec::new(),
        }
    }

    fn pos(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn u32(&mut self, v: u32) {
        self.bytes.extend_from_slice(&v.to_le_bytes());
    }

    fn u64(&mut self, v: u64) {
        self.bytes.extend_from_slice(&v.to_le_bytes());
    }

    fn i32(&mut self, v: i32) {
        self.bytes.extend_from_slice(&v.to_le_bytes());
    }

    /// Write a record header; crc and misc are zero throughout.
    fn header(&mut self, size: u32, tag: &[u8; 4]) {
        self.u32(0);
        self.u32(size);
        self.tag_offsets.push(self.bytes.len());
        self.bytes.extend_from_slice(tag);
        self.u32(0);
    }

    /// Reserve a u64 pointer field, returning its position for patching.
    fn pointer_slot(&mut self) -> usize {
        let at = self.bytes.len();
        self.u64(0);
        at
    }

    fn patch_u64(&mut self, at: usize, value: u64) {
        self.bytes[at..at + 8].copy_from_slice(&value.to_le_bytes());
    }

    fn text_record(&mut self, text: &str) -> u64 {
        let at = self.pos();
        self.header(24 + text.len() as u32, b"TEXT");
        self.u32(0); // reserved
        self.u32(text.len() as u32);
        self.bytes.extend_from_slice(text.as_bytes());
        at
    }

    fn definition(&mut self, tag: &[u8; 4], skip: u32, points: u32, lines: u32, title: &str) {
        self.header(HEADER_LEN + 8 + skip + 32, tag);
        self.u32(points);
        self.u32(lines);
        self.bytes.extend(std::iter::repeat(0u8).take(skip as usize));
        let mut field = [0u8; 32];
        let n = title.len().min(32);
        field[..n].copy_from_slice(&title.as_bytes()[..n]);
        self.bytes.extend_from_slice(&field);
    }
}

/// Build a synthetic container file.
pub fn build(main_note: Option<&str>, images: &[ImageSpec], volumes: &[VolumeSpec]) -> Fixture {
    let mut w = Writer::new();

    // File-level record.
    w.header(16, b"ARDF");

    // Top-level pointer table: one entry per branch.
    let branch_count = (images.len() + volumes.len()) as u32;
    let ftoc_size = 32 + 24 * branch_count;
    w.header(ftoc_size, b"FTOC");
    w.u64(ftoc_size as u64); // size_table
    w.u32(branch_count);
    w.u32(24);
    let mut image_slots = Vec::new();
    for _ in images {
        w.header(24, b"IMAG");
        image_slots.push(w.pointer_slot());
    }
    let mut volume_slots = Vec::new();
    for _ in volumes {
        w.header(24, b"VOLM");
        volume_slots.push(w.pointer_slot());
    }

    // Top-level note table.
    let note_count = main_note.is_some() as u32;
    let ttoc_size = 32 + 32 * note_count;
    w.header(ttoc_size, b"TTOC");
    w.u64(ttoc_size as u64);
    w.u32(note_count);
    w.u32(32);
    let mut main_note_slot = None;
    if main_note.is_some() {
        w.header(32, b"TOFF");
        w.u64(1); // index
        main_note_slot = Some(w.pointer_slot());
    }
    if let (Some(slot), Some(note)) = (main_note_slot, main_note) {
        let at = w.text_record(note);
        w.patch_u64(slot, at);
    }

    for (image, &slot) in images.iter().zip(&image_slots) {
        let at = build_image(&mut w, image);
        w.patch_u64(slot, at);
    }

    let mut line_patches: Vec<(Vec<usize>, &VolumeSpec)> = Vec::new();
    for (volume, &slot) in volumes.iter().zip(&volume_slots) {
        let (at, slots) = build_volume_tables(&mut w, volume);
        w.patch_u64(slot, at);
        line_patches.push((slots, volume));
    }

    // Line data blobs go after all branch tables.
    for (slots, volume) in line_patches {
        build_volume_lines(&mut w, volume, &slots);
    }

    Fixture {
        bytes: w.bytes,
        tag_offsets: w.tag_offsets,
    }
}

fn build_image(w: &mut Writer, image: &ImageSpec) -> u64 {
    let at = w.pos();

    // Branch pointer table with no entries.
    w.header(32, b"IMAG");
    w.u64(32);
    w.u32(0);
    w.u32(24);

    // Per-image note table.
    let note_count = image.note.is_some() as u32;
    let ttoc_size = 32 + 32 * note_count;
    w.header(ttoc_size, b"TTOC");
    w.u64(ttoc_size as u64);
    w.u32(note_count);
    w.u32(32);
    let mut note_slot = None;
    if image.note.is_some() {
        w.header(32, b"TOFF");
        w.u64(1);
        note_slot = Some(w.pointer_slot());
    }

    let lines = image.rows.len() as u32;
    let points = image.rows.first().map(Vec::len).unwrap_or(0) as u32;
    w.definition(b"IDEF", 96, points, lines, &image.title);

    // Inline sample block.
    let entry_size = 16 + 4 * points;
    w.header(32 + lines * entry_size, b"IBOX");
    w.u64((32 + lines * entry_size) as u64);
    w.u32(lines);
    w.u32(entry_size);
    for row in &image.rows {
        w.header(entry_size, b"IDAT");
        for &v in row {
            w.i32(v);
        }
    }

    w.header(16, b"GAMI");

    if let (Some(slot), Some(note)) = (note_slot, image.note.as_ref()) {
        let text_at = w.text_record(note);
        w.patch_u64(slot, text_at);
    }

    at
}

/// Emit a volume's tables; line pointers are patched later, once the line
/// blobs exist. Returns the branch offset and the pointer-slot positions
/// indexed by physical row.
fn build_volume_tables(w: &mut Writer, volume: &VolumeSpec) -> (u64, Vec<usize>) {
    let at = w.pos();

    w.header(32, b"VOLM");
    w.u64(32);
    w.u32(0);
    w.u32(24);

    // Empty note table.
    w.header(32, b"TTOC");
    w.u64(32);
    w.u32(0);
    w.u32(32);

    w.definition(b"VDEF", 144, volume.points, volume.lines, &volume.title);

    for channel in &volume.channels {
        w.header(48, b"VCHN");
        let mut field = [0u8; 32];
        let n = channel.len().min(32);
        field[..n].copy_from_slice(&channel.as_bytes()[..n]);
        w.bytes.extend_from_slice(&field);
    }
    // Channel-list terminator with an empty text blob.
    w.header(24, b"XDEF");
    w.u32(0);
    w.u32(0);

    // Line-pointer table, one entry per physical row.
    let vtoc_size = 32 + 40 * volume.lines;
    w.header(vtoc_size, b"VTOC");
    w.u64(vtoc_size as u64);
    w.u32(volume.lines);
    w.u32(40);
    let mut slots = Vec::new();
    for row in 0..volume.lines {
        w.header(40, b"VOFF");
        w.u32(volume.points);
        w.u32(row);
        w.u64(0); // reserved
        slots.push(w.pointer_slot());
    }

    w.header(16, b"MLOV");

    (at, slots)
}

fn build_volume_lines(w: &mut Writer, volume: &VolumeSpec, slots: &[usize]) {
    for row in 0..volume.lines as usize {
        let logical = if volume.scan_down {
            volume.lines as usize - row - 1
        } else {
            row
        };
        if volume.empty_lines.contains(&logical) {
            continue; // slot stays zero
        }
        let at = w.pos();
        w.patch_u64(slots[row], at);

        for j in 0..volume.points as usize {
            let point = if volume.trace_first {
                j
            } else {
                volume.points as usize - j - 1
            };

            w.header(48, b"VSET");
            w.u32(0); // force
            w.u32(logical as u32);
            w.u32(point as u32);
            w.u32(0);
            w.u64(0); // prev
            w.u64(0); // next

            let name = format!("{logical}:{point}");
            w.header(32 + name.len() as u32, b"VNAM");
            w.u32(0);
            w.u32(logical as u32);
            w.u32(point as u32);
            w.u32(name.len() as u32);
            w.bytes.extend_from_slice(name.as_bytes());

            for samples in &volume.waveforms[logical][point] {
                w.header(56 + 4 * samples.len() as u32, b"VDAT");
                w.u32(0); // force
                w.u32(logical as u32);
                w.u32(point as u32);
                w.u32(samples.len() as u32);
                w.u32(0); // force type
                w.u32(0); // pnt0
                w.u32(0); // pnt1
                w.u32(0); // pnt2
                w.u64(0); // reserved
                for &v in samples {
                    w.i32(v);
                }
            }

            w.header(16, b"XDAT");
        }
    }
}
