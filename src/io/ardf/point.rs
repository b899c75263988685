//! Point-level records (VSET/VNAM/VDAT/XDAT) and scan-line assembly.
//!
//! One stored scan line is a run of point records: a `VSET` header, a
//! `VNAM` name, one `VDAT` waveform per declared channel, and an `XDAT`
//! filler. Some writers omit the filler on the last point of a line, in
//! which case the next `VSET` arrives early and the cursor is rewound so
//! the caller re-reads it.

use std::io::{Read, Seek};

use crate::error::{ArdfError, Result};
use crate::io::ardf::record::{RecordHeader, RecordTag};
use crate::io::ardf::stream::ArdfStream;
use crate::io::ardf::text::decode_permissive;

/// A `VSET` point header. `prev`/`next` form a file-offset linked list that
/// this decoder never traverses; line access goes through the volume index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VsetRecord {
    pub force: u32,
    pub line: u32,
    pub point: u32,
    pub prev: u64,
    pub next: u64,
}

/// A `VNAM` point name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VnamRecord {
    pub force: u32,
    pub line: u32,
    pub point: u32,
    pub name: String,
}

/// A `VDAT` waveform: one channel's samples for one point. `pnt0..pnt2`
/// are positional tags, not samples.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VdatRecord {
    pub force: u32,
    pub line: u32,
    pub point: u32,
    pub size_data: u32,
    pub force_type: u32,
    pub pnt0: u32,
    pub pnt1: u32,
    pub pnt2: u32,
    pub data: Vec<i32>,
}

/// Read a `VSET` record at `at` (or the current cursor).
pub fn read_vset<R: Read + Seek>(
    stream: &mut ArdfStream<R>,
    at: Option<u64>,
) -> Result<VsetRecord> {
    let header = RecordHeader::read(stream, at)?;
    header.expect(RecordTag::VSET)?;

    let force = stream.read_u32()?;
    let line = stream.read_u32()?;
    let point = stream.read_u32()?;
    stream.read_u32()?; // reserved
    let prev = stream.read_u64()?;
    let next = stream.read_u64()?;
    Ok(VsetRecord {
        force,
        line,
        point,
        prev,
        next,
    })
}

/// Read a `VNAM` record at the current cursor, realigning past any slack.
pub fn read_vnam<R: Read + Seek>(stream: &mut ArdfStream<R>) -> Result<VnamRecord> {
    let header = RecordHeader::read(stream, None)?;
    header.expect(RecordTag::VNAM)?;

    let force = stream.read_u32()?;
    let line = stream.read_u32()?;
    let point = stream.read_u32()?;
    let size_text = stream.read_u32()?;
    let name = decode_permissive(&stream.read_bytes(size_text as usize)?);

    let remaining = header.size as i64 - 16 - size_text as i64 - 16;
    if remaining < 0 {
        return Err(ArdfError::InvalidFormat(format!(
            "VNAM record at offset {} declares name length {} beyond its size {}",
            header.offset, size_text, header.size
        )));
    }
    stream.skip(remaining as u64)?;

    Ok(VnamRecord {
        force,
        line,
        point,
        name,
    })
}

/// Read a `VDAT` record at the current cursor.
pub fn read_vdat<R: Read + Seek>(stream: &mut ArdfStream<R>) -> Result<VdatRecord> {
    let header = RecordHeader::read(stream, None)?;
    header.expect(RecordTag::VDAT)?;

    let force = stream.read_u32()?;
    let line = stream.read_u32()?;
    let point = stream.read_u32()?;
    let size_data = stream.read_u32()?;
    let force_type = stream.read_u32()?;
    let pnt0 = stream.read_u32()?;
    let pnt1 = stream.read_u32()?;
    let pnt2 = stream.read_u32()?;
    stream.skip(8)?; // reserved
    let data = stream.read_i32_vec(size_data as usize)?;

    Ok(VdatRecord {
        force,
        line,
        point,
        size_data,
        force_type,
        pnt0,
        pnt1,
        pnt2,
        data,
    })
}

/// Skip the end-of-point `XDAT` filler.
///
/// If the next record is already the following point's `VSET`, the filler
/// was omitted: rewind the 16 header bytes so the caller re-reads it. Any
/// other tag is fatal.
pub fn skip_xdat<R: Read + Seek>(stream: &mut ArdfStream<R>) -> Result<()> {
    let header = RecordHeader::read(stream, None)?;
    match header.tag {
        RecordTag::XDAT => stream.skip(header.size.saturating_sub(16) as u64),
        RecordTag::VSET => stream.rewind_by(16),
        found => Err(ArdfError::MalformedTag {
            expected: RecordTag::XDAT,
            found,
            offset: header.offset,
        }),
    }
}

/// All records of one stored scan line, accumulated per point and already
/// reordered so point index 0 is the logically first point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineData {
    pub forces: Vec<u32>,
    pub lines: Vec<u32>,
    pub points: Vec<u32>,
    pub prev: Vec<u64>,
    pub next: Vec<u64>,
    pub names: Vec<String>,
    /// Per point, one waveform per channel in channel-declaration order.
    pub waveforms: Vec<Vec<Vec<i32>>>,
    pub pnt0: Vec<u32>,
    pub pnt1: Vec<u32>,
    pub pnt2: Vec<u32>,
}

impl LineData {
    /// Whether this line carried no stored data (zero line pointer).
    pub fn is_empty(&self) -> bool {
        self.waveforms.is_empty()
    }

    fn reverse(&mut self) {
        self.forces.reverse();
        self.lines.reverse();
        self.points.reverse();
        self.prev.reverse();
        self.next.reverse();
        self.names.reverse();
        self.waveforms.reverse();
        self.pnt0.reverse();
        self.pnt1.reverse();
        self.pnt2.reverse();
    }
}

/// Read one stored scan line.
///
/// `line_pointer` comes from the volume index; 0 means no data is stored
/// for the line and yields an empty result without error. Otherwise reads
/// `points` point records of `channels` waveforms each. If the first
/// point's `point` field is non-zero the physical recording order was
/// reversed, and every per-point collection is reversed once at the end so
/// point order is always logically forward.
pub fn read_line<R: Read + Seek>(
    stream: &mut ArdfStream<R>,
    line_pointer: u64,
    points: u32,
    channels: usize,
) -> Result<LineData> {
    let mut data = LineData::default();
    if line_pointer == 0 {
        return Ok(data);
    }

    stream.seek_to(line_pointer)?;
    for _ in 0..points {
        let vset = read_vset(stream, None)?;
        data.forces.push(vset.force);
        data.lines.push(vset.line);
        data.points.push(vset.point);
        data.prev.push(vset.prev);
        data.next.push(vset.next);

        let vnam = read_vnam(stream)?;
        data.names.push(vnam.name);

        let mut point_waveforms = Vec::with_capacity(channels);
        let mut last_vdat: Option<VdatRecord> = None;
        for _ in 0..channels {
            let vdat = read_vdat(stream)?;
            point_waveforms.push(vdat.data.clone());
            last_vdat = Some(vdat);
        }
        skip_xdat(stream)?;

        data.waveforms.push(point_waveforms);
        let (p0, p1, p2) = last_vdat
            .map(|v| (v.pnt0, v.pnt1, v.pnt2))
            .unwrap_or_default();
        data.pnt0.push(p0);
        data.pnt1.push(p1);
        data.pnt2.push(p2);
    }

    if data.points.first().copied().unwrap_or(0) != 0 {
        data.reverse();
    }
    Ok(data)
}
