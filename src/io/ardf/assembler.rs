//! Channel assembly: raw per-line samples to regular rectangular arrays.
//!
//! Image channels are already rectangular and pass straight through the
//! walker. Volume channels are assembled here: for one channel and one
//! sweep direction, every logical line is read through the volume index and
//! that channel's waveform extracted for every point. Waveform length may
//! legitimately differ between points, so a running maximum is tracked and
//! every shorter waveform is right-padded with NaN — retroactively for
//! already-collected lines whenever the maximum grows. Lines with no stored
//! data stay in the grid as all-NaN rows.

use std::path::Path;

use ndarray::Array3;

use crate::document::FileStructure;
use crate::error::{ArdfError, Result};
use crate::io::ardf::point::{read_line, LineData};
use crate::io::ardf::stream::ArdfStream;
use crate::types::ScanDirection;

/// Both direction arrays of one volume channel, shaped
/// `[lines, points, padded_waveform_length]`.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeChannel {
    pub trace: Array3<f64>,
    pub retrace: Array3<f64>,
}

/// Read one logical line of the volume serving `direction`.
///
/// Each call opens its own file handle, so independent line extractions can
/// run in parallel against a shared parsed [`FileStructure`].
pub fn extract_line<P: AsRef<Path>>(
    path: P,
    structure: &FileStructure,
    direction: ScanDirection,
    line: usize,
) -> Result<LineData> {
    let volume = structure.volume_for(direction).ok_or(ArdfError::MissingVolume)?;
    let pointer = volume.line_pointer(line)?;
    let mut stream = ArdfStream::open(path)?;
    read_line(
        &mut stream,
        pointer,
        volume.def.points,
        volume.channels.len(),
    )
}

/// Assemble one volume channel in one sweep direction.
pub fn extract_direction<P: AsRef<Path>>(
    path: P,
    structure: &FileStructure,
    channel: &str,
    direction: ScanDirection,
) -> Result<Array3<f64>> {
    let volume = structure.volume_for(direction).ok_or(ArdfError::MissingVolume)?;
    let channel_index = volume
        .channels
        .iter()
        .position(|name| name == channel)
        .ok_or_else(|| ArdfError::ChannelNotFound(channel.to_string()))?;

    let lines = volume.def.lines as usize;
    let points = volume.def.points as usize;
    let channel_count = volume.channels.len();

    let mut stream = ArdfStream::open(path)?;
    let mut rows: Vec<Vec<Vec<f64>>> = Vec::with_capacity(lines);
    let mut max_len = 0usize;

    for logical in 0..lines {
        let pointer = volume.line_pointer(logical)?;
        let line = read_line(&mut stream, pointer, volume.def.points, channel_count)?;

        let mut row: Vec<Vec<f64>> = if line.is_empty() {
            vec![Vec::new(); points]
        } else {
            line.waveforms
                .iter()
                .map(|point| point[channel_index].iter().map(|&v| v as f64).collect())
                .collect()
        };

        let line_max = row.iter().map(Vec::len).max().unwrap_or(0);
        if line_max > max_len {
            max_len = line_max;
            for earlier in &mut rows {
                pad_row(earlier, max_len);
            }
        }
        pad_row(&mut row, max_len);
        rows.push(row);
    }

    let mut array = Array3::from_elem((lines, points, max_len), f64::NAN);
    for (l, row) in rows.iter().enumerate() {
        for (p, waveform) in row.iter().enumerate() {
            for (i, &value) in waveform.iter().enumerate() {
                array[[l, p, i]] = value;
            }
        }
    }
    Ok(array)
}

/// Assemble both sweep directions of one volume channel.
pub fn extract_volume_channel<P: AsRef<Path>>(
    path: P,
    structure: &FileStructure,
    channel: &str,
) -> Result<VolumeChannel> {
    let trace = extract_direction(&path, structure, channel, ScanDirection::Trace)?;
    let retrace = extract_direction(&path, structure, channel, ScanDirection::Retrace)?;
    Ok(VolumeChannel { trace, retrace })
}

fn pad_row(row: &mut [Vec<f64>], len: usize) {
    for waveform in row {
        if waveform.len() < len {
            waveform.resize(len, f64::NAN);
        }
    }
}
