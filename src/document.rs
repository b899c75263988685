//! The parsed-document model produced by a container walk.
//!
//! A [`FileStructure`] is everything the channel assembler needs to
//! materialize caller-facing arrays: the image branches are already fully
//! materialized (their samples are inline in the file), while the volume
//! branches keep only their shape, channel list, direction flags, and
//! absolute line pointers.

use indexmap::IndexMap;
use ndarray::Array2;

use crate::error::{ArdfError, Result};
use crate::io::ardf::definition::Definition;
use crate::notification::Notification;
use crate::types::{Scalar, ScanDirection};

/// A fully materialized 2-D image branch.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Grid shape and title.
    pub def: Definition,
    /// Samples, one row per scan line.
    pub data: Array2<i32>,
    /// The per-image note, parsed.
    pub note: IndexMap<String, Scalar>,
}

impl Image {
    /// The channel name this image is stored under.
    pub fn title(&self) -> &str {
        &self.def.title
    }
}

/// A 3-D force-volume branch: shape, channels, direction flags, and the
/// absolute pointer to each stored scan line.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    /// Grid shape and title.
    pub def: Definition,
    /// Channel names in declaration order.
    pub channels: Vec<String>,
    /// Auxiliary text blob from the channel-list terminator.
    pub xdef_text: String,
    /// Absolute file offset of each stored line's first point record;
    /// 0 means no data is stored for that line.
    pub line_pointers: Vec<u64>,
    /// Physical line storage order is the reverse of logical scan order.
    pub scan_down: bool,
    /// Point index 0 corresponds to the forward sweep.
    pub trace_first: bool,
}

impl Volume {
    /// Map a logical line index to the physical storage row.
    pub fn physical_line(&self, logical: usize) -> usize {
        if self.scan_down {
            self.def.lines as usize - logical - 1
        } else {
            logical
        }
    }

    /// Resolve a logical line index to its stored line pointer (0 when the
    /// line has no data).
    pub fn line_pointer(&self, logical: usize) -> Result<u64> {
        let lines = self.def.lines as usize;
        if logical >= lines {
            return Err(ArdfError::LineOutOfRange {
                line: logical,
                lines,
            });
        }
        let physical = self.physical_line(logical);
        self.line_pointers
            .get(physical)
            .copied()
            .ok_or(ArdfError::LineOutOfRange {
                line: physical,
                lines: self.line_pointers.len(),
            })
    }
}

/// Everything parsed from one container walk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileStructure {
    /// Flattened key → scalar table from the file's free-text notes.
    pub notes: IndexMap<String, Scalar>,
    /// Image branches, in file order.
    pub images: Vec<Image>,
    /// Volume branches, in file order.
    pub volumes: Vec<Volume>,
    /// Non-fatal conditions observed during the walk.
    pub notifications: Vec<Notification>,
}

impl FileStructure {
    /// All channel names: image titles first, then the first volume's
    /// channel list.
    pub fn channel_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.images.iter().map(|i| i.title()).collect();
        if let Some(volume) = self.volumes.first() {
            names.extend(volume.channels.iter().map(String::as_str));
        }
        names
    }

    /// The volume branch serving a sweep direction.
    ///
    /// With a single volume both directions read the same branch. With two
    /// or more, the first volume serves the direction matching its
    /// `trace_first` flag and the second serves the other.
    pub fn volume_for(&self, direction: ScanDirection) -> Option<&Volume> {
        match self.volumes.as_slice() {
            [] => None,
            [only] => Some(only),
            [first, second, ..] => {
                if first.trace_first == direction.is_trace() {
                    Some(first)
                } else {
                    Some(second)
                }
            }
        }
    }
}
