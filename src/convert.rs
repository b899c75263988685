//! The caller-facing decode contract.
//!
//! [`decode`] parses a container once, then materializes every channel:
//! image channels as 2-D arrays, volume channels as a trace/retrace pair of
//! 3-D arrays, plus the parsed note metadata and per-channel attributes.
//! Volume channels are extracted in parallel; each worker opens its own
//! file handle against the shared read-only [`FileStructure`].

use std::path::Path;

use indexmap::IndexMap;
use ndarray::{Array2, Array3};
use rayon::prelude::*;

use crate::document::FileStructure;
use crate::error::Result;
use crate::io::ardf::assembler::{extract_volume_channel, VolumeChannel};
use crate::io::ardf::walker::parse_container;
use crate::types::{Scalar, ScanDirection};

/// Decoded samples of one channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelData {
    /// 2-D image, one row per scan line.
    Image(Array2<i32>),
    /// 3-D force volume, one array per sweep direction, each shaped
    /// `[lines, points, padded_waveform_length]`.
    Volume {
        trace: Array3<f64>,
        retrace: Array3<f64>,
    },
}

impl ChannelData {
    /// The image array, if this is an image channel.
    pub fn as_image(&self) -> Option<&Array2<i32>> {
        match self {
            ChannelData::Image(data) => Some(data),
            ChannelData::Volume { .. } => None,
        }
    }

    /// One direction of a volume channel, if this is a volume channel.
    pub fn direction(&self, direction: ScanDirection) -> Option<&Array3<f64>> {
        match self {
            ChannelData::Image(_) => None,
            ChannelData::Volume { trace, retrace } => Some(match direction {
                ScanDirection::Trace => trace,
                ScanDirection::Retrace => retrace,
            }),
        }
    }
}

/// Dataset-level attributes reported for one channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelAttributes {
    /// The channel name.
    pub name: String,
    /// Array shape; present for image channels.
    pub shape: Option<Vec<usize>>,
    /// Physical unit; present for image channels (always "unknown", the
    /// container does not record units).
    pub unit: Option<String>,
    /// Shape of the trace array; present for volume channels.
    pub trace_shape: Option<Vec<usize>>,
    /// Shape of the retrace array; present for volume channels.
    pub retrace_shape: Option<Vec<usize>>,
}

/// Everything a persistence collaborator needs: channel arrays, flattened
/// note metadata, and per-channel attributes, all in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertedData {
    pub data: IndexMap<String, ChannelData>,
    pub metadata: IndexMap<String, Scalar>,
    pub attributes: IndexMap<String, ChannelAttributes>,
}

/// Decode a container file into arrays, metadata, and attributes.
pub fn decode<P: AsRef<Path>>(path: P) -> Result<ConvertedData> {
    let structure = parse_container(&path)?;
    convert(&path, &structure)
}

/// Materialize every channel of an already-parsed container.
pub fn convert<P: AsRef<Path>>(path: P, structure: &FileStructure) -> Result<ConvertedData> {
    let mut converted = ConvertedData {
        metadata: structure.notes.clone(),
        ..ConvertedData::default()
    };

    for image in &structure.images {
        let name = image.title().to_string();
        let shape = image.data.shape().to_vec();
        converted.attributes.insert(
            name.clone(),
            ChannelAttributes {
                name: name.clone(),
                shape: Some(shape),
                unit: Some("unknown".to_string()),
                ..ChannelAttributes::default()
            },
        );
        converted
            .data
            .insert(name, ChannelData::Image(image.data.clone()));
    }

    let channel_names: Vec<String> = structure
        .volumes
        .first()
        .map(|volume| volume.channels.clone())
        .unwrap_or_default();

    let path = path.as_ref();
    let extracted: Vec<(String, VolumeChannel)> = channel_names
        .par_iter()
        .map(|name| {
            extract_volume_channel(path, structure, name).map(|channel| (name.clone(), channel))
        })
        .collect::<Result<_>>()?;

    for (name, channel) in extracted {
        converted.attributes.insert(
            name.clone(),
            ChannelAttributes {
                name: name.clone(),
                trace_shape: Some(channel.trace.shape().to_vec()),
                retrace_shape: Some(channel.retrace.shape().to_vec()),
                ..ChannelAttributes::default()
            },
        );
        converted.data.insert(
            name,
            ChannelData::Volume {
                trace: channel.trace,
                retrace: channel.retrace,
            },
        );
    }

    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_channel_data_accessors() {
        let image = ChannelData::Image(arr2(&[[1, 2]]));
        assert!(image.as_image().is_some());
        assert!(image.direction(ScanDirection::Trace).is_none());

        let volume = ChannelData::Volume {
            trace: Array3::zeros((1, 1, 2)),
            retrace: Array3::from_elem((1, 1, 3), 1.0),
        };
        assert!(volume.as_image().is_none());
        assert_eq!(
            volume.direction(ScanDirection::Retrace).unwrap().shape(),
            &[1, 1, 3]
        );
    }
}
