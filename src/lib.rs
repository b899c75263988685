//! # ardfrust
//!
//! A pure Rust library for reading Asylum Research ARDF files.
//!
//! ARDF is a proprietary container for scanning-probe microscopy data: a
//! tree of tagged, length-prefixed binary records linked by absolute
//! byte-offset pointers. A file holds one or more 2-D image channels and
//! zero or more 3-D force-volume channels (line × point × waveform sample),
//! plus free-text notes.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! // Decode everything in one call
//! let converted = ardfrust::decode("scan.ARDF")?;
//! for (name, channel) in &converted.data {
//!     println!("{name}: {channel:?}");
//! }
//!
//! // Or walk the structure first and extract selectively
//! use ardfrust::{parse_container, extract_volume_channel};
//! let structure = parse_container("scan.ARDF")?;
//! let defl = extract_volume_channel("scan.ARDF", &structure, "Defl")?;
//! # Ok::<(), ardfrust::ArdfError>(())
//! ```
//!
//! ## Architecture
//!
//! Decoding is a single sequential pass (the record tree is pointer-chased,
//! so each read depends on the previous cursor position), producing a
//! read-only [`FileStructure`]. Channel extraction then runs independently
//! per channel and sweep direction, each worker on its own file handle, so
//! the assembly stage parallelizes across channels.
//!
//! All fatal decode errors carry the offending tag and byte offset; a line
//! with no stored data and waveforms of differing length are expected
//! conditions, resolved by NaN padding rather than errors.

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod convert;
pub mod document;
pub mod error;
pub mod io;
pub mod notification;
pub mod types;

// Re-export commonly used types
pub use error::{ArdfError, Result};
pub use types::{Scalar, ScanDirection};

// Re-export the document model
pub use document::{FileStructure, Image, Volume};

// Re-export the decode contract
pub use convert::{decode, convert, ChannelAttributes, ChannelData, ConvertedData};

// Re-export I/O entry points
pub use io::ardf::{
    extract_direction, extract_line, extract_volume_channel, parse_container, parse_stream,
    ArdfStream, Definition, VolumeChannel,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
