//! ARDF container format reader.
//!
//! The format is a tree of tagged, length-prefixed records linked by
//! absolute byte-offset pointers; decoding is a single sequential pass with
//! explicit pointer jumps.
//!
//! # Module Structure
//!
//! - [`stream`] — cursor-tracked little-endian primitives over `Read + Seek`
//! - [`record`] — record tags and the fixed 16-byte record prolog
//! - [`toc`] — the four table-of-contents shapes
//! - [`definition`] — `IDEF`/`VDEF` grid definitions
//! - [`text`] — `TEXT` records and `key:value` note parsing
//! - [`point`] — `VSET`/`VNAM`/`VDAT`/`XDAT` point records and line assembly
//! - [`walker`] — the top-to-bottom container walk
//! - [`assembler`] — per-channel array assembly with NaN padding

pub mod assembler;
pub mod definition;
pub mod point;
pub mod record;
pub mod stream;
pub mod text;
pub mod toc;
pub mod walker;

// Re-export commonly used types
pub use assembler::{extract_direction, extract_line, extract_volume_channel, VolumeChannel};
pub use definition::Definition;
pub use record::{RecordHeader, RecordTag};
pub use stream::ArdfStream;
pub use walker::{parse_container, parse_stream};
