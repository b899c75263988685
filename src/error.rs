//! Error types for the ardfrust library

use std::io;
use thiserror::Error;

use crate::io::ardf::record::RecordTag;

/// Main error type for ardfrust operations
#[derive(Debug, Error)]
pub enum ArdfError {
    /// IO error occurred during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A record tag did not match the tag required at this position
    #[error("expected '{expected}' record, found '{found}' at offset {offset}")]
    MalformedTag {
        expected: RecordTag,
        found: RecordTag,
        offset: u64,
    },

    /// A record or table-entry tag outside the known ARDF tag set
    #[error("unrecognized record type '{tag}' at offset {offset}")]
    UnknownRecordType { tag: RecordTag, offset: u64 },

    /// A read requested more bytes than remain in the file
    #[error("file truncated: unexpected end of data at offset {offset}")]
    Truncated { offset: u64 },

    /// A declared record size is inconsistent with the record's layout
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Requested channel name not present in the volume's channel list
    #[error("channel not found: {0}")]
    ChannelNotFound(String),

    /// Requested line index outside the volume's declared grid
    #[error("line {line} out of range: volume declares {lines} lines")]
    LineOutOfRange { line: usize, lines: usize },

    /// Volume data was requested from a file with no volume branch
    #[error("file contains no volume branch")]
    MissingVolume,

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for ardfrust operations
pub type Result<T> = std::result::Result<T, ArdfError>;

impl From<String> for ArdfError {
    fn from(s: String) -> Self {
        ArdfError::Custom(s)
    }
}

impl From<&str> for ArdfError {
    fn from(s: &str) -> Self {
        ArdfError::Custom(s.to_string())
    }
}
