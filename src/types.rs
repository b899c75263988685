//! Scalar metadata values and scan-direction labels.

use std::fmt;

/// A metadata value parsed from a note line.
///
/// Note values are free text; the coercion rule is: integer if the trimmed
/// text parses as one, float if it parses as one, otherwise the trimmed text
/// itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Coerce a raw note value into a scalar.
    pub fn parse(raw: &str) -> Scalar {
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            Scalar::Int(i)
        } else if let Ok(f) = trimmed.parse::<f64>() {
            Scalar::Float(f)
        } else {
            Scalar::Str(trimmed.to_string())
        }
    }

    /// The value as an integer, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The value as a float; integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Str(_) => None,
        }
    }

    /// The value as a string slice, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Str(s) => write!(f, "{s}"),
        }
    }
}

/// One of the two opposite sweep directions of the probe across a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanDirection {
    /// The forward sweep.
    Trace,
    /// The backward sweep.
    Retrace,
}

impl ScanDirection {
    /// Both directions, in the order the extraction reports them.
    pub const ALL: [ScanDirection; 2] = [ScanDirection::Trace, ScanDirection::Retrace];

    /// The conventional lowercase label ("trace" / "retrace").
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanDirection::Trace => "trace",
            ScanDirection::Retrace => "retrace",
        }
    }

    /// Whether this is the forward sweep.
    pub fn is_trace(&self) -> bool {
        matches!(self, ScanDirection::Trace)
    }
}

impl fmt::Display for ScanDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
