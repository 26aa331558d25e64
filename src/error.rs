//! Error type shared by every component of the crate.

/// Errors raised by point validation, diagram parsing and hull batching.
///
/// All errors are reported synchronously and carry enough context (record or
/// group index) to locate the offending input. Nothing is retried internally.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// Engine output is malformed or truncated.
    ///
    /// `record` is the 0-based line index in the engine output stream.
    #[error("malformed diagram output at record {record}: {reason}")]
    Parse { record: usize, reason: String },

    /// A group's index-pointer range is invalid.
    #[error("invalid range for group {group}: [{start}, {end}) over {len} points")]
    Range {
        group: usize,
        start: usize,
        end: usize,
        len: usize,
    },

    /// Points have the wrong dimensionality or rank.
    #[error("shape mismatch: {reason}")]
    Shape { reason: String },

    /// The diagram engine ran but did not produce usable output.
    #[error("diagram engine failed: {reason}")]
    Engine { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GeometryError {
    pub(crate) fn parse(record: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            record,
            reason: reason.into(),
        }
    }

    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        Self::Shape {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GeometryError>;
