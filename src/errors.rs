/*!
 * Error types for the samiconv application.
 *
 * The conversion engine reports typed `CaptionError`s, defined with the
 * thiserror crate; the application layer wraps them in `anyhow` context.
 */

use std::fmt;

use thiserror::Error;

/// Caption file formats recognised by the header gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// SAMI markup (`.smi` / `.sami`)
    Sami,
    /// Plain-text timed captions (`.vtt`)
    PlainTimed,
}

impl FormatKind {
    /// Stable condition name reported to callers on a header mismatch
    pub fn mismatch_code(&self) -> &'static str {
        match self {
            Self::Sami => "INVALID_SMI_FORMAT",
            Self::PlainTimed => "INVALID_PLAIN_TIMED_FORMAT",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sami => write!(f, "SAMI"),
            Self::PlainTimed => write!(f, "plain timed"),
        }
    }
}

/// Errors that can occur while reading, decoding or converting captions
#[derive(Error, Debug)]
pub enum CaptionError {
    /// File or buffer acquisition failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The first line did not carry the expected header signature
    #[error("{}: header does not match the {} format", .kind.mismatch_code(), .kind)]
    FormatMismatch {
        /// Format whose header was expected
        kind: FormatKind,
    },

    /// An encoding label could not be resolved
    #[error("Unknown character encoding: {0}")]
    UnknownEncoding(String),

    /// Caption JSON could not be read or written
    #[error("Caption JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Strict timeline validation rejected the records
    #[error("Invalid caption timeline: {0}")]
    Timeline(String),
}

impl CaptionError {
    /// Shorthand for a header mismatch of the given format
    pub fn format_mismatch(kind: FormatKind) -> Self {
        Self::FormatMismatch { kind }
    }

    /// Whether this is the "wrong format" condition
    pub fn is_format_mismatch(&self) -> bool {
        matches!(self, Self::FormatMismatch { .. })
    }
}
