use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::errors::CaptionError;
use crate::file_utils::FileManager;

// @module: Canonical caption records

// @const: Microseconds per millisecond
pub const MICROS_PER_MILLI: u64 = 1_000;

// @struct: Single timed caption
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionRecord {
    // @field: Offset from media start when the text appears
    pub start_time_micro: u64,

    // @field: Offset when the text is cleared, if the format says so
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time_micro: Option<u64>,

    // @field: Caption text with embedded macros; empty means a blank frame
    #[serde(default)]
    pub text: String,
}

impl CaptionRecord {
    /// Creates a record that stays on screen until the next one replaces it
    pub fn new(start_time_micro: u64, text: impl Into<String>) -> Self {
        CaptionRecord {
            start_time_micro,
            end_time_micro: None,
            text: text.into(),
        }
    }

    /// Creates a record with an explicit clear time
    pub fn with_end(start_time_micro: u64, end_time_micro: u64, text: impl Into<String>) -> Self {
        CaptionRecord {
            start_time_micro,
            end_time_micro: Some(end_time_micro),
            text: text.into(),
        }
    }

    /// Blank frame at the given time
    pub fn blank(start_time_micro: u64) -> Self {
        Self::new(start_time_micro, String::new())
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    /// Start time truncated to whole milliseconds
    pub fn start_time_ms(&self) -> u64 {
        self.start_time_micro / MICROS_PER_MILLI
    }

    /// End time truncated to whole milliseconds
    pub fn end_time_ms(&self) -> Option<u64> {
        self.end_time_micro.map(|end| end / MICROS_PER_MILLI)
    }
}

impl fmt::Display for CaptionRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.end_time_micro {
            Some(end) => write!(f, "[{}us -> {}us] {}", self.start_time_micro, end, self.text),
            None => write!(f, "[{}us -> ...] {}", self.start_time_micro, self.text),
        }
    }
}

/// Parse a caption JSON array into records
pub fn records_from_json(json: &str) -> Result<Vec<CaptionRecord>, CaptionError> {
    Ok(serde_json::from_str(json)?)
}

/// Serialize records into pretty caption JSON
pub fn records_to_json(records: &[CaptionRecord]) -> Result<String, CaptionError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Load a caption JSON file from disk
pub async fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<CaptionRecord>> {
    let path = path.as_ref();
    let content = FileManager::read_to_string(path).await?;
    records_from_json(&content)
        .with_context(|| format!("Failed to parse caption JSON: {}", path.display()))
}
