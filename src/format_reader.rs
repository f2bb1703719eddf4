/*!
 * Header-gated readers for caption files.
 *
 * Readers only check that content carries the right header signature; turning
 * SAMI into records is a separate step (see `sami::parser`).
 */

use std::path::Path;

use anyhow::Result;
use log::debug;

use crate::errors::{CaptionError, FormatKind};
use crate::file_utils::{split_lines, FileManager};
use crate::sami::{FormatProfile, HeaderVerifier};

/// Header signature of plain-text timed captions
pub const PLAIN_TIMED_SIGNATURE: &str = "WEBVTT";

fn first_line(content: &str) -> &str {
    split_lines(content).into_iter().next().unwrap_or_default()
}

/// Reads caption content and verifies its header
#[derive(Debug, Clone)]
pub struct FormatReader {
    sami: HeaderVerifier,
    plain_timed: HeaderVerifier,
}

impl FormatReader {
    pub fn new(sami_profile: &FormatProfile, plain_timed_signature: &str) -> Result<Self> {
        Ok(Self {
            sami: HeaderVerifier::for_profile(sami_profile)?,
            plain_timed: HeaderVerifier::new(plain_timed_signature)?,
        })
    }

    pub fn sami_verifier(&self) -> &HeaderVerifier {
        &self.sami
    }

    pub fn plain_timed_verifier(&self) -> &HeaderVerifier {
        &self.plain_timed
    }

    /// Read a SAMI file, returning its raw bytes once the header checks out
    pub async fn read_markup<P: AsRef<Path>>(&self, path: P) -> Result<Vec<u8>, CaptionError> {
        let path = path.as_ref();
        let data = FileManager::read_bytes(path).await?;
        debug!("Read {} bytes from {}", data.len(), path.display());

        self.verify_markup_text(&String::from_utf8_lossy(&data))?;
        Ok(data)
    }

    /// Header gate for SAMI text already in memory
    pub fn verify_markup_text(&self, content: &str) -> Result<(), CaptionError> {
        if self.sami.verify(first_line(content)) {
            Ok(())
        } else {
            Err(CaptionError::format_mismatch(FormatKind::Sami))
        }
    }

    /// Header gate for plain timed captions, returning the content's lines
    pub fn read_plain_timed(&self, content: &str) -> Result<Vec<String>, CaptionError> {
        let lines = split_lines(content);
        let header = lines.first().copied().unwrap_or_default();

        if !self.plain_timed.verify(header) {
            return Err(CaptionError::format_mismatch(FormatKind::PlainTimed));
        }

        Ok(lines.into_iter().map(str::to_string).collect())
    }
}
