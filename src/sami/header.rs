use anyhow::{anyhow, Context, Result};
use regex::{Regex, RegexBuilder};

use crate::sami::profile::FormatProfile;

// @module: Header signature verification

/// Byte-order mark some editors leave in front of the first line
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Checks that a line carries a format's header signature, ignoring case.
#[derive(Debug, Clone)]
pub struct HeaderVerifier {
    signature: String,
    pattern: Regex,
}

impl HeaderVerifier {
    /// Build a verifier for a literal signature such as `<SAMI>` or `WEBVTT`
    pub fn new(signature: &str) -> Result<Self> {
        let signature = signature.trim();
        if signature.is_empty() {
            return Err(anyhow!("Header signature must not be empty"));
        }

        let pattern = RegexBuilder::new(&regex::escape(signature))
            .case_insensitive(true)
            .build()
            .with_context(|| format!("Failed to compile header signature: {}", signature))?;

        Ok(Self {
            signature: signature.to_string(),
            pattern,
        })
    }

    /// Build a verifier from the first header line of a profile
    pub fn for_profile(profile: &FormatProfile) -> Result<Self> {
        let signature = profile
            .signature()
            .ok_or_else(|| anyhow!("Format profile has no header lines"))?;
        Self::new(signature)
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Whether the (trimmed) line contains the signature
    pub fn verify(&self, header_line: &str) -> bool {
        let line = header_line
            .trim()
            .trim_start_matches(BYTE_ORDER_MARK)
            .trim_start();
        if line.is_empty() {
            return false;
        }
        self.pattern.is_match(line)
    }
}
