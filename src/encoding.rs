/*!
 * Character encoding normalization for raw subtitle buffers.
 *
 * Subtitle files in the wild are rarely UTF-8. The normalizer sniffs a
 * byte-order mark, falls back to statistical detection, and then cross-checks
 * the guess against the encodings expected for the caption language: when the
 * guess is not one of them, the language's most common encoding wins.
 */

use std::collections::BTreeMap;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::CaptionError;
use crate::language_utils;

/// Canonical encoding every buffer is normalized to
pub const CANONICAL_ENCODING: &str = "utf-8";

/// Compare encoding names ignoring case, hyphens and underscores
pub fn encoding_names_match(a: &str, b: &str) -> bool {
    normalize_encoding_name(a) == normalize_encoding_name(b)
}

fn normalize_encoding_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Resolve an encoding label (`"windows-1251"`, `"koi8-r"`, ...)
pub fn resolve_label(label: &str) -> Result<&'static Encoding, CaptionError> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| CaptionError::UnknownEncoding(label.to_string()))
}

/// Expected encodings per language, most common first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Vec<String>>", into = "BTreeMap<String, Vec<String>>")]
pub struct EncodingProfile {
    languages: BTreeMap<String, Vec<String>>,
}

impl From<BTreeMap<String, Vec<String>>> for EncodingProfile {
    fn from(languages: BTreeMap<String, Vec<String>>) -> Self {
        Self::from_entries(languages)
    }
}

impl From<EncodingProfile> for BTreeMap<String, Vec<String>> {
    fn from(profile: EncodingProfile) -> Self {
        profile.languages
    }
}

impl EncodingProfile {
    /// Profile without any language expectations
    pub fn empty() -> Self {
        Self {
            languages: BTreeMap::new(),
        }
    }

    pub fn from_entries<I, L, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = (L, Vec<E>)>,
        L: Into<String>,
        E: Into<String>,
    {
        let languages = entries
            .into_iter()
            .map(|(lang, encodings)| {
                (
                    lang.into().trim().to_lowercase(),
                    encodings.into_iter().map(Into::into).collect(),
                )
            })
            .collect();
        Self { languages }
    }

    /// Language codes with an entry
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(|code| code.as_str())
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Expected encodings for a language code.
    ///
    /// Accepts ISO 639-1 and 639-2 (T or B) codes as well as region-tagged
    /// codes such as `pt-BR`.
    pub fn expected_for(&self, language: &str) -> Option<&[String]> {
        let code = language.trim().to_lowercase();
        if code.is_empty() {
            return None;
        }

        if let Some(list) = self.languages.get(&code) {
            return Some(list.as_slice());
        }

        let primary = code.split(['-', '_']).next().unwrap_or_default();
        if let Some(list) = self.languages.get(primary) {
            return Some(list.as_slice());
        }

        if let Ok(normalized) = language_utils::normalize_to_part1_or_part2t(primary) {
            if let Some(list) = self.languages.get(&normalized) {
                return Some(list.as_slice());
            }
        }

        // Entries keyed by another code form, e.g. "rus" for "ru"
        self.languages
            .iter()
            .find(|(key, _)| language_utils::language_codes_match(key, primary))
            .map(|(_, list)| list.as_slice())
    }

    /// Every label must be known to the decoder
    pub fn validate(&self) -> Result<(), CaptionError> {
        for (language, labels) in &self.languages {
            if labels.is_empty() {
                return Err(CaptionError::UnknownEncoding(format!(
                    "no encodings listed for language '{}'",
                    language
                )));
            }
            for label in labels {
                resolve_label(label)?;
            }
        }
        Ok(())
    }
}

impl Default for EncodingProfile {
    fn default() -> Self {
        Self::from_entries([
            ("ar", vec!["windows-1256"]),
            ("bg", vec!["windows-1251"]),
            ("cs", vec!["iso-8859-2", "windows-1250"]),
            ("el", vec!["iso-8859-7", "windows-1253"]),
            ("fa", vec!["windows-1256"]),
            ("he", vec!["windows-1255", "iso-8859-8"]),
            ("hr", vec!["windows-1250"]),
            ("hu", vec!["iso-8859-2", "windows-1250"]),
            ("ja", vec!["shift_jis", "euc-jp"]),
            ("ko", vec!["euc-kr"]),
            ("pl", vec!["windows-1250", "iso-8859-2"]),
            ("ro", vec!["iso-8859-2", "windows-1250"]),
            ("ru", vec!["windows-1251", "koi8-r"]),
            ("sr", vec!["windows-1250", "windows-1251"]),
            ("th", vec!["windows-874"]),
            ("tr", vec!["windows-1254", "iso-8859-9"]),
            ("uk", vec!["windows-1251"]),
            ("vi", vec!["windows-1258"]),
            ("zh", vec!["gbk", "big5"]),
        ])
    }
}

/// Detects and transcodes subtitle buffers to UTF-8
#[derive(Debug, Clone, Default)]
pub struct EncodingNormalizer {
    profile: EncodingProfile,
}

impl EncodingNormalizer {
    pub fn new(profile: EncodingProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &EncodingProfile {
        &self.profile
    }

    /// Best guess of the buffer's encoding
    pub fn detect(&self, buffer: &[u8]) -> &'static Encoding {
        if let Some((encoding, _)) = Encoding::for_bom(buffer) {
            return encoding;
        }
        // Valid UTF-8, ASCII included, needs no guessing
        if std::str::from_utf8(buffer).is_ok() {
            return UTF_8;
        }

        let mut detector = EncodingDetector::new();
        detector.feed(buffer, true);
        detector.guess(None, true)
    }

    /// Apply the language expectations to a detected encoding
    pub fn resolve(&self, detected: &'static Encoding, language: &str) -> Result<&'static Encoding, CaptionError> {
        let Some(expected) = self.profile.expected_for(language) else {
            debug!("No expected charsets for language '{}'", language);
            return Ok(detected);
        };
        debug!("Charsets expected for language '{}': {:?}", language, expected);

        let is_expected = expected.iter().any(|label| {
            encoding_names_match(label, detected.name())
                || resolve_label(label).is_ok_and(|encoding| encoding == detected)
        });
        if is_expected {
            return Ok(detected);
        }

        match expected.first() {
            Some(most_common) => resolve_label(most_common),
            None => Ok(detected),
        }
    }

    /// Decode a raw buffer into UTF-8 text
    pub fn normalize(&self, buffer: &[u8], language: &str) -> Result<String, CaptionError> {
        let detected = self.detect(buffer);
        debug!("Subtitle charset detected: {}", detected.name());

        if encoding_names_match(detected.name(), CANONICAL_ENCODING) {
            let (text, _, had_errors) = UTF_8.decode(buffer);
            if had_errors {
                debug!("Replaced malformed UTF-8 sequences while decoding");
            }
            return Ok(text.into_owned());
        }

        let encoding = self.resolve(detected, language)?;
        debug!("Subtitle charset used: {}", encoding.name());

        let (text, used, had_errors) = encoding.decode(buffer);
        if used != encoding {
            debug!("Byte-order mark overrode charset, decoded as {}", used.name());
        }
        if had_errors {
            debug!("Replaced unmappable bytes while decoding as {}", used.name());
        }
        Ok(text.into_owned())
    }
}
