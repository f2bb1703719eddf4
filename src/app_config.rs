use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::encoding::EncodingProfile;
use crate::format_reader::PLAIN_TIMED_SIGNATURE;
use crate::sami::{FormatProfile, ParserOptions};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Caption language used for encoding expectations when none is given
    #[serde(default = "default_language")]
    pub default_language: String,

    /// SAMI header, footer and line template
    #[serde(default)]
    pub sami: FormatProfile,

    /// Header signature of plain timed caption files
    #[serde(default = "default_plain_timed_header")]
    pub plain_timed_header: String,

    /// Character encoding settings
    #[serde(default)]
    pub encoding: EncodingConfig,

    /// SAMI decoding behaviour
    #[serde(default)]
    pub parser: ParserOptions,

    /// Timeline validation settings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Encoding normalization configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct EncodingConfig {
    /// Expected encodings per language, most common first
    #[serde(default)]
    pub profiles: EncodingProfile,
}

/// Timeline validation configuration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct ValidationConfig {
    /// Run the timeline check after parsing and before generating
    #[serde(default)]
    pub enabled: bool,

    /// Reject invalid timelines instead of logging them
    #[serde(default)]
    pub strict: bool,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_plain_timed_header() -> String {
    PLAIN_TIMED_SIGNATURE.to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::validate_language_code(&self.default_language)
            .context("Invalid default_language")?;

        self.sami.validate().context("Invalid SAMI profile")?;

        if self.plain_timed_header.trim().is_empty() {
            return Err(anyhow!("plain_timed_header must not be empty"));
        }

        for language in self.encoding.profiles.languages() {
            crate::language_utils::validate_language_code(language)
                .with_context(|| format!("Invalid language in encoding profiles: {}", language))?;
        }
        self.encoding.profiles.validate()?;

        if self.validation.strict && !self.validation.enabled {
            warn!("validation.strict has no effect while validation.enabled is false");
        }

        Ok(())
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Load the configuration, writing a default one first if the file is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            default_language: default_language(),
            sami: FormatProfile::sami(),
            plain_timed_header: default_plain_timed_header(),
            encoding: EncodingConfig::default(),
            parser: ParserOptions::default(),
            validation: ValidationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
