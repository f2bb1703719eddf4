/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use samiconv::app_config::{Config, LogLevel};
use samiconv::encoding::EncodingProfile;
use samiconv::sami::{FormatProfile, TrailingCuePolicy};

use crate::common;

/// Test default configuration values
#[test]
fn test_defaultConfig_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.default_language, "en");
    assert_eq!(config.sami, FormatProfile::sami());
    assert_eq!(config.plain_timed_header, "WEBVTT");
    assert_eq!(config.parser.trailing_cue, TrailingCuePolicy::Drop);
    assert!(!config.parser.preserve_italics);
    assert!(!config.validation.enabled);
    assert!(config.encoding.profiles.expected_for("ru").is_some());
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_configValidation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.default_language = "xyz".to_string();
    assert!(config.validate().is_err());
    config.default_language = "ko".to_string();
    assert!(config.validate().is_ok());

    config.plain_timed_header = "   ".to_string();
    assert!(config.validate().is_err());
    config.plain_timed_header = "WEBVTT".to_string();

    config.sami.line_template = "<SYNC Start={startTime}>".to_string();
    assert!(config.validate().is_err());
    config.sami = FormatProfile::sami();

    config.encoding.profiles = EncodingProfile::from_entries([("ru", vec!["not-a-charset"])]);
    assert!(config.validate().is_err());

    config.encoding.profiles = EncodingProfile::from_entries([("qqq", vec!["utf-8"])]);
    assert!(config.validate().is_err());

    config.encoding.profiles = EncodingProfile::from_entries([("rus", vec!["koi8-r"])]);
    assert!(config.validate().is_ok());
}

/// Test that partial config files fall back to defaults
#[test]
fn test_deserialize_withPartialJson_shouldFillDefaults() -> Result<()> {
    let config: Config = serde_json::from_str(
        r#"{
            "default_language": "ru",
            "parser": { "trailingCue": "flush", "preserveItalics": true },
            "log_level": "debug"
        }"#,
    )?;

    assert_eq!(config.default_language, "ru");
    assert_eq!(config.parser.trailing_cue, TrailingCuePolicy::Flush);
    assert!(config.parser.preserve_italics);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.sami, FormatProfile::sami());
    assert_eq!(config.plain_timed_header, "WEBVTT");
    Ok(())
}

/// Test save and reload
#[test]
fn test_saveAndLoad_shouldPreserveValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.default_language = "ja".to_string();
    config.validation.enabled = true;
    config.validation.strict = true;
    config.save(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded, config);
    Ok(())
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(config, Config::default());
    assert_eq!(Config::load_or_create(&path)?, config);
    Ok(())
}

#[test]
fn test_fromFile_withBrokenJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::from_file(&path).is_err());
    Ok(())
}

#[test]
fn test_logLevel_toLevelFilter_shouldMapEveryLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
