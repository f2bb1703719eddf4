/*!
 * Tests for error types and conversions
 */

use samiconv::errors::{CaptionError, FormatKind};

#[test]
fn test_formatMismatch_shouldDisplayStableCode() {
    let sami = CaptionError::format_mismatch(FormatKind::Sami);
    let plain = CaptionError::format_mismatch(FormatKind::PlainTimed);

    assert!(sami.is_format_mismatch());
    assert_eq!(sami.to_string(), "INVALID_SMI_FORMAT: header does not match the SAMI format");
    assert!(plain.to_string().starts_with("INVALID_PLAIN_TIMED_FORMAT"));
}

#[test]
fn test_captionError_fromIo_shouldWrap() {
    let error: CaptionError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();

    assert!(matches!(error, CaptionError::Io(_)));
    assert!(!error.is_format_mismatch());
    assert!(error.to_string().contains("gone"));
}

#[test]
fn test_captionError_fromJson_shouldWrap() {
    let json_error = serde_json::from_str::<Vec<u32>>("[1,").unwrap_err();
    let error: CaptionError = json_error.into();

    assert!(matches!(error, CaptionError::Json(_)));
    assert!(error.to_string().starts_with("Caption JSON error"));
}

#[test]
fn test_unknownEncoding_shouldNameLabel() {
    let error = CaptionError::UnknownEncoding("klingon-8".to_string());
    assert_eq!(error.to_string(), "Unknown character encoding: klingon-8");
}
