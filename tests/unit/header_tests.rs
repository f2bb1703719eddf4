/*!
 * Tests for header signature verification
 */

use samiconv::sami::{FormatProfile, HeaderVerifier};

fn sami_verifier() -> HeaderVerifier {
    HeaderVerifier::for_profile(&FormatProfile::sami()).expect("SAMI profile has a signature")
}

#[test]
fn test_verify_withAnyLetterCase_shouldPass() {
    let verifier = sami_verifier();

    for line in ["<SAMI>", "<sami>", "<Sami>", "<sAmI>"] {
        assert!(verifier.verify(line), "{} should verify", line);
    }
}

#[test]
fn test_verify_withSurroundingWhitespace_shouldPass() {
    assert!(sami_verifier().verify("  \t<SAMI>\r"));
}

#[test]
fn test_verify_withEmptyLine_shouldFail() {
    let verifier = sami_verifier();
    assert!(!verifier.verify(""));
    assert!(!verifier.verify("   "));
}

#[test]
fn test_verify_withoutSignature_shouldFail() {
    let verifier = sami_verifier();
    assert!(!verifier.verify("WEBVTT"));
    assert!(!verifier.verify("<HEAD>"));
    assert!(!verifier.verify("SAMI"));
}

#[test]
fn test_verify_withCustomSignature_shouldUseIt() {
    let verifier = HeaderVerifier::new("WEBVTT").unwrap();

    assert_eq!(verifier.signature(), "WEBVTT");
    assert!(verifier.verify("webvtt"));
    assert!(verifier.verify("WEBVTT - Chapter 1"));
    assert!(!verifier.verify("<SAMI>"));
}

#[test]
fn test_forProfile_withoutHeaderLines_shouldFail() {
    let profile = FormatProfile {
        header: Vec::new(),
        footer: Vec::new(),
        line_template: "{startTime} {text}".to_string(),
    };
    assert!(HeaderVerifier::for_profile(&profile).is_err());
}
