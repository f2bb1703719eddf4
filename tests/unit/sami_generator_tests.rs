/*!
 * Tests for caption record → SAMI generation
 */

use samiconv::caption::CaptionRecord;
use samiconv::sami::{FormatProfile, SamiGenerator, SamiParser};

use crate::common;

fn expected_line_count(profile: &FormatProfile, records: &[CaptionRecord]) -> usize {
    let cue_lines: usize = records
        .iter()
        .map(|record| if record.end_time_micro.is_some() { 2 } else { 1 })
        .sum();
    profile.header.len() + profile.footer.len() + cue_lines
}

#[test]
fn test_generate_lineCount_shouldMatchHeaderFooterAndCues() {
    let generator = SamiGenerator::default();
    let sequences = [
        vec![CaptionRecord::new(0, "only")],
        vec![CaptionRecord::with_end(0, 1_000, "a"), CaptionRecord::new(2_000, "b")],
        common::sample_records(),
        (0..50u64)
            .map(|i| {
                if i % 3 == 0 {
                    CaptionRecord::blank(i * 1_000_000)
                } else {
                    CaptionRecord::with_end(i * 1_000_000, i * 1_000_000 + 500_000, format!("Line {}", i))
                }
            })
            .collect(),
    ];

    for records in &sequences {
        let output = generator.generate(records);
        assert_eq!(
            output.lines().count(),
            expected_line_count(generator.profile(), records),
            "line count for {} records",
            records.len()
        );
    }
}

#[test]
fn test_generate_withZeroEndTime_shouldStillEmitClearLine() {
    let generator = SamiGenerator::default();
    let records = [CaptionRecord::with_end(0, 0, "flash")];

    let output = generator.generate(&records);
    assert_eq!(output.lines().count(), expected_line_count(generator.profile(), &records));
    assert!(output.contains("<SYNC Start=0><P Class=ENCC>&nbsp;</P></SYNC>"));
}

#[test]
fn test_generate_shouldTruncateNotRound() {
    let output = SamiGenerator::default().generate(&[CaptionRecord::with_end(1_000_999, 2_500_500, "t")]);

    assert!(output.contains("<SYNC Start=1000><P Class=ENCC>t</P></SYNC>"));
    assert!(output.contains("<SYNC Start=2500><P Class=ENCC>&nbsp;</P></SYNC>"));
}

#[test]
fn test_generate_shouldKeepInputOrder() {
    let output = SamiGenerator::default().generate(&[
        CaptionRecord::new(3_000_000, "third"),
        CaptionRecord::new(1_000_000, "first"),
    ]);

    let third = output.find("third").unwrap();
    let first = output.find("first").unwrap();
    assert!(third < first);
}

#[test]
fn test_generate_withCustomProfile_shouldUseItsTemplate() {
    let profile = FormatProfile {
        header: vec!["<SAMI>".to_string(), "<BODY>".to_string()],
        footer: vec!["</BODY></SAMI>".to_string()],
        line_template: "<SYNC Start={startTime}><P Class=KRCC>{text}".to_string(),
    };
    let output = SamiGenerator::new(profile).generate(&[CaptionRecord::with_end(1_000_000, 2_000_000, "Hi")]);

    assert_eq!(
        output,
        "<SAMI>\n<BODY>\n<SYNC Start=1000><P Class=KRCC>Hi\n<SYNC Start=2000><P Class=KRCC>&nbsp;\n</BODY></SAMI>\n"
    );
}

#[test]
fn test_blankFrame_roundTrip_shouldComeBackEmpty() {
    let records = vec![
        CaptionRecord::with_end(1_000_000, 2_000_000, "Before"),
        CaptionRecord::blank(3_000_000),
    ];

    let markup = SamiGenerator::default().generate(&records);
    assert!(markup.contains("<SYNC Start=3000><P Class=ENCC>&nbsp;</P></SYNC>"));

    let parsed = SamiParser::new().parse_str(&markup);
    assert_eq!(parsed, records);
    assert_eq!(parsed[1].text, "");
}

#[test]
fn test_roundTrip_withMacrosAndEndTimes_shouldPreserveRecords() {
    let records = vec![
        CaptionRecord::with_end(1_000_000, 2_500_000, "One{break}Two"),
        CaptionRecord::with_end(3_000_000, 4_000_000, "Three"),
        CaptionRecord::blank(5_000_000),
        CaptionRecord::with_end(6_000_000, 7_000_000, "Four"),
    ];

    let markup = SamiGenerator::default().generate(&records);
    assert_eq!(SamiParser::new().parse_str(&markup), records);
}
