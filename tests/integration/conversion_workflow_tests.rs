/*!
 * End-to-end conversion tests: files on disk through the controller and back
 */

use anyhow::Result;
use encoding_rs::EUC_KR;
use samiconv::app_config::Config;
use samiconv::app_controller::{ConversionDirection, Controller};
use samiconv::caption::{self, CaptionRecord};
use samiconv::errors::CaptionError;

use crate::common;

#[tokio::test]
async fn test_convertToJson_withSampleSami_shouldWriteRecords() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_sami(temp_dir.path(), "movie.smi")?;
    let controller = Controller::new_for_test()?;

    let output = controller
        .convert_to_json(&input, temp_dir.path(), "en", false)
        .await?
        .expect("output should be written");

    assert_eq!(output, temp_dir.path().join("movie.json"));
    assert_eq!(caption::load_records(&output).await?, common::sample_records());
    Ok(())
}

#[tokio::test]
async fn test_fullRoundTrip_smiToJsonToSmiToJson_shouldBeStable() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let first_dir = temp_dir.path().join("first");
    let second_dir = temp_dir.path().join("second");
    let input = common::create_test_sami(temp_dir.path(), "movie.smi")?;
    let controller = Controller::new_for_test()?;

    let json = controller
        .run(&input, &first_dir, ConversionDirection::ToJson, "en", false)
        .await?
        .unwrap();
    let smi = controller
        .run(&json, &second_dir, ConversionDirection::ToSami, "en", false)
        .await?
        .unwrap();
    let json_again = controller
        .run(&smi, &second_dir, ConversionDirection::ToJson, "en", false)
        .await?
        .unwrap();

    assert_eq!(caption::load_records(&json).await?, caption::load_records(&json_again).await?);
    Ok(())
}

#[tokio::test]
async fn test_convertToSami_shouldRenderBlankFramesAsSentinel() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let records = vec![
        CaptionRecord::with_end(1_000_000, 2_000_000, "{italic}Hello{end-italic}"),
        CaptionRecord::blank(3_000_000),
    ];
    let input = common::create_test_file(temp_dir.path(), "clip.json", &caption::records_to_json(&records)?)?;
    let controller = Controller::new_for_test()?;

    let output = controller.convert_to_sami(&input, temp_dir.path(), false).await?.unwrap();
    let markup = std::fs::read_to_string(&output)?;

    assert!(markup.starts_with("<SAMI>"));
    assert!(markup.contains("<SYNC Start=1000><P Class=ENCC><i>Hello</i></P></SYNC>"));
    assert!(markup.contains("<SYNC Start=3000><P Class=ENCC>&nbsp;</P></SYNC>"));

    let parsed = controller.parse_markup(&markup)?;
    assert_eq!(parsed[1], CaptionRecord::blank(3_000_000));
    Ok(())
}

#[tokio::test]
async fn test_convertToJson_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_sami(temp_dir.path(), "movie.smi")?;
    let existing = common::create_test_file(temp_dir.path(), "movie.json", "keep me")?;
    let controller = Controller::new_for_test()?;

    let skipped = controller.convert_to_json(&input, temp_dir.path(), "en", false).await?;
    assert!(skipped.is_none());
    assert_eq!(std::fs::read_to_string(&existing)?, "keep me");

    let forced = controller.convert_to_json(&input, temp_dir.path(), "en", true).await?;
    assert_eq!(forced, Some(existing.clone()));
    assert_ne!(std::fs::read_to_string(&existing)?, "keep me");
    Ok(())
}

#[tokio::test]
async fn test_loadMarkup_withWrongHeader_shouldReportInvalidSmiFormat() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "fake.smi", "<HTML>\n<SYNC Start=1>Hi\n")?;
    let controller = Controller::new_for_test()?;

    let err = controller.load_markup(&input, "en").await.unwrap_err();
    assert!(err.is_format_mismatch());
    Ok(())
}

#[tokio::test]
async fn test_loadMarkup_withLegacyKoreanFile_shouldDecodeText() -> Result<()> {
    let text = "\u{c548}\u{b155}\u{d558}\u{c138}\u{c694}, \u{c5ec}\u{b7ec}\u{bd84}. \
                \u{c624}\u{b298}\u{c740} \u{c790}\u{b9c9} \u{d14c}\u{c2a4}\u{d2b8}\u{c785}\u{b2c8}\u{b2e4}.";
    let source = format!(
        "<SAMI>\r\n<BODY>\r\n<SYNC Start=1000><P Class=KRCC>{}\r\n<SYNC Start=3000><P Class=KRCC>&nbsp;\r\n</BODY>\r\n</SAMI>\r\n",
        text
    );
    let (bytes, _, had_errors) = EUC_KR.encode(&source);
    assert!(!had_errors);

    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_bytes(temp_dir.path(), "korean.smi", &bytes)?;
    let controller = Controller::new_for_test()?;

    let records = controller.load_markup(&input, "ko").await?;
    assert_eq!(records, vec![CaptionRecord::with_end(1_000_000, 3_000_000, text)]);
    Ok(())
}

#[tokio::test]
async fn test_strictValidation_withBackwardsTimeline_shouldRejectRecords() -> Result<()> {
    let mut config = Config::default();
    config.validation.enabled = true;
    config.validation.strict = true;
    let controller = Controller::with_config(config)?;

    let records = vec![CaptionRecord::new(5_000_000, "late"), CaptionRecord::new(1_000_000, "early")];
    let err = controller.render_markup(&records).unwrap_err();
    assert!(matches!(err, CaptionError::Timeline(_)));

    let lenient = Controller::new_for_test()?;
    assert!(lenient.render_markup(&records).is_ok());
    Ok(())
}

#[tokio::test]
async fn test_runFolder_shouldConvertEveryFileAndCountFailures() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("in");
    let output_dir = temp_dir.path().join("out");
    std::fs::create_dir_all(input_dir.join("nested"))?;

    common::create_test_sami(&input_dir, "one.smi")?;
    common::create_test_sami(&input_dir.join("nested"), "two.sami")?;
    common::create_test_file(&input_dir, "broken.smi", "not a sami file")?;
    common::create_test_file(&input_dir, "ignored.txt", "<SAMI>")?;

    let controller = Controller::new_for_test()?;
    let summary = controller
        .run_folder(&input_dir, Some(output_dir.as_path()), ConversionDirection::ToJson, "en", false)
        .await?;

    assert_eq!(summary.converted, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 0);
    assert!(output_dir.join("one.json").exists());
    assert!(output_dir.join("two.json").exists());
    assert!(!output_dir.join("broken.json").exists());

    let again = controller
        .run_folder(&input_dir, Some(output_dir.as_path()), ConversionDirection::ToJson, "en", false)
        .await?;
    assert_eq!(again.skipped, 2);
    Ok(())
}

#[tokio::test]
async fn test_runFolder_withoutMatchingFiles_shouldFail() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "notes.txt", "nothing")?;

    let controller = Controller::new_for_test()?;
    let result = controller
        .run_folder(temp_dir.path(), None, ConversionDirection::ToSami, "en", false)
        .await;
    assert!(result.is_err());
    Ok(())
}
