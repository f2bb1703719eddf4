use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

// @module: Format constants for template-driven caption output

/// Placeholder bound to the cue time in milliseconds
pub const START_TIME_PLACEHOLDER: &str = "{startTime}";

/// Placeholder bound to the cue text
pub const TEXT_PLACEHOLDER: &str = "{text}";

/// Text that marks a caption clear in SAMI
pub const SENTINEL_TEXT: &str = "&nbsp;";

/// Header, footer and line template of a caption format.
///
/// Profiles are plain values: build one, hand it to the generator or the
/// header verifier, and never mutate it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatProfile {
    /// Lines emitted before the first cue; the first one is the header signature
    pub header: Vec<String>,

    /// Lines emitted after the last cue
    #[serde(default)]
    pub footer: Vec<String>,

    /// One cue line, with `{startTime}` and `{text}` placeholders
    pub line_template: String,
}

impl FormatProfile {
    /// The standard SAMI profile
    pub fn sami() -> Self {
        let header = [
            "<SAMI>",
            "<HEAD>",
            "<TITLE>SAMI</TITLE>",
            "<STYLE TYPE=\"text/css\">",
            "<!--",
            "P {margin-left: 1pt; margin-right: 1pt; margin-bottom: 2pt; margin-top: 2pt;",
            "   text-align: center; font-size: 12pt; font-family: arial, sans-serif;",
            "   font-weight: normal; color: white;}",
            ".ENCC {Name: English; lang: en-US; SAMIType: CC;}",
            "-->",
            "</STYLE>",
            "</HEAD>",
            "<BODY>",
        ];

        Self {
            header: header.iter().map(|line| line.to_string()).collect(),
            footer: vec!["</BODY>".to_string(), "</SAMI>".to_string()],
            line_template: "<SYNC Start={startTime}><P Class=ENCC>{text}</P></SYNC>".to_string(),
        }
    }

    /// First header line, used as the format signature
    pub fn signature(&self) -> Option<&str> {
        self.header.first().map(|line| line.as_str())
    }

    /// Bind the template placeholders for one cue line
    pub fn render_line(&self, start_time_ms: u64, text: &str) -> String {
        self.line_template
            .replacen(START_TIME_PLACEHOLDER, &start_time_ms.to_string(), 1)
            .replacen(TEXT_PLACEHOLDER, text, 1)
    }

    /// Check the profile can actually drive generation and verification
    pub fn validate(&self) -> Result<()> {
        match self.signature() {
            Some(signature) if !signature.trim().is_empty() => {}
            _ => return Err(anyhow!("Format profile needs a non-empty first header line")),
        }

        for placeholder in [START_TIME_PLACEHOLDER, TEXT_PLACEHOLDER] {
            if !self.line_template.contains(placeholder) {
                return Err(anyhow!(
                    "Line template '{}' is missing the {} placeholder",
                    self.line_template,
                    placeholder
                ));
            }
        }

        Ok(())
    }
}

impl Default for FormatProfile {
    fn default() -> Self {
        Self::sami()
    }
}
