use log::debug;

use crate::caption::CaptionRecord;
use crate::macros;
use crate::sami::profile::{FormatProfile, SENTINEL_TEXT};

// @module: Caption record → SAMI encoding

/// Renders caption records through a [`FormatProfile`]
#[derive(Debug, Clone, Default)]
pub struct SamiGenerator {
    profile: FormatProfile,
}

impl SamiGenerator {
    pub fn new(profile: FormatProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &FormatProfile {
        &self.profile
    }

    /// Render records as a complete document.
    ///
    /// Each record yields one cue line at its truncated start millisecond and,
    /// when it has an end time, a second line clearing the caption. Blank
    /// records are written as the `&nbsp;` sentinel. Records are emitted as
    /// given; ordering and time ranges are not checked here.
    pub fn generate(&self, records: &[CaptionRecord]) -> String {
        let mut lines: Vec<String> =
            Vec::with_capacity(self.profile.header.len() + self.profile.footer.len() + records.len() * 2);

        lines.extend(self.profile.header.iter().cloned());

        for record in records {
            let text = if record.is_blank() {
                SENTINEL_TEXT.to_string()
            } else {
                macros::to_markup(&record.text)
            };
            lines.push(self.profile.render_line(record.start_time_ms(), &text));

            if let Some(end_time_ms) = record.end_time_ms() {
                lines.push(self.profile.render_line(end_time_ms, SENTINEL_TEXT));
            }
        }

        lines.extend(self.profile.footer.iter().cloned());
        debug!("Generated {} lines for {} caption records", lines.len(), records.len());

        let mut output = lines.join("\n");
        output.push('\n');
        output
    }
}
