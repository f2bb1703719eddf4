/*!
 * SAMI → caption record decoding.
 *
 * The parser is an explicit accumulator fed one [`MarkupEvent`] at a time, so
 * any tokenizer that yields open-tag / text / close-tag events in document
 * order can drive it. `<sync start=..>` stashes a pending time, text picks the
 * pending time up as a cue start, and the `&nbsp;` sentinel closes the cue,
 * turning a pending time into its clear time.
 */

use std::mem;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::caption::{CaptionRecord, MICROS_PER_MILLI};
use crate::macros::Macro;
use crate::sami::profile::SENTINEL_TEXT;
use crate::sami::tokenizer::{MarkupEvent, SgmlTokenizer, Tag};

const SYNC_TAG: &str = "sync";
const BR_TAG: &str = "br";
const ITALIC_TAG: &str = "i";
const START_ATTRIBUTE: &str = "start";

/// What to do with a cue still open when the input ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingCuePolicy {
    /// Discard it; SAMI cues are expected to end with a sentinel
    #[default]
    Drop,
    /// Emit it without an end time
    Flush,
}

/// Parser behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserOptions {
    /// Handling of an unterminated last cue
    #[serde(default)]
    pub trailing_cue: TrailingCuePolicy,

    /// Map `<i>`/`</i>` to `{italic}`/`{end-italic}` instead of dropping them
    #[serde(default)]
    pub preserve_italics: bool,
}

// @struct: Cue under construction
#[derive(Debug, Default)]
struct PartialCue {
    start_time_micro: Option<u64>,
}

/// Event-driven SAMI decoder
#[derive(Debug, Default)]
pub struct SamiParser {
    options: ParserOptions,
    pending_time_micro: Option<u64>,
    accumulated_text: String,
    current: PartialCue,
    records: Vec<CaptionRecord>,
    // @field: Length of leading text a new cue replaces, until the first record is out
    superseded_len: Option<usize>,
}

impl SamiParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParserOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Records completed so far
    pub fn records(&self) -> &[CaptionRecord] {
        &self.records
    }

    /// Feed one event
    pub fn handle_event(&mut self, event: MarkupEvent<'_>) {
        match event {
            MarkupEvent::OpenTag(tag) => self.on_open_tag(&tag),
            MarkupEvent::Text(text) => self.on_text(&text),
            MarkupEvent::CloseTag(name) => self.on_close_tag(&name),
        }
    }

    /// End of input: apply the trailing cue policy and hand back the records
    pub fn finish(mut self) -> Vec<CaptionRecord> {
        if let Some(start_time_micro) = self.current.start_time_micro {
            match self.options.trailing_cue {
                TrailingCuePolicy::Drop => {
                    warn!(
                        "Dropping unterminated caption starting at {}us: {}",
                        start_time_micro, self.accumulated_text
                    );
                }
                TrailingCuePolicy::Flush => {
                    debug!("Flushing unterminated caption starting at {}us", start_time_micro);
                    let text = mem::take(&mut self.accumulated_text);
                    self.records.push(CaptionRecord::new(start_time_micro, text));
                }
            }
        } else if !self.accumulated_text.is_empty() {
            debug!("Discarding untimed trailing text: {}", self.accumulated_text);
        }

        debug!("Parsed {} caption records", self.records.len());
        self.records
    }

    /// Drive the parser with any event source
    pub fn parse_events<'a, I>(mut self, events: I) -> Vec<CaptionRecord>
    where
        I: IntoIterator<Item = MarkupEvent<'a>>,
    {
        for event in events {
            self.handle_event(event);
        }
        self.finish()
    }

    /// Tokenize and parse a SAMI document
    pub fn parse_str(self, input: &str) -> Vec<CaptionRecord> {
        self.parse_events(SgmlTokenizer::new(input))
    }

    fn on_open_tag(&mut self, tag: &Tag) {
        match tag.name.as_str() {
            SYNC_TAG => self.on_sync(tag),
            BR_TAG => self.accumulated_text.push_str(Macro::Break.directive()),
            ITALIC_TAG if self.options.preserve_italics => {
                self.accumulated_text.push_str(Macro::Italic.directive())
            }
            _ => {}
        }
    }

    fn on_close_tag(&mut self, name: &str) {
        if self.options.preserve_italics && name == ITALIC_TAG {
            self.accumulated_text.push_str(Macro::EndItalic.directive());
        }
    }

    fn on_sync(&mut self, tag: &Tag) {
        match tag.attribute(START_ATTRIBUTE) {
            Some(value) => match parse_start_micro(value) {
                Some(time_micro) => self.pending_time_micro = Some(time_micro),
                None => warn!("Ignoring <sync> with unreadable start time: {:?}", value),
            },
            None => warn!("Ignoring <sync> without a start attribute"),
        }

        if !self.records.is_empty() {
            return;
        }
        if self.current.start_time_micro.is_none() {
            if !self.accumulated_text.is_empty() {
                debug!("Discarding text before the first sync: {}", self.accumulated_text);
            }
            self.accumulated_text.clear();
        } else {
            // A sentinel still closes the open cue; new text replaces it
            self.superseded_len = Some(self.accumulated_text.len());
        }
    }

    fn on_text(&mut self, raw: &str) {
        let text = raw.trim();
        if text.is_empty() {
            return;
        }

        if text == SENTINEL_TEXT {
            self.superseded_len = None;
            self.close_cue();
            return;
        }

        if let Some(time_micro) = self.pending_time_micro.take() {
            self.current.start_time_micro = Some(time_micro);
            if let Some(len) = self.superseded_len.take() {
                let dropped: String = self.accumulated_text.drain(..len).collect();
                debug!("Discarding unterminated leading caption: {}", dropped);
            }
        }
        self.accumulated_text.push_str(text);
    }

    fn close_cue(&mut self) {
        let clear_time = self.pending_time_micro.take();
        let text = mem::take(&mut self.accumulated_text);
        let cue = mem::take(&mut self.current);

        match (cue.start_time_micro, clear_time) {
            (Some(start), end) => self.records.push(CaptionRecord {
                start_time_micro: start,
                end_time_micro: end,
                text,
            }),
            // Sentinel on a fresh sync: a blank frame starting there
            (None, Some(start)) if text.is_empty() => self.records.push(CaptionRecord::blank(start)),
            (None, _) => {
                if !text.is_empty() {
                    warn!("Dropping caption text without a start time: {}", text);
                }
            }
        }
    }
}

// @returns: Microseconds for a millisecond attribute value
fn parse_start_micro(value: &str) -> Option<u64> {
    let value = value.trim();
    if let Ok(ms) = value.parse::<u64>() {
        return ms.checked_mul(MICROS_PER_MILLI);
    }
    match value.parse::<f64>() {
        Ok(ms) if ms.is_finite() && ms >= 0.0 => Some((ms * MICROS_PER_MILLI as f64).round() as u64),
        _ => None,
    }
}
