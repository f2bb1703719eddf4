/*!
 * Timeline validation for caption records.
 *
 * Optional pass, kept out of the parse and generate paths. It checks that:
 * - start times never go backwards
 * - an end time, when present, is not before its start time
 */

use log::{debug, warn};

use crate::caption::CaptionRecord;
use crate::errors::CaptionError;

/// Types of timeline issues
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineIssue {
    /// Start time earlier than the previous record's start
    StartGoesBackwards {
        index: usize,
        start_time_micro: u64,
        previous_start_micro: u64,
    },
    /// End time earlier than the start time
    EndBeforeStart {
        index: usize,
        start_time_micro: u64,
        end_time_micro: u64,
    },
}

impl TimelineIssue {
    /// Position of the offending record
    pub fn index(&self) -> usize {
        match self {
            Self::StartGoesBackwards { index, .. } | Self::EndBeforeStart { index, .. } => *index,
        }
    }
}

impl std::fmt::Display for TimelineIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimelineIssue::StartGoesBackwards { index, start_time_micro, previous_start_micro } => {
                write!(
                    f,
                    "Record {} starts at {}us, before the previous start {}us",
                    index, start_time_micro, previous_start_micro
                )
            }
            TimelineIssue::EndBeforeStart { index, start_time_micro, end_time_micro } => {
                write!(
                    f,
                    "Record {} ends at {}us, before its start {}us",
                    index, end_time_micro, start_time_micro
                )
            }
        }
    }
}

/// Result of validating a record sequence
#[derive(Debug, Clone, Default)]
pub struct TimelineValidationResult {
    /// Overall pass/fail status
    pub passed: bool,
    /// Issues in record order
    pub issues: Vec<TimelineIssue>,
}

/// Timeline validator for caption records
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineValidator;

impl TimelineValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a sequence of records
    pub fn validate(&self, records: &[CaptionRecord]) -> TimelineValidationResult {
        let mut issues = Vec::new();
        let mut previous_start: Option<u64> = None;

        for (index, record) in records.iter().enumerate() {
            if let Some(previous_start_micro) = previous_start {
                if record.start_time_micro < previous_start_micro {
                    issues.push(TimelineIssue::StartGoesBackwards {
                        index,
                        start_time_micro: record.start_time_micro,
                        previous_start_micro,
                    });
                }
            }

            if let Some(end_time_micro) = record.end_time_micro {
                if end_time_micro < record.start_time_micro {
                    issues.push(TimelineIssue::EndBeforeStart {
                        index,
                        start_time_micro: record.start_time_micro,
                        end_time_micro,
                    });
                }
            }

            previous_start = Some(record.start_time_micro);
        }

        debug!("Timeline validation found {} issue(s) in {} records", issues.len(), records.len());

        TimelineValidationResult {
            passed: issues.is_empty(),
            issues,
        }
    }

    /// Validate and either log the issues or, in strict mode, reject the records
    pub fn check(&self, records: &[CaptionRecord], strict: bool) -> Result<TimelineValidationResult, CaptionError> {
        let result = self.validate(records);
        if result.passed {
            return Ok(result);
        }

        if strict {
            let summary = result
                .issues
                .iter()
                .map(|issue| issue.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(CaptionError::Timeline(summary));
        }

        for issue in &result.issues {
            warn!("{}", issue);
        }
        Ok(result)
    }
}
