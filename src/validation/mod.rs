/*!
 * Validation of caption record sequences.
 *
 * Kept separate from parsing and generation, which accept records as-is.
 *
 * - `timeline`: start-time ordering and end/start consistency
 */

pub mod timeline;

// Re-export main types
pub use timeline::{TimelineIssue, TimelineValidationResult, TimelineValidator};
