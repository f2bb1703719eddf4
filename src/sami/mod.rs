/*!
 * SAMI conversion engine.
 *
 * - `profile`: header, footer and line template of the format
 * - `header`: case-insensitive header signature check
 * - `tokenizer`: lenient SGML tag/text event source
 * - `parser`: event-driven SAMI → record decoder
 * - `generator`: record → SAMI encoder
 */

pub mod generator;
pub mod header;
pub mod parser;
pub mod profile;
pub mod tokenizer;

pub use generator::SamiGenerator;
pub use header::HeaderVerifier;
pub use parser::{ParserOptions, SamiParser, TrailingCuePolicy};
pub use profile::{FormatProfile, SENTINEL_TEXT};
pub use tokenizer::{MarkupEvent, SgmlTokenizer, Tag};
