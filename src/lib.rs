/*!
 * # samiconv - SAMI caption conversion
 *
 * A Rust library for converting SAMI subtitle markup to and from a canonical
 * sequence of timed caption records.
 *
 * ## Features
 *
 * - Decode SAMI markup into caption records, tolerating the loose markup
 *   found in real subtitle files
 * - Render caption records as SAMI with a configurable header, footer and
 *   line template
 * - Translate between portable text macros (`{break}`, `{italic}`,
 *   `{end-italic}`) and markup
 * - Normalize legacy character encodings to UTF-8 using per-language
 *   expectations
 * - Header checks for SAMI and plain timed caption files
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `caption`: The caption record and its JSON form
 * - `macros`: Macro ↔ markup translation
 * - `sami`: SAMI conversion engine:
 *   - `sami::tokenizer`: Lenient tag/text event source
 *   - `sami::parser`: Markup → records
 *   - `sami::generator`: Records → markup
 *   - `sami::header`: Header signature check
 *   - `sami::profile`: Header, footer and line template
 * - `encoding`: Character set detection and transcoding
 * - `format_reader`: Header-gated file readers
 * - `validation`: Timeline checks on record sequences
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod caption;
pub mod encoding;
pub mod errors;
pub mod file_utils;
pub mod format_reader;
pub mod language_utils;
pub mod macros;
pub mod sami;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{ConversionDirection, Controller};
pub use caption::CaptionRecord;
pub use encoding::{EncodingNormalizer, EncodingProfile};
pub use errors::{CaptionError, FormatKind};
pub use format_reader::FormatReader;
pub use language_utils::{get_language_name, language_codes_match};
pub use macros::Macro;
pub use sami::{FormatProfile, HeaderVerifier, ParserOptions, SamiGenerator, SamiParser, TrailingCuePolicy};
