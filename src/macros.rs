/*!
 * Inline style macros.
 *
 * Caption JSON carries styling as `{break}`, `{italic}` and `{end-italic}`;
 * SAMI carries the same thing as `<br>`, `<i>` and `</i>`. The mapping is a
 * closed table so both directions stay total over the supported set.
 */

use std::fmt;

/// Supported inline style directives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Macro {
    /// Line break
    Break,
    /// Start of italic text
    Italic,
    /// End of italic text
    EndItalic,
}

/// Bidirectional macro/markup table
const MACRO_TABLE: [(Macro, &str, &str); 3] = [
    (Macro::Break, "{break}", "<br>"),
    (Macro::Italic, "{italic}", "<i>"),
    (Macro::EndItalic, "{end-italic}", "</i>"),
];

impl Macro {
    /// All supported macros
    pub const ALL: [Macro; 3] = [Macro::Break, Macro::Italic, Macro::EndItalic];

    fn entry(&self) -> &'static (Macro, &'static str, &'static str) {
        // The table is indexed in the same order as ALL
        match self {
            Macro::Break => &MACRO_TABLE[0],
            Macro::Italic => &MACRO_TABLE[1],
            Macro::EndItalic => &MACRO_TABLE[2],
        }
    }

    /// Directive as written in caption JSON
    pub fn directive(&self) -> &'static str {
        self.entry().1
    }

    /// Equivalent SAMI tag
    pub fn markup(&self) -> &'static str {
        self.entry().2
    }

    /// Look a macro up by its directive text
    pub fn from_directive(directive: &str) -> Option<Macro> {
        MACRO_TABLE
            .iter()
            .find(|(_, d, _)| *d == directive)
            .map(|(m, _, _)| *m)
    }

    /// Look a macro up by its SAMI tag
    pub fn from_markup(tag: &str) -> Option<Macro> {
        MACRO_TABLE
            .iter()
            .find(|(_, _, t)| *t == tag)
            .map(|(m, _, _)| *m)
    }
}

impl fmt::Display for Macro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.directive())
    }
}

/// Render macros into SAMI tags
pub fn to_markup(text: &str) -> String {
    MACRO_TABLE
        .iter()
        .fold(text.to_string(), |acc, (_, directive, tag)| acc.replace(directive, tag))
}

/// Convert SAMI tags back into macros
pub fn to_macros(text: &str) -> String {
    MACRO_TABLE
        .iter()
        .fold(text.to_string(), |acc, (_, directive, tag)| acc.replace(tag, directive))
}
