/*!
 * Lenient tag/text tokenizer for SAMI markup.
 *
 * SAMI is SGML rather than XML: tags are often unclosed (`<P>`, `<br>`),
 * attribute values are frequently unquoted and tag names come in any case.
 * The tokenizer emits open-tag, text and close-tag events in document order,
 * lowercasing tag and attribute names. Comments and declarations are
 * skipped, `<style>`/`<script>` bodies are emitted as a single text event and
 * character entities are left untouched.
 */

use std::borrow::Cow;
use std::collections::VecDeque;

/// Elements whose body is raw text up to the matching close tag
const RAW_TEXT_ELEMENTS: [&str; 2] = ["style", "script"];

/// A parsed opening tag
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tag {
    /// Lowercased element name
    pub name: String,
    /// Attributes in document order, names lowercased, values verbatim
    pub attributes: Vec<(String, String)>,
    /// Written as `<name ... />`
    pub self_closing: bool,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style attribute append, mostly for hand-built event streams
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// First value of an attribute (names compare case-insensitively)
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// One event of the tag/text stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent<'a> {
    OpenTag(Tag),
    Text(Cow<'a, str>),
    CloseTag(String),
}

impl<'a> MarkupEvent<'a> {
    /// Convenience constructor for text events
    pub fn text(text: impl Into<Cow<'a, str>>) -> Self {
        MarkupEvent::Text(text.into())
    }
}

/// Iterator of [`MarkupEvent`]s over a markup string
pub struct SgmlTokenizer<'a> {
    input: &'a str,
    pos: usize,
    raw_text_element: Option<String>,
    queued: VecDeque<MarkupEvent<'a>>,
}

impl<'a> SgmlTokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            raw_text_element: None,
            queued: VecDeque::new(),
        }
    }

    /// Consume everything the tokenizer would emit
    pub fn collect_events(self) -> Vec<MarkupEvent<'a>> {
        self.collect()
    }

    fn rest(&self) -> &'a str {
        let input = self.input;
        &input[self.pos..]
    }

    // @returns: Raw body of a <style>/<script> element
    fn take_raw_text(&mut self, element: &str) -> &'a str {
        let rest = self.rest();
        let closing = format!("</{}", element);
        let end = rest
            .to_ascii_lowercase()
            .find(&closing)
            .unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    // @returns: Plain text up to the next '<' (starting at `from`)
    fn take_text(&mut self, from: usize) -> &'a str {
        let rest = self.rest();
        let end = rest[from..].find('<').map_or(rest.len(), |i| i + from);
        self.pos += end;
        &rest[..end]
    }

    fn skip_past(&mut self, start: usize, terminator: &str) {
        let rest = self.rest();
        let end = rest[start..]
            .find(terminator)
            .map_or(rest.len(), |i| start + i + terminator.len());
        self.pos += end;
    }

    fn close_tag(&mut self) -> Option<String> {
        let rest = self.rest();
        let Some(end) = rest.find('>') else {
            // Unterminated close tag at end of input
            self.pos = self.input.len();
            return None;
        };
        self.pos += end + 1;
        let name = rest[2..end]
            .trim()
            .split(|c: char| c.is_ascii_whitespace())
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if name.is_empty() { None } else { Some(name) }
    }

    // @returns: Parsed tag and the number of bytes it spans, None if unterminated
    fn open_tag(rest: &str) -> Option<(Tag, usize)> {
        let bytes = rest.as_bytes();
        let len = bytes.len();
        let mut i = 1;

        while i < len && (bytes[i].is_ascii_alphanumeric() || matches!(bytes[i], b'-' | b':' | b'_')) {
            i += 1;
        }
        let mut tag = Tag::new(rest[1..i].to_ascii_lowercase());

        loop {
            while i < len && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i >= len {
                return None;
            }
            match bytes[i] {
                b'>' => return Some((tag, i + 1)),
                b'/' => {
                    tag.self_closing = bytes.get(i + 1) == Some(&b'>');
                    i += 1;
                    continue;
                }
                _ => {}
            }

            let name_start = i;
            while i < len
                && !bytes[i].is_ascii_whitespace()
                && !matches!(bytes[i], b'=' | b'>' | b'/')
            {
                i += 1;
            }
            let name = rest[name_start..i].to_ascii_lowercase();

            while i < len && bytes[i].is_ascii_whitespace() {
                i += 1;
            }

            let mut value = String::new();
            if i < len && bytes[i] == b'=' {
                i += 1;
                while i < len && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                if i < len && matches!(bytes[i], b'"' | b'\'') {
                    let quote = bytes[i];
                    i += 1;
                    let value_start = i;
                    while i < len && bytes[i] != quote {
                        i += 1;
                    }
                    if i >= len {
                        return None;
                    }
                    value = rest[value_start..i].to_string();
                    i += 1;
                } else {
                    let value_start = i;
                    while i < len && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    value = rest[value_start..i].to_string();
                }
            }

            tag.attributes.push((name, value));
        }
    }
}

impl<'a> Iterator for SgmlTokenizer<'a> {
    type Item = MarkupEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.queued.pop_front() {
            return Some(event);
        }

        loop {
            if self.pos >= self.input.len() {
                return None;
            }

            if let Some(element) = self.raw_text_element.take() {
                let text = self.take_raw_text(&element);
                if !text.is_empty() {
                    return Some(MarkupEvent::Text(Cow::Borrowed(text)));
                }
                continue;
            }

            let rest = self.rest();
            if !rest.starts_with('<') {
                return Some(MarkupEvent::Text(Cow::Borrowed(self.take_text(0))));
            }

            if rest.starts_with("<!--") {
                self.skip_past(4, "-->");
                continue;
            }
            if rest.starts_with("<!") || rest.starts_with("<?") {
                self.skip_past(2, ">");
                continue;
            }
            if rest.starts_with("</") {
                match self.close_tag() {
                    Some(name) => return Some(MarkupEvent::CloseTag(name)),
                    None => continue,
                }
            }

            let starts_tag = rest[1..].chars().next().is_some_and(|c| c.is_ascii_alphabetic());
            if !starts_tag {
                // A lone '<' is literal text
                return Some(MarkupEvent::Text(Cow::Borrowed(self.take_text(1))));
            }

            match Self::open_tag(rest) {
                Some((tag, consumed)) => {
                    self.pos += consumed;
                    if tag.self_closing {
                        self.queued.push_back(MarkupEvent::CloseTag(tag.name.clone()));
                    } else if RAW_TEXT_ELEMENTS.contains(&tag.name.as_str()) {
                        self.raw_text_element = Some(tag.name.clone());
                    }
                    return Some(MarkupEvent::OpenTag(tag));
                }
                None => {
                    // Unterminated tag swallows the rest of the input
                    self.pos = self.input.len();
                    return None;
                }
            }
        }
    }
}
