use std::fmt;

use unicode_width::UnicodeWidthChar;

/// One sampled console row with the buffer padding trimmed off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Frame(String);

impl Frame {
    /// Builds a frame from raw row text, trimming surrounding whitespace.
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(text.as_ref().trim().to_string())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Decodes a row of UTF-16 cells. Unpaired surrogates (a torn read of a
    /// surrogate pair) come through as U+FFFD so the printability gate
    /// rejects the frame.
    pub fn from_cells(cells: &[u16]) -> Self {
        let text: String = char::decode_utf16(cells.iter().copied())
            .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
        Self::new(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every character would render as a visible glyph.
    pub fn is_printable(&self) -> bool {
        self.0.chars().all(is_printable_char)
    }
}

/// Printability as seen by someone looking at the console: control
/// characters, replacement characters and anything without a display width
/// are garbage.
pub fn is_printable_char(c: char) -> bool {
    !c.is_control() && c != char::REPLACEMENT_CHARACTER && c.width().is_some()
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Frame {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Frame {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Frame {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
