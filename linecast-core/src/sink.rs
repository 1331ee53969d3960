use std::io::{self, Write};

use crate::frame::Frame;

/// Byte encoding of relayed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEncoding {
    Utf8,
    /// Little-endian UTF-16 without a byte order mark, the layout a
    /// wide-character text-mode stream produces on Windows.
    Utf16Le,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// How a frame is laid out on the real standard output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFormat {
    pub encoding: OutputEncoding,
    pub line_ending: LineEnding,
}

impl OutputFormat {
    pub const UTF8_LF: OutputFormat = OutputFormat {
        encoding: OutputEncoding::Utf8,
        line_ending: LineEnding::Lf,
    };

    pub const UTF16LE_CRLF: OutputFormat = OutputFormat {
        encoding: OutputEncoding::Utf16Le,
        line_ending: LineEnding::CrLf,
    };

    /// The platform's native line stream: UTF-16LE/CRLF on Windows, where
    /// consumers read the helper's output as wide text, UTF-8/LF elsewhere.
    pub fn native() -> Self {
        if cfg!(windows) {
            Self::UTF16LE_CRLF
        } else {
            Self::UTF8_LF
        }
    }

    /// Encodes `text` followed by the line terminator.
    pub fn encode_line(&self, text: &str) -> Vec<u8> {
        let terminator = self.line_ending.as_str();
        match self.encoding {
            OutputEncoding::Utf8 => {
                let mut bytes = Vec::with_capacity(text.len() + terminator.len());
                bytes.extend_from_slice(text.as_bytes());
                bytes.extend_from_slice(terminator.as_bytes());
                bytes
            }
            OutputEncoding::Utf16Le => text
                .encode_utf16()
                .chain(terminator.encode_utf16())
                .flat_map(u16::to_le_bytes)
                .collect(),
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::native()
    }
}

/// Writes accepted frames to the real standard output, one complete and
/// flushed line per frame.
#[derive(Debug)]
pub struct ReplaySink<W: Write> {
    out: W,
    format: OutputFormat,
    emitted: u64,
}

impl<W: Write> ReplaySink<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            emitted: 0,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Number of lines written successfully so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn emit(&mut self, frame: &Frame) -> io::Result<()> {
        let line = self.format.encode_line(frame.as_str());
        self.out.write_all(&line)?;
        self.out.flush()?;
        self.emitted += 1;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
