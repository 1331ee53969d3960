//! A minimal character grid fed with raw output bytes.
//!
//! Only the cursor motions a progress writer relies on are honored: carriage
//! return, line feed, backspace and tab. Everything else, escape bytes
//! included, lands in a cell as-is. The grid scrolls up a row when the cursor
//! moves past the last one, like a console screen buffer does.

use std::collections::VecDeque;

use linecast_core::{CursorPosition, SurfaceGeometry, SurfaceSize};

const TAB_STOP: usize = 8;

#[derive(Debug, Clone)]
pub struct LineGrid {
    size: SurfaceSize,
    lines: VecDeque<Vec<char>>,
    row: usize,
    col: usize,
    // Trailing bytes of an incomplete UTF-8 sequence.
    pending: Vec<u8>,
}

impl LineGrid {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            lines: VecDeque::from([Vec::new()]),
            row: 0,
            col: 0,
            pending: Vec::new(),
        }
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn cursor(&self) -> CursorPosition {
        CursorPosition {
            row: self.row as i32,
            col: self.col as i32,
        }
    }

    pub fn geometry(&self) -> SurfaceGeometry {
        SurfaceGeometry {
            cursor: self.cursor(),
            size: self.size,
        }
    }

    /// Applies a chunk of output. Multi-byte characters may be split across
    /// chunks; invalid sequences become U+FFFD.
    pub fn feed(&mut self, bytes: &[u8]) {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(bytes);

        let mut rest: &[u8] = &input;
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    text.chars().for_each(|c| self.put(c));
                    rest = &[];
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    std::str::from_utf8(valid)
                        .unwrap_or_default()
                        .chars()
                        .for_each(|c| self.put(c));
                    match e.error_len() {
                        Some(len) => {
                            self.put(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }
        self.pending = rest.to_vec();
    }

    /// `width` cells of `row` as UTF-16, blank-padded like a console row.
    pub fn row_cells(&self, row: u16, width: u16) -> Vec<u16> {
        let width = usize::from(width);
        let mut cells = Vec::with_capacity(width);
        if let Some(line) = self.lines.get(usize::from(row)) {
            let mut buf = [0u16; 2];
            for c in line.iter().take(width) {
                cells.extend_from_slice(c.encode_utf16(&mut buf));
            }
        }
        if cells.len() < width {
            cells.resize(width, u16::from(b' '));
        }
        cells
    }

    fn cols(&self) -> usize {
        usize::from(self.size.cols).max(1)
    }

    fn rows(&self) -> usize {
        usize::from(self.size.rows).max(1)
    }

    fn put(&mut self, c: char) {
        match c {
            '\r' => self.col = 0,
            '\n' => self.line_feed(),
            '\u{8}' => self.col = self.col.saturating_sub(1),
            '\t' => {
                let next = (self.col / TAB_STOP + 1) * TAB_STOP;
                self.col = next.min(self.cols() - 1);
            }
            _ => {
                let col = self.col;
                let line = &mut self.lines[self.row];
                if line.len() <= col {
                    line.resize(col + 1, ' ');
                }
                line[col] = c;
                self.col += 1;
                if self.col >= self.cols() {
                    self.line_feed();
                }
            }
        }
    }

    fn line_feed(&mut self) {
        self.col = 0;
        if self.row + 1 < self.rows() {
            self.row += 1;
            if self.lines.len() <= self.row {
                self.lines.push_back(Vec::new());
            }
        } else {
            self.lines.pop_front();
            self.lines.push_back(Vec::new());
        }
    }
}
