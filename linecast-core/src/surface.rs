use std::io;

/// Dimensions of a shadow console, in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    /// The number of columns per row
    pub cols: u16,
    /// The number of rows in the buffer
    pub rows: u16,
}

impl SurfaceSize {
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

impl Default for SurfaceSize {
    /// Wide enough that long progress text never gets wrapped or elided.
    fn default() -> Self {
        Self {
            cols: 1024,
            rows: 1024,
        }
    }
}

/// Where the child's cursor currently sits. Zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPosition {
    pub row: i32,
    pub col: i32,
}

/// One state query of a shadow console: cursor plus buffer size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceGeometry {
    pub cursor: CursorPosition,
    pub size: SurfaceSize,
}

impl SurfaceGeometry {
    /// Absolute row at `offset` from the cursor row, or `None` when that row
    /// falls outside the buffer.
    pub fn row_at(&self, offset: i32) -> Option<u16> {
        let row = self.cursor.row.checked_add(offset)?;
        if row < 0 || row >= i32::from(self.size.rows) {
            return None;
        }
        u16::try_from(row).ok()
    }
}

/// An off-screen console that a child process writes into and that the
/// sampler reads back one row at a time.
pub trait ShadowSurface {
    /// Current cursor position and buffer dimensions.
    fn geometry(&mut self) -> io::Result<SurfaceGeometry>;

    /// Reads `width` cells of `row` as UTF-16 code units, in column order.
    fn read_row(&mut self, row: u16, width: u16) -> io::Result<Vec<u16>>;
}

impl<S: ShadowSurface + ?Sized> ShadowSurface for &mut S {
    fn geometry(&mut self) -> io::Result<SurfaceGeometry> {
        (**self).geometry()
    }

    fn read_row(&mut self, row: u16, width: u16) -> io::Result<Vec<u16>> {
        (**self).read_row(row, width)
    }
}
