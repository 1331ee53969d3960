use std::io;

use crate::frame::Frame;
use crate::surface::{ShadowSurface, SurfaceGeometry};

/// Row offset used while the child is running: wherever the cursor is.
pub const CURSOR_ROW: i32 = 0;

/// Reads the row at `row_offset` from the cursor as a frame.
///
/// Best effort: a failed query or read, or an offset that lands outside the
/// buffer, yields an empty frame and the caller simply sees no new content.
pub fn sample<S: ShadowSurface + ?Sized>(surface: &mut S, row_offset: i32) -> Frame {
    match try_sample(surface, row_offset) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::trace!(row_offset, error = %e, "sample failed");
            Frame::empty()
        }
    }
}

/// The post-exit read. A cursor left mid-row means the child never moved to
/// a fresh line, so that row holds its last state and `row_offset` is ignored.
/// Only a cursor at column 0 uses `row_offset`.
pub fn sample_final<S: ShadowSurface + ?Sized>(surface: &mut S, row_offset: i32) -> Frame {
    match try_sample_final(surface, row_offset) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::trace!(row_offset, error = %e, "final sample failed");
            Frame::empty()
        }
    }
}

fn try_sample<S: ShadowSurface + ?Sized>(surface: &mut S, row_offset: i32) -> io::Result<Frame> {
    let geometry = surface.geometry()?;
    read_at(surface, &geometry, row_offset)
}

fn try_sample_final<S: ShadowSurface + ?Sized>(
    surface: &mut S,
    row_offset: i32,
) -> io::Result<Frame> {
    let geometry = surface.geometry()?;
    let offset = if geometry.cursor.col > 0 {
        CURSOR_ROW
    } else {
        row_offset
    };
    read_at(surface, &geometry, offset)
}

fn read_at<S: ShadowSurface + ?Sized>(
    surface: &mut S,
    geometry: &SurfaceGeometry,
    row_offset: i32,
) -> io::Result<Frame> {
    let Some(row) = geometry.row_at(row_offset) else {
        tracing::trace!(
            cursor_row = geometry.cursor.row,
            row_offset,
            "sample row outside buffer"
        );
        return Ok(Frame::empty());
    };

    let cells = surface.read_row(row, geometry.size.cols)?;
    Ok(Frame::from_cells(&cells))
}
