//! Native shadow console: an inheritable console screen buffer the child
//! writes into directly. Rows are read back cell by cell.

use std::ffi::c_void;
use std::io;
use std::os::windows::io::{AsRawHandle, FromRawHandle, OwnedHandle};
use std::sync::MutexGuard;

use linecast_core::{CursorPosition, RelayError, ShadowSurface, SurfaceGeometry, SurfaceSize};
use windows::Win32::Foundation::{BOOL, GENERIC_READ, GENERIC_WRITE, HANDLE};
use windows::Win32::Security::SECURITY_ATTRIBUTES;
use windows::Win32::Storage::FileSystem::{FILE_SHARE_READ, FILE_SHARE_WRITE};
use windows::Win32::System::Console::{
    CHAR_INFO, COMMON_LVB_TRAILING_BYTE, CONSOLE_MODE, CONSOLE_SCREEN_BUFFER_INFO,
    CONSOLE_TEXTMODE_BUFFER, COORD, CreateConsoleScreenBuffer, ENABLE_PROCESSED_OUTPUT,
    ENABLE_VIRTUAL_TERMINAL_PROCESSING, ENABLE_WRAP_AT_EOL_OUTPUT, GetConsoleMode,
    GetConsoleScreenBufferInfo, GetStdHandle, ReadConsoleOutputW, STD_OUTPUT_HANDLE, SMALL_RECT,
    SetConsoleMode, SetConsoleScreenBufferSize, SetStdHandle,
};

use crate::redirect;

pub struct ShadowConsole {
    buffer: OwnedHandle,
    size: SurfaceSize,
}

impl ShadowConsole {
    pub fn create(size: SurfaceSize) -> Result<Self, RelayError> {
        let attrs = SECURITY_ATTRIBUTES {
            nLength: std::mem::size_of::<SECURITY_ATTRIBUTES>() as u32,
            lpSecurityDescriptor: std::ptr::null_mut(),
            bInheritHandle: BOOL::from(true),
        };

        let raw = unsafe {
            CreateConsoleScreenBuffer(
                (GENERIC_READ | GENERIC_WRITE).0,
                (FILE_SHARE_READ | FILE_SHARE_WRITE).0,
                Some(&attrs as *const SECURITY_ATTRIBUTES),
                CONSOLE_TEXTMODE_BUFFER,
                None,
            )
        }
        .map_err(|e| RelayError::SurfaceCreate(io::Error::other(e)))?;
        let buffer = unsafe { OwnedHandle::from_raw_handle(raw.0 as _) };

        let resize_error = |source: io::Error| RelayError::SurfaceResize {
            cols: size.cols,
            rows: size.rows,
            source,
        };
        let dims = COORD {
            X: to_coord(size.cols).map_err(resize_error)?,
            Y: to_coord(size.rows).map_err(resize_error)?,
        };
        unsafe { SetConsoleScreenBufferSize(handle(&buffer), dims) }
            .map_err(|e| resize_error(io::Error::other(e)))?;

        tracing::debug!(cols = size.cols, rows = size.rows, "shadow console created");
        Ok(Self { buffer, size })
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Processed output keeps CR and LF acting as cursor motion. Escape
    /// sequence handling is best effort; older consoles reject it.
    pub fn prepare_output_mode(&mut self) -> Result<(), RelayError> {
        let mode_error = |e: windows::core::Error| RelayError::OutputModeSwitch {
            stream: "shadow console",
            source: io::Error::other(e),
        };
        let h = handle(&self.buffer);

        let mut mode = CONSOLE_MODE::default();
        unsafe { GetConsoleMode(h, &mut mode) }.map_err(mode_error)?;
        let mode = mode | ENABLE_PROCESSED_OUTPUT | ENABLE_WRAP_AT_EOL_OUTPUT;
        unsafe { SetConsoleMode(h, mode) }.map_err(mode_error)?;

        if let Err(e) = unsafe { SetConsoleMode(h, mode | ENABLE_VIRTUAL_TERMINAL_PROCESSING) } {
            tracing::warn!(error = %e, "virtual terminal processing unavailable on shadow console");
        }
        Ok(())
    }

    /// Makes the buffer the process-wide stdout until the guard is dropped.
    pub fn install_as_stdout(&self) -> Result<StdoutRedirect, RelayError> {
        StdoutRedirect::install(handle(&self.buffer))
    }

    /// The child inherits the buffer itself; our handle stays open for reads.
    pub fn release_child_end(&mut self) {}
}

impl ShadowSurface for ShadowConsole {
    fn geometry(&mut self) -> io::Result<SurfaceGeometry> {
        let mut info = CONSOLE_SCREEN_BUFFER_INFO::default();
        unsafe { GetConsoleScreenBufferInfo(handle(&self.buffer), &mut info) }
            .map_err(io::Error::other)?;

        Ok(SurfaceGeometry {
            cursor: CursorPosition {
                row: i32::from(info.dwCursorPosition.Y),
                col: i32::from(info.dwCursorPosition.X),
            },
            size: SurfaceSize::new(
                u16::try_from(info.dwSize.X).unwrap_or(0),
                u16::try_from(info.dwSize.Y).unwrap_or(0),
            ),
        })
    }

    fn read_row(&mut self, row: u16, width: u16) -> io::Result<Vec<u16>> {
        if width == 0 {
            return Ok(Vec::new());
        }
        let top = to_coord(row)?;
        let cols = to_coord(width)?;

        let mut cells = vec![CHAR_INFO::default(); usize::from(width)];
        let mut region = SMALL_RECT {
            Left: 0,
            Top: top,
            Right: cols - 1,
            Bottom: top,
        };
        unsafe {
            ReadConsoleOutputW(
                handle(&self.buffer),
                cells.as_mut_ptr(),
                COORD { X: cols, Y: 1 },
                COORD { X: 0, Y: 0 },
                &mut region,
            )
        }
        .map_err(io::Error::other)?;

        // Wide glyphs occupy two cells; the trailing half repeats the glyph.
        let read = usize::try_from(region.Right - region.Left + 1).unwrap_or(0);
        Ok(cells
            .iter()
            .take(read)
            .filter(|cell| cell.Attributes & COMMON_LVB_TRAILING_BYTE.0 == 0)
            .map(|cell| unsafe { cell.Char.UnicodeChar })
            .collect())
    }
}

/// Scoped replacement of the process stdout handle.
pub struct StdoutRedirect {
    saved: HANDLE,
    _lock: MutexGuard<'static, ()>,
}

impl StdoutRedirect {
    fn install(target: HANDLE) -> Result<Self, RelayError> {
        let lock = redirect::lock();

        let saved = unsafe { GetStdHandle(STD_OUTPUT_HANDLE) }
            .map_err(|e| RelayError::SurfaceInstall(io::Error::other(e)))?;
        unsafe { SetStdHandle(STD_OUTPUT_HANDLE, target) }
            .map_err(|e| RelayError::SurfaceInstall(io::Error::other(e)))?;

        tracing::trace!("stdout redirected to shadow console");
        Ok(Self { saved, _lock: lock })
    }
}

impl Drop for StdoutRedirect {
    fn drop(&mut self) {
        match unsafe { SetStdHandle(STD_OUTPUT_HANDLE, self.saved) } {
            Ok(()) => tracing::trace!("stdout restored"),
            Err(e) => tracing::error!(error = %e, "failed to restore original stdout"),
        }
    }
}

fn handle(owned: &OwnedHandle) -> HANDLE {
    HANDLE(owned.as_raw_handle() as *mut c_void)
}

fn to_coord(value: u16) -> io::Result<i16> {
    i16::try_from(value).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{value} exceeds the console coordinate range"),
        )
    })
}
