//! Portable shadow console: the child writes into a pipe, we drain the pipe
//! into a [`LineGrid`] and read rows back from the grid.

use std::fs::File;
use std::io::{self, Read};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::sync::MutexGuard;

use linecast_core::{RelayError, ShadowSurface, SurfaceGeometry, SurfaceSize};
use nix::fcntl::{FcntlArg, FdFlag, OFlag, fcntl};
use nix::libc::STDOUT_FILENO;
use nix::unistd::dup2;

use crate::grid::LineGrid;
use crate::redirect;

const READ_CHUNK: usize = 4096;

// Upper bound on reads per sample so a chatty child cannot stall polling.
const MAX_READS_PER_DRAIN: usize = 64;

pub struct ShadowConsole {
    grid: LineGrid,
    reader: File,
    // Handed to the child as its stdout; dropped once the child owns a copy.
    writer: Option<OwnedFd>,
}

impl ShadowConsole {
    pub fn create(size: SurfaceSize) -> Result<Self, RelayError> {
        let (read, write) =
            nix::unistd::pipe().map_err(|e| RelayError::SurfaceCreate(e.into()))?;
        set_nonblocking(read.as_raw_fd()).map_err(RelayError::SurfaceCreate)?;
        // Neither end may leak into the child under its own number; fd 1 is
        // a dup2 copy, which never carries the flag.
        set_cloexec(read.as_raw_fd()).map_err(RelayError::SurfaceCreate)?;
        set_cloexec(write.as_raw_fd()).map_err(RelayError::SurfaceCreate)?;

        if size.cols == 0 || size.rows == 0 {
            return Err(RelayError::SurfaceResize {
                cols: size.cols,
                rows: size.rows,
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "shadow console needs at least one row and one column",
                ),
            });
        }

        tracing::debug!(cols = size.cols, rows = size.rows, "shadow console created");
        Ok(Self {
            grid: LineGrid::new(size),
            reader: File::from(read),
            writer: Some(write),
        })
    }

    pub fn size(&self) -> SurfaceSize {
        self.grid.size()
    }

    pub fn grid(&self) -> &LineGrid {
        &self.grid
    }

    /// Nothing to switch: the pipe carries raw bytes.
    pub fn prepare_output_mode(&mut self) -> Result<(), RelayError> {
        Ok(())
    }

    /// Points fd 1 at the pipe until the returned guard is dropped.
    pub fn install_as_stdout(&self) -> Result<StdoutRedirect, RelayError> {
        let writer = self.writer.as_ref().ok_or_else(|| {
            RelayError::SurfaceInstall(io::Error::other(
                "shadow console write end was already released",
            ))
        })?;
        StdoutRedirect::install(writer.as_raw_fd())
    }

    /// Closes our copy of the write end so the pipe reports EOF once the child
    /// (and anything it spawned) is gone.
    pub fn release_child_end(&mut self) {
        self.writer = None;
    }

    fn drain(&mut self) -> io::Result<()> {
        let mut buf = [0u8; READ_CHUNK];
        for _ in 0..MAX_READS_PER_DRAIN {
            match self.reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => self.grid.feed(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

impl ShadowSurface for ShadowConsole {
    fn geometry(&mut self) -> io::Result<SurfaceGeometry> {
        self.drain()?;
        Ok(self.grid.geometry())
    }

    fn read_row(&mut self, row: u16, width: u16) -> io::Result<Vec<u16>> {
        Ok(self.grid.row_cells(row, width))
    }
}

/// Scoped replacement of fd 1. Dropping it puts the original stdout back.
pub struct StdoutRedirect {
    saved: OwnedFd,
    _lock: MutexGuard<'static, ()>,
}

impl StdoutRedirect {
    fn install(target: RawFd) -> Result<Self, RelayError> {
        let lock = redirect::lock();

        let saved = fcntl(STDOUT_FILENO, FcntlArg::F_DUPFD_CLOEXEC(0))
            .map_err(|e| RelayError::SurfaceInstall(e.into()))?;
        // SAFETY: `saved` is a fresh descriptor that nothing else owns.
        let saved = unsafe { OwnedFd::from_raw_fd(saved) };

        dup2(target, STDOUT_FILENO).map_err(|e| RelayError::SurfaceInstall(e.into()))?;

        tracing::trace!("stdout redirected to shadow console");
        Ok(Self { saved, _lock: lock })
    }
}

impl Drop for StdoutRedirect {
    fn drop(&mut self) {
        match dup2(self.saved.as_raw_fd(), STDOUT_FILENO) {
            Ok(_) => tracing::trace!("stdout restored"),
            Err(e) => tracing::error!(error = %e, "failed to restore original stdout"),
        }
    }
}

fn set_nonblocking(raw_fd: RawFd) -> io::Result<()> {
    let flags = OFlag::from_bits_truncate(fcntl(raw_fd, FcntlArg::F_GETFL)?);
    fcntl(raw_fd, FcntlArg::F_SETFL(flags | OFlag::O_NONBLOCK))?;
    Ok(())
}

fn set_cloexec(raw_fd: RawFd) -> io::Result<()> {
    let flags = FdFlag::from_bits_truncate(fcntl(raw_fd, FcntlArg::F_GETFD)?);
    fcntl(raw_fd, FcntlArg::F_SETFD(flags | FdFlag::FD_CLOEXEC))?;
    Ok(())
}
