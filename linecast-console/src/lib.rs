//! # Linecast Console
//!
//! The platform half of linecast: a private console that a child inherits as
//! its standard output, the scoped swap of the process-wide stdout needed to
//! hand it over, and the launcher that ties both to the relay loop.
//!
//! - Windows: a real console screen buffer, read back with `ReadConsoleOutputW`.
//! - Unix: a pipe drained into an in-memory [`LineGrid`].

pub mod grid;
pub mod launcher;
pub mod prepare;
mod redirect;

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod win32;

pub use grid::LineGrid;
pub use launcher::{launch, relay_command};

#[cfg(unix)]
pub use crate::unix::{ShadowConsole, StdoutRedirect};
#[cfg(windows)]
pub use crate::win32::{ShadowConsole, StdoutRedirect};
