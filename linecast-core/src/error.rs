use std::io;

use thiserror::Error;

/// Everything that can stop a relay run before the child's own exit code is
/// known. Each kind maps to its own reserved process exit code so callers can
/// tell "the child exited with X" apart from "linecast itself failed".
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("no command to execute was provided")]
    MissingCommand,

    #[error("couldn't prepare {stream} for wide-character output: {source}")]
    OutputModeSwitch {
        stream: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("couldn't create a shadow console buffer: {0}")]
    SurfaceCreate(#[source] io::Error),

    #[error("couldn't resize the shadow console buffer to {cols}x{rows}: {source}")]
    SurfaceResize {
        cols: u16,
        rows: u16,
        #[source]
        source: io::Error,
    },

    #[error("couldn't install the shadow console buffer as standard output: {0}")]
    SurfaceInstall(#[source] io::Error),

    #[error("couldn't create a child process for `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("couldn't query whether the child process is still running: {0}")]
    LivenessQuery(#[source] io::Error),

    #[error("couldn't get the child process exit code: {0}")]
    ExitQuery(#[source] io::Error),
}

impl RelayError {
    /// Reserved exit code for this failure kind.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            RelayError::MissingCommand => -1,
            RelayError::OutputModeSwitch { .. } => -2,
            RelayError::SurfaceCreate(_) => -3,
            RelayError::SurfaceResize { .. } => -4,
            RelayError::SurfaceInstall(_) => -5,
            RelayError::Launch { .. } => -6,
            RelayError::LivenessQuery(_) => -7,
            RelayError::ExitQuery(_) => -8,
        }
    }
}
