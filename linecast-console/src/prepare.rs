use std::io::{self, Write};

use linecast_core::RelayError;

/// Pushes out anything still buffered on the real stdout and stderr before
/// the process-wide stdout is pointed at a shadow console.
pub fn flush_real_streams() -> Result<(), RelayError> {
    io::stdout()
        .flush()
        .map_err(|source| RelayError::OutputModeSwitch {
            stream: "standard output",
            source,
        })?;
    io::stderr()
        .flush()
        .map_err(|source| RelayError::OutputModeSwitch {
            stream: "standard error",
            source,
        })
}
