//! # Linecast
//!
//! `linecast [OPTIONS] <COMMAND>...` runs a command under a shadow console and
//! turns each distinct state of its progress line into one plain stdout line.
//! The process exits with the command's own exit code, or with a negative
//! sentinel when linecast itself fails.

pub mod cli;
pub mod logging;

use std::io::{self, IsTerminal};

use linecast_core::{CommandLine, RelayError, RelayReport, ReplaySink};

use crate::cli::Cli;

pub fn run(cli: &Cli) -> Result<RelayReport, RelayError> {
    let command = CommandLine::from_args(cli.command.iter().cloned())?;
    let config = cli.relay_config();

    let stdout = io::stdout();
    let format = cli.output_format(stdout.is_terminal());
    tracing::debug!(
        encoding = ?format.encoding,
        line_ending = ?format.line_ending,
        ?config,
        "relay configured"
    );

    let mut sink = ReplaySink::new(stdout.lock(), format);
    linecast_console::relay_command(&command, &config, &mut sink)
}
