use std::io::Write;

use linecast_core::{
    CommandLine, RelayConfig, RelayError, RelayReport, ReplaySink, SpawnedChild, relay,
};

use crate::prepare;
use crate::ShadowConsole;

/// Starts `command` with the shadow console as its standard output.
///
/// The process-wide stdout points at the console only while the child is
/// being created; it is restored before this returns, whether or not the
/// spawn succeeded. Stdin and stderr are inherited unchanged.
pub fn launch(
    command: &CommandLine,
    console: &mut ShadowConsole,
) -> Result<SpawnedChild, RelayError> {
    let spawned = {
        let _redirect = console.install_as_stdout()?;
        command.to_command().spawn()
    };
    console.release_child_end();

    let child = spawned.map_err(|source| RelayError::Launch {
        command: command.to_string(),
        source,
    })?;
    tracing::info!(pid = child.id(), %command, "child launched");
    Ok(SpawnedChild::new(child))
}

/// Runs `command` to completion, replaying its progress line into `sink`.
pub fn relay_command<W: Write>(
    command: &CommandLine,
    config: &RelayConfig,
    sink: &mut ReplaySink<W>,
) -> Result<RelayReport, RelayError> {
    prepare::flush_real_streams()?;

    let mut console = ShadowConsole::create(config.surface_size)?;
    console.prepare_output_mode()?;

    let mut child = launch(command, &mut console)?;
    let report = relay::run(config, &mut console, &mut child, sink)?;

    tracing::info!(
        exit_code = report.exit_code,
        frames = report.frames_emitted,
        samples = report.samples,
        polls = report.polls,
        "relay finished"
    );
    Ok(report)
}
