//! The supervision loop.
//!
//! `Polling` → `ChildExited` → `FinalFlush` → `Done`. While the child runs,
//! the cursor row is sampled and accepted frames are replayed as lines. Once
//! it exits, one more sample is taken: the cursor row when the cursor was
//! left mid-line, otherwise the final-row offset, because most progress
//! writers move the cursor down a row when they finish. Then the child's
//! exit code is returned.

use std::io::Write;
use std::thread;
use std::time::Duration;

use crate::child::ChildProcess;
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::filter::ChangeFilter;
use crate::frame::Frame;
use crate::sampler::{self, CURSOR_ROW};
use crate::sink::ReplaySink;
use crate::surface::ShadowSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Polling,
    ChildExited,
    FinalFlush,
    Done,
}

/// What happened during one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelayReport {
    /// The child's own exit code.
    pub exit_code: i32,
    /// Lines written to the sink.
    pub frames_emitted: u64,
    /// Rows read from the shadow surface, including the final flush.
    pub samples: u64,
    /// Liveness checks that found the child running.
    pub polls: u64,
}

/// Runs the loop to completion and returns the child's exit code in the
/// report. Only a failed liveness or exit-code query is fatal.
pub fn run<S, C, W>(
    config: &RelayConfig,
    surface: &mut S,
    child: &mut C,
    sink: &mut ReplaySink<W>,
) -> Result<RelayReport, RelayError>
where
    S: ShadowSurface + ?Sized,
    C: ChildProcess + ?Sized,
    W: Write,
{
    let mut relay = Relay::new(sink);
    let mut state = RelayState::Polling;

    loop {
        state = match state {
            RelayState::Polling => {
                if !child.is_alive().map_err(RelayError::LivenessQuery)? {
                    RelayState::ChildExited
                } else {
                    relay.report.polls += 1;
                    let frame = relay.sample(surface, CURSOR_ROW);
                    if relay.offer(&frame) {
                        pause(config.poll_interval);
                    } else {
                        pause(config.idle_interval);
                    }
                    RelayState::Polling
                }
            }
            RelayState::ChildExited => {
                tracing::debug!(polls = relay.report.polls, "child exited");
                RelayState::FinalFlush
            }
            RelayState::FinalFlush => {
                relay.final_flush(config, surface);
                RelayState::Done
            }
            RelayState::Done => {
                let exit_code = child.exit_code().map_err(RelayError::ExitQuery)?;
                relay.report.exit_code = exit_code;
                relay.report.frames_emitted = relay.sink.emitted();
                return Ok(relay.report);
            }
        };
    }
}

struct Relay<'a, W: Write> {
    sink: &'a mut ReplaySink<W>,
    filter: ChangeFilter,
    report: RelayReport,
    sink_failed: bool,
}

impl<'a, W: Write> Relay<'a, W> {
    fn new(sink: &'a mut ReplaySink<W>) -> Self {
        Self {
            sink,
            filter: ChangeFilter::new(),
            report: RelayReport::default(),
            sink_failed: false,
        }
    }

    fn sample<S: ShadowSurface + ?Sized>(&mut self, surface: &mut S, row_offset: i32) -> Frame {
        self.report.samples += 1;
        sampler::sample(surface, row_offset)
    }

    /// Emits `frame` if the change filter takes it. Returns whether it did.
    fn offer(&mut self, frame: &Frame) -> bool {
        if !self.filter.accept(frame) {
            return false;
        }

        tracing::debug!(frame = %frame, "emit");
        if let Err(e) = self.sink.emit(frame) {
            // The child keeps running regardless; its exit code still matters.
            if self.sink_failed {
                tracing::debug!(error = %e, "write to standard output failed");
            } else {
                tracing::warn!(error = %e, "write to standard output failed; further failures logged at debug");
                self.sink_failed = true;
            }
        }
        true
    }

    fn final_flush<S: ShadowSurface + ?Sized>(&mut self, config: &RelayConfig, surface: &mut S) {
        let final_row = config.final_row;
        self.report.samples += 1;
        let mut frame = sampler::sample_final(surface, final_row.offset);
        if frame.is_empty() && final_row.fallback_to_cursor && final_row.offset != CURSOR_ROW {
            tracing::trace!(offset = final_row.offset, "final row blank, reading cursor row");
            frame = self.sample(surface, CURSOR_ROW);
        }
        self.offer(&frame);
    }
}

fn pause(interval: Duration) {
    if !interval.is_zero() {
        thread::sleep(interval);
    }
}
