use std::ffi::OsString;
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};
use linecast_core::config::{DEFAULT_FINAL_ROW_OFFSET, DEFAULT_IDLE_INTERVAL, DEFAULT_POLL_INTERVAL};
use linecast_core::{FinalRow, LineEnding, OutputEncoding, OutputFormat, RelayConfig, SurfaceSize};
use tracing::Level;

#[derive(Debug, Parser)]
#[command(
    name = "linecast",
    about = "Runs a command and replays its in-place progress line as plain output lines",
    version
)]
pub struct Cli {
    /// Milliseconds to wait after a line was emitted.
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    pub poll_interval: u64,

    /// Milliseconds to wait after a sample that emitted nothing.
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_IDLE_INTERVAL.as_millis() as u64)]
    pub idle_interval: u64,

    /// Row read after the child exits, relative to the cursor row.
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_FINAL_ROW_OFFSET,
        allow_negative_numbers = true
    )]
    pub final_row_offset: i32,

    /// Don't fall back to the cursor row when the final row is blank.
    #[arg(long)]
    pub no_final_fallback: bool,

    /// Shadow console width.
    #[arg(long, value_name = "N", default_value_t = SurfaceSize::default().cols,
          value_parser = clap::value_parser!(u16).range(1..))]
    pub columns: u16,

    /// Shadow console height.
    #[arg(long, value_name = "N", default_value_t = SurfaceSize::default().rows,
          value_parser = clap::value_parser!(u16).range(1..))]
    pub rows: u16,

    /// Output text encoding [default: utf16le on Windows, utf8 elsewhere].
    #[arg(long, value_enum)]
    pub encoding: Option<EncodingArg>,

    /// Output line terminator [default: crlf on Windows, lf elsewhere].
    #[arg(long, value_enum)]
    pub line_ending: Option<LineEndingArg>,

    /// More diagnostics on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only errors on stderr.
    #[arg(short, long)]
    pub quiet: bool,

    /// The command to run, followed by its arguments.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        num_args = 0..
    )]
    pub command: Vec<OsString>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EncodingArg {
    Utf8,
    Utf16le,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LineEndingArg {
    Lf,
    Crlf,
}

impl From<EncodingArg> for OutputEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Utf8 => OutputEncoding::Utf8,
            EncodingArg::Utf16le => OutputEncoding::Utf16Le,
        }
    }
}

impl From<LineEndingArg> for LineEnding {
    fn from(arg: LineEndingArg) -> Self {
        match arg {
            LineEndingArg::Lf => LineEnding::Lf,
            LineEndingArg::Crlf => LineEnding::CrLf,
        }
    }
}

impl Cli {
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig::default()
            .with_poll_interval(Duration::from_millis(self.poll_interval))
            .with_idle_interval(Duration::from_millis(self.idle_interval))
            .with_final_row(FinalRow {
                offset: self.final_row_offset,
                fallback_to_cursor: !self.no_final_fallback,
            })
            .with_surface_size(SurfaceSize::new(self.columns, self.rows))
    }

    /// An interactive terminal always gets UTF-8; it does its own conversion.
    pub fn output_format(&self, stdout_is_terminal: bool) -> OutputFormat {
        let native = OutputFormat::native();
        let encoding = if stdout_is_terminal {
            OutputEncoding::Utf8
        } else {
            self.encoding.map_or(native.encoding, Into::into)
        };
        OutputFormat {
            encoding,
            line_ending: self.line_ending.map_or(native.line_ending, Into::into),
        }
    }

    pub fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
