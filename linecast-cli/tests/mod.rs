use std::ffi::OsString;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use linecast_cli::cli::{Cli, EncodingArg, LineEndingArg};
use linecast_cli::logging;
use linecast_core::{
    FinalRow, LineEnding, OutputEncoding, OutputFormat, RelayConfig, RelayError, SurfaceSize,
};
use tracing::Level;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("linecast").chain(args.iter().copied()))
        .expect("arguments should parse")
}

fn command(cli: &Cli) -> Vec<String> {
    cli.command
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

// ============================================================================
// Command capture
// ============================================================================

#[test]
fn test_child_arguments_pass_through() {
    let cli = parse(&["adb", "push", "-p", "file.apk", "/sdcard/"]);
    assert_eq!(command(&cli), ["adb", "push", "-p", "file.apk", "/sdcard/"]);
}

#[test]
fn test_options_after_command_belong_to_child() {
    let cli = parse(&["-v", "tool", "--verbose", "-q", "--rows", "3"]);
    assert_eq!(cli.verbose, 1);
    assert!(!cli.quiet);
    assert_eq!(cli.rows, SurfaceSize::default().rows);
    assert_eq!(command(&cli), ["tool", "--verbose", "-q", "--rows", "3"]);
}

#[test]
fn test_empty_command_is_missing_command() {
    let cli = parse(&[]);
    assert!(cli.command.is_empty());

    let err = linecast_cli::run(&cli).expect_err("nothing to run");
    assert!(matches!(err, RelayError::MissingCommand));
    assert_eq!(err.exit_code(), -1);
}

#[test]
fn test_command_tokens_are_os_strings() {
    let cli = Cli::try_parse_from([OsString::from("linecast"), OsString::from("echo")])
        .expect("parse");
    assert_eq!(cli.command, [OsString::from("echo")]);
}

// ============================================================================
// Relay configuration
// ============================================================================

#[test]
fn test_defaults_match_relay_config() {
    let cli = parse(&["tool"]);
    assert_eq!(cli.relay_config(), RelayConfig::default());
}

#[test]
fn test_timing_and_final_row_options() {
    let cli = parse(&[
        "--poll-interval",
        "250",
        "--idle-interval",
        "0",
        "--final-row-offset",
        "-2",
        "--no-final-fallback",
        "--columns",
        "200",
        "--rows",
        "50",
        "tool",
    ]);
    let config = cli.relay_config();
    assert_eq!(config.poll_interval, Duration::from_millis(250));
    assert_eq!(config.idle_interval, Duration::ZERO);
    assert_eq!(
        config.final_row,
        FinalRow {
            offset: -2,
            fallback_to_cursor: false
        }
    );
    assert_eq!(config.surface_size, SurfaceSize::new(200, 50));
}

#[test]
fn test_zero_columns_rejected() {
    assert!(Cli::try_parse_from(["linecast", "--columns", "0", "tool"]).is_err());
}

// ============================================================================
// Output format
// ============================================================================

#[test]
fn test_output_format_defaults_to_native() {
    let cli = parse(&["tool"]);
    assert_eq!(cli.output_format(false), OutputFormat::native());
}

#[test]
fn test_explicit_output_format() {
    let cli = parse(&["--encoding", "utf16le", "--line-ending", "lf", "tool"]);
    assert_eq!(cli.encoding, Some(EncodingArg::Utf16le));
    assert_eq!(cli.line_ending, Some(LineEndingArg::Lf));
    assert_eq!(
        cli.output_format(false),
        OutputFormat {
            encoding: OutputEncoding::Utf16Le,
            line_ending: LineEnding::Lf,
        }
    );
}

#[test]
fn test_terminal_forces_utf8() {
    let cli = parse(&["--encoding", "utf16le", "--line-ending", "crlf", "tool"]);
    let format = cli.output_format(true);
    assert_eq!(format.encoding, OutputEncoding::Utf8);
    assert_eq!(format.line_ending, LineEnding::CrLf);
}

// ============================================================================
// Log level
// ============================================================================

#[test]
fn test_log_level_from_flags() {
    assert_eq!(parse(&["tool"]).log_level(), Level::WARN);
    assert_eq!(parse(&["-v", "tool"]).log_level(), Level::INFO);
    assert_eq!(parse(&["-vv", "tool"]).log_level(), Level::DEBUG);
    assert_eq!(parse(&["-vvvv", "tool"]).log_level(), Level::TRACE);
    assert_eq!(parse(&["-q", "tool"]).log_level(), Level::ERROR);
}

#[test]
fn test_verbose_conflicts_with_quiet() {
    assert!(Cli::try_parse_from(["linecast", "-v", "-q", "tool"]).is_err());
}

// ============================================================================
// Logging setup
// ============================================================================

#[test]
fn test_failed_logger_keeps_existing_panic_hook() {
    static HOOK_RAN: AtomicBool = AtomicBool::new(false);

    // Occupy the global subscriber slot so setup cannot succeed.
    let _ = tracing_subscriber::fmt().with_writer(std::io::sink).try_init();
    std::panic::set_hook(Box::new(|_| HOOK_RAN.store(true, Ordering::SeqCst)));

    assert!(logging::init(Level::WARN).is_err());
    let _ = std::panic::catch_unwind(|| panic!("after failed logger setup"));
    let _ = std::panic::take_hook();

    assert!(HOOK_RAN.load(Ordering::SeqCst));
}
