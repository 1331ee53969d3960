//! End-to-end relays through a real shadow console and real child processes.
//!
//! Every scenario temporarily replaces the process stdout, which the test
//! harness itself writes to when reporting results. They therefore run in
//! sequence from a single test.

use std::time::Duration;

use linecast_console::relay_command;
use linecast_core::{CommandLine, OutputFormat, RelayConfig, RelayReport, ReplaySink, SurfaceSize};

// ============================================================================
// Helpers
// ============================================================================

fn config() -> RelayConfig {
    RelayConfig::default()
        .with_poll_interval(Duration::from_millis(20))
        .with_idle_interval(Duration::from_millis(5))
        .with_surface_size(SurfaceSize::new(120, 40))
}

fn relay(tokens: &[&str]) -> (RelayReport, Vec<String>) {
    let command = CommandLine::from_args(tokens.iter().copied()).expect("command");
    let mut sink = ReplaySink::new(Vec::new(), OutputFormat::UTF8_LF);
    let report = relay_command(&command, &config(), &mut sink).expect("relay");
    let text = String::from_utf8(sink.into_inner()).expect("utf-8 output");
    (report, text.lines().map(str::to_owned).collect())
}

#[cfg(unix)]
fn shell(script: &str) -> (RelayReport, Vec<String>) {
    relay(&["sh", "-c", script])
}

#[cfg(windows)]
fn shell(script: &str) -> (RelayReport, Vec<String>) {
    relay(&["cmd", "/C", script])
}

#[cfg(target_os = "linux")]
fn stdout_identity() -> (u64, u64) {
    use std::os::unix::fs::MetadataExt;
    let meta = std::fs::metadata("/proc/self/fd/1").expect("stat stdout");
    (meta.dev(), meta.ino())
}

// ============================================================================
// Scenarios
// ============================================================================

fn exit_codes_pass_through() {
    for code in [0, 1, 3, 42] {
        let (report, _) = shell(&format!("exit {code}"));
        assert_eq!(report.exit_code, code, "exit {code}");
    }
}

#[cfg(unix)]
fn progress_rewrites_become_lines() {
    let (report, lines) = shell(
        "printf '10%%'; sleep 0.3; printf '\\r50%%'; sleep 0.3; printf '\\r100%%\\n'",
    );
    assert_eq!(report.exit_code, 0);
    assert_eq!(lines, ["10%", "50%", "100%"]);
    assert_eq!(report.frames_emitted, 3);
}

#[cfg(unix)]
fn final_line_without_newline_is_recovered() {
    let (report, lines) = shell("printf 'Building... 100%%'");
    assert_eq!(report.exit_code, 0);
    assert_eq!(lines, ["Building... 100%"]);
}

#[cfg(windows)]
fn final_line_without_newline_is_recovered() {
    let (report, lines) = shell("<nul set /p =Building... 100%");
    assert_eq!(report.exit_code, 0);
    assert_eq!(lines, ["Building... 100%"]);
}

#[cfg(unix)]
fn final_line_below_header_is_recovered() {
    let (report, lines) = shell("echo Header; printf 'Building... 100%%'");
    assert_eq!(report.exit_code, 0);
    assert_eq!(lines, ["Building... 100%"]);
}

#[cfg(windows)]
fn final_line_below_header_is_recovered() {
    let (report, lines) = shell("echo Header& <nul set /p =Building... 100%");
    assert_eq!(report.exit_code, 0);
    assert_eq!(lines, ["Building... 100%"]);
}

#[cfg(unix)]
fn silent_child_emits_nothing() {
    let (report, lines) = shell("exit 0");
    assert!(lines.is_empty());
    assert_eq!(report.frames_emitted, 0);
}

fn missing_program_is_launch_error() {
    #[cfg(target_os = "linux")]
    let before = stdout_identity();

    let command = CommandLine::from_args(["linecast-no-such-program-7f3a"]).expect("command");
    let mut sink = ReplaySink::new(Vec::new(), OutputFormat::UTF8_LF);
    let err = relay_command(&command, &config(), &mut sink).expect_err("spawn must fail");
    assert_eq!(err.exit_code(), -6);
    assert!(err.to_string().contains("linecast-no-such-program-7f3a"));

    #[cfg(target_os = "linux")]
    assert_eq!(stdout_identity(), before, "stdout must be restored after a failed launch");
}

#[cfg(target_os = "linux")]
fn stdout_restored_after_launch() {
    use linecast_console::{ShadowConsole, launch};
    use linecast_core::ChildProcess;

    let before = stdout_identity();
    let mut console = ShadowConsole::create(SurfaceSize::new(80, 25)).expect("console");
    let command = CommandLine::from_args(["sh", "-c", "exit 0"]).expect("command");
    let mut child = launch(&command, &mut console).expect("launch");
    assert_eq!(stdout_identity(), before);

    while child.is_alive().expect("liveness") {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(child.exit_code().expect("exit code"), 0);
}

#[cfg(unix)]
fn signal_death_reports_shell_convention() {
    let (report, _) = shell("kill -TERM $$");
    assert_eq!(report.exit_code, 128 + 15);
}

// ============================================================================
// Driver
// ============================================================================

#[test]
fn test_relay_real_children() {
    exit_codes_pass_through();
    final_line_without_newline_is_recovered();
    final_line_below_header_is_recovered();
    missing_program_is_launch_error();

    #[cfg(unix)]
    {
        progress_rewrites_become_lines();
        silent_child_emits_nothing();
        signal_death_reports_shell_convention();
    }

    #[cfg(target_os = "linux")]
    stdout_restored_after_launch();
}
