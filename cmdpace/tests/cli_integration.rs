// cmdpace/tests/cli_integration.rs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::NamedTempFile;

/// Helper to create a file of argument lines
fn create_input_file(lines: &[&str]) -> NamedTempFile {
    let file = NamedTempFile::new().expect("Failed to create temp file");
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(file.path(), content).expect("Failed to write to temp file");
    file
}

#[test]
fn test_help_shows_flags() {
    let mut cmd = Command::cargo_bin("cmdpace").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--rate"))
        .stdout(predicate::str::contains("--inflight"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("{}"));
}

#[test]
fn test_missing_command_is_rejected() {
    let mut cmd = Command::cargo_bin("cmdpace").unwrap();
    cmd.write_stdin("a\n");

    cmd.assert().failure().code(1);
}

#[test]
fn test_missing_placeholder_is_rejected() {
    let mut cmd = Command::cargo_bin("cmdpace").unwrap();
    cmd.args(["echo", "hello"]).write_stdin("a\n");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("{}"));
}

#[test]
fn test_zero_rate_is_rejected_before_launching() {
    let mut cmd = Command::cargo_bin("cmdpace").unwrap();
    cmd.args(["--rate", "0", "echo", "{}"]).write_stdin("a\n");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("rate must be > 0"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_zero_inflight_is_rejected_before_launching() {
    let mut cmd = Command::cargo_bin("cmdpace").unwrap();
    cmd.args(["--inflight", "0", "echo", "{}"]).write_stdin("a\n");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("inflight must be > 0"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_echo_end_to_end() {
    // Three lines, generous limits: each must appear on stdout exactly once
    let mut cmd = Command::cargo_bin("cmdpace").unwrap();
    cmd.args(["--rate", "100", "--inflight", "3", "echo", "{}"])
        .write_stdin("a\nb\nc\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("a").count(1))
        .stdout(predicate::str::contains("b").count(1))
        .stdout(predicate::str::contains("c").count(1));
}

#[test]
fn test_substitution_keeps_surrounding_tokens() {
    let mut cmd = Command::cargo_bin("cmdpace").unwrap();
    cmd.args(["--rate", "100", "echo", "pre", "{}", "post"])
        .write_stdin("x\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("pre x post"));
}

#[test]
fn test_line_with_spaces_expands_to_multiple_arguments() {
    // `echo` joins its arguments with single spaces, so the doubled space
    // in the input collapses, proof the line was split into two tokens
    let mut cmd = Command::cargo_bin("cmdpace").unwrap();
    cmd.args(["--rate", "100", "echo", "{}"])
        .write_stdin("hello  world\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("hello world"));
}

#[test]
fn test_input_file_redirection() {
    let input = create_input_file(&["one", "two"]);

    let mut cmd = Command::cargo_bin("cmdpace").unwrap();
    cmd.args(["--rate", "100", "--inflight", "2", "echo", "{}"])
        .pipe_stdin(input.path())
        .unwrap();

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("one"))
        .stdout(predicate::str::contains("two"));
}

#[test]
fn test_failing_command_exits_nonzero() {
    let mut cmd = Command::cargo_bin("cmdpace").unwrap();
    cmd.args(["--rate", "100", "false", "{}"]).write_stdin("a\n");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("false"));
}

#[test]
fn test_unknown_program_exits_nonzero() {
    let mut cmd = Command::cargo_bin("cmdpace").unwrap();
    cmd.args(["cmdpace-no-such-program-xyz", "{}"]).write_stdin("a\n");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cmdpace-no-such-program-xyz"));
}

#[test]
fn test_empty_input_succeeds_quietly() {
    let mut cmd = Command::cargo_bin("cmdpace").unwrap();
    cmd.args(["echo", "{}"]).write_stdin("");

    cmd.assert().success().stdout(predicate::str::is_empty());
}

#[test]
fn test_dry_run_executes_nothing() {
    // The program does not exist; dry-run must still succeed because no
    // command is ever spawned
    let mut cmd = Command::cargo_bin("cmdpace").unwrap();
    cmd.args(["--dry-run", "cmdpace-no-such-program-xyz", "-f", "{}"])
        .write_stdin("a\nb\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("cmdpace-no-such-program-xyz -f a"))
        .stdout(predicate::str::contains("cmdpace-no-such-program-xyz -f b"))
        .stderr(predicate::str::contains("2 commands would be launched"));
}

#[test]
fn test_dry_run_json_output() {
    let mut cmd = Command::cargo_bin("cmdpace").unwrap();
    cmd.args(["--dry-run", "--json", "touch", "{}.bak"])
        .write_stdin("data\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"touch\""))
        .stdout(predicate::str::contains("\"data.bak\""));
}

#[test]
fn test_json_without_dry_run_is_rejected() {
    let mut cmd = Command::cargo_bin("cmdpace").unwrap();
    cmd.args(["--json", "echo", "{}"]).write_stdin("a\n");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("--dry-run"));
}

#[test]
fn test_verbose_summary_on_stderr() {
    let mut cmd = Command::cargo_bin("cmdpace").unwrap();
    cmd.args(["--rate", "100", "--verbose", "echo", "{}"])
        .write_stdin("a\n");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("launched 1 commands"));
}

#[test]
fn test_environment_overrides_are_honored() {
    let mut cmd = Command::cargo_bin("cmdpace").unwrap();
    cmd.env("CMDPACE_RATE", "100")
        .env("CMDPACE_INFLIGHT", "3")
        .args(["--verbose", "echo", "{}"])
        .write_stdin("a\nb\nc\n");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("at 100/s, 3 in flight"));
}
