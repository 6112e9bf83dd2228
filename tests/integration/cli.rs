//! Integration tests for the `tintlog` binary.

use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn tintlog() -> Command {
    let mut cmd = Command::cargo_bin("tintlog").unwrap();
    cmd.env("XDG_CONFIG_HOME", "/tmp/tintlog-test-no-config");
    cmd.env_remove("FORCE_COLOR");
    cmd
}

#[test]
fn message_words_use_default_template() {
    tintlog()
        .args(["--color=never", "info", "hello", "world"])
        .assert()
        .success()
        .stdout("")
        .stderr(
            predicate::str::is_match(
                r"^\[INFO \] \d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2} \(src/main\.rs:\d+\) hello world\n$",
            )
            .unwrap(),
        );
}

#[test]
fn stdin_lines_are_logged_one_by_one() {
    let output = tintlog()
        .args(["--color=never", "--format", "%level% ", "warn"])
        .write_stdin("disk low\nfan loud\n")
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success());
    assert_eq!(stderr, "WARN  disk low\nWARN  fan loud\n");
}

#[test]
fn threshold_drops_lower_levels() {
    tintlog()
        .args(["--color=never", "--threshold", "warn", "info", "hidden"])
        .assert()
        .success()
        .stderr("");
}

#[test]
fn prefix_follows_template() {
    tintlog()
        .args(["--color=never", "-F", "%level% ", "-p", "[job]", "debug", "tick"])
        .assert()
        .success()
        .stderr("DEBUG [job] tick\n");
}

#[test]
fn file_option_appends_plain_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("run.log");

    let output = tintlog()
        .args(["--color=always", "--format", "[%level%] ", "--file"])
        .arg(&path)
        .args(["info", "stored"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("\x1b["), "console should be styled: {stderr:?}");

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, "[INFO ] stored\n");
}

#[test]
fn color_never_disables_ansi() {
    let output = tintlog()
        .args(["--color=never", "error", "plain"])
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("\x1b["));
}

#[test]
fn color_auto_without_tty_is_plain() {
    let output = tintlog().args(["info", "piped"]).output().unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("\x1b["));
}

#[test]
fn force_color_overrides_non_tty() {
    let output = tintlog()
        .env("FORCE_COLOR", "1")
        .args(["info", "forced"])
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("\x1b["));
}

#[test]
fn error_level_prints_stack() {
    let output = tintlog()
        .args(["--color=never", "--format", "%level% ", "error", "broken"])
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success());
    let mut lines = stderr.lines();
    assert_eq!(lines.next(), Some("ERROR broken"));
    let first_frame = lines.next().unwrap_or_default();
    assert!(
        first_frame.starts_with("    (src/main.rs:"),
        "unexpected frame: {stderr}"
    );
}

#[test]
fn fatal_exits_with_status_one() {
    tintlog()
        .args(["--color=never", "--threshold", "fatal", "fatal", "disk", "gone"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("[FATAL]"))
        .stderr(predicate::str::contains("disk gone\n    (src/main.rs:"));
}

#[test]
fn invalid_level_is_rejected() {
    tintlog()
        .args(["loud", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid level 'loud'"));
}

#[test]
fn config_file_supplies_settings() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        "color = \"never\"\nlevel = \"info\"\nprefix = \"[cfg]\"\n\n[formats]\ninfo = \"I \"\n",
    )
    .unwrap();

    let output = tintlog()
        .arg("--config")
        .arg(&config)
        .arg("info")
        .write_stdin("kept\n")
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success());
    assert_eq!(stderr, "I [cfg] kept\n");
}

#[test]
fn malformed_config_exits_with_status_one() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "level = [").unwrap();

    tintlog()
        .arg("--config")
        .arg(&config)
        .args(["info", "hi"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("tintlog: "));
}

#[test]
fn session_reports_elapsed_block() {
    let output = tintlog()
        .args(["--color=never", "--format", "%level% ", "--session", "debug"])
        .write_stdin("start\nmiddle\nend\n")
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success());
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.len(), 4, "unexpected block: {stderr:?}");
    assert_eq!(lines[0], "DEBUG ");
    assert!(lines[1].starts_with('\t') && lines[1].ends_with(" > start"));
    assert!(lines[2].ends_with(" > middle"));
    assert!(lines[3].ends_with(" > end"));
}

#[test]
fn empty_session_writes_nothing() {
    tintlog()
        .args(["--color=never", "--session", "debug"])
        .write_stdin("")
        .assert()
        .success()
        .stderr("");
}
