//! Integration tests for the plain-text file sink.

use std::sync::Arc;

use jiff::Zoned;
use tintlog::{Level, Logger, ManualClock, MemorySink, strip_ansi};

fn logger(console: &MemorySink) -> Logger {
    let start: Zoned = "2026-03-09T14:05:07[UTC]".parse().unwrap();
    Logger::new()
        .with_sink(console.clone())
        .with_clock(Arc::new(ManualClock::new(start)))
        .with_color(true)
        .with_exit_hook(|_| {})
}

#[test]
fn file_matches_console_without_styles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let console = MemorySink::new();
    let mut log = logger(&console);
    log.set_format("[%level%] %date% %time% ");
    log.set_file(&path);

    log.info(&[&"user", &42, &"signed in"]);
    log.warn(&[&"quota at", &0.9]);

    let console_text = console.contents();
    assert!(console_text.contains('\x1b'));

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, strip_ansi(&console_text));
    assert_eq!(
        written,
        "[INFO ] 2026-03-09 14:05:07 user 42 signed in\n[WARN ] 2026-03-09 14:05:07 quota at 0.9\n"
    );
}

#[test]
fn suppressed_messages_reach_neither_sink() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let console = MemorySink::new();
    let mut log = logger(&console);
    log.set_level(Level::Error);
    log.set_file(&path);

    log.debug(&[&"quiet"]);
    log.info(&[&"quiet"]);

    assert!(console.is_empty());
    assert!(!path.exists(), "file should only open on first emitted message");
}

#[test]
fn set_file_switches_target() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.log");
    let second = dir.path().join("second.log");
    let console = MemorySink::new();
    let mut log = logger(&console);
    log.set_format("");

    log.set_file(&first);
    log.info(&[&"one"]);
    log.set_file("");
    log.info(&[&"two"]);
    log.set_file(&second);
    log.info(&[&"three"]);

    assert_eq!(std::fs::read_to_string(&first).unwrap(), "one\ntwo\n");
    assert_eq!(std::fs::read_to_string(&second).unwrap(), "three\n");
}

#[test]
fn error_stack_is_written_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let console = MemorySink::new();
    let mut log = logger(&console);
    log.set_format("%level% ");
    log.set_file(&path);

    log.error(&[&"failed"]);

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("ERROR failed\n    ("));
    assert!(written.contains("error_stack_is_written_to_file"));
}
