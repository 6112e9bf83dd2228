//! Integration tests for caller resolution and stack dumps against the real
//! native stack.

use tintlog::{DEFAULT_MAX_FRAMES, FrameFilter, Level, Logger, MemorySink, strip_ansi};

fn logger(console: &MemorySink) -> Logger {
    Logger::new()
        .with_sink(console.clone())
        .with_color(false)
        .with_exit_hook(|_| {})
}

/// `(dir/file:line) ` for a line of this file.
fn site(line: u32) -> String {
    let path = std::path::Path::new(file!());
    let file = path.file_name().unwrap().to_string_lossy();
    let dir = path.parent().unwrap().file_name().unwrap().to_string_lossy();
    format!("({dir}/{file}:{line})")
}

#[inline(never)]
fn log_through_helper(logger: &mut Logger) {
    logger.info(&[&"wrapped"]);
}

#[test]
fn info_reports_call_site() {
    let console = MemorySink::new();
    let mut log = logger(&console);
    log.set_format("[%level%] (%file%) ");

    log.info(&[&"ready"]);
    let line = line!() - 1;

    assert_eq!(console.contents(), format!("[INFO ] {} ready\n", site(line)));
}

#[test]
fn call_depth_skips_wrapping_helpers() {
    let console = MemorySink::new();
    let mut log = logger(&console);
    log.set_format("(%file%) ");
    log.set_call_depth(1);

    log_through_helper(&mut log);
    let line = line!() - 1;

    assert_eq!(console.contents(), format!("{} wrapped\n", site(line)));
}

#[test]
fn error_dumps_caller_chain() {
    let console = MemorySink::new();
    let mut log = logger(&console);
    log.set_format("%level% ");

    log.error(&[&"boom"]);
    let line = line!() - 1;

    let out = strip_ansi(&console.contents()).into_owned();
    let mut lines = out.lines();
    assert_eq!(lines.next(), Some("ERROR boom"));

    let stack: Vec<&str> = lines.collect();
    assert!(!stack.is_empty(), "stack dump missing: {out}");
    assert!(stack.len() <= DEFAULT_MAX_FRAMES, "too many frames: {out}");
    assert!(
        stack[0].starts_with(&format!("    {} ", site(line))),
        "innermost frame should be the caller: {out}"
    );
    assert!(stack[0].ends_with("error_dumps_caller_chain"));
    let runtime = FrameFilter::default();
    for frame in &stack {
        let function = frame.split_once(") ").map_or("", |(_, f)| f);
        assert!(!runtime.is_internal(function), "runtime frame kept: {frame}");
        assert!(!function.contains("core::ops::function"), "closure shim kept: {frame}");
    }
}

#[test]
fn fatal_dumps_stack_and_exits_through_hook() {
    let console = MemorySink::new();
    let status = std::sync::Arc::new(std::sync::Mutex::new(None));
    let seen = status.clone();
    let mut log = logger(&console).with_exit_hook(move |code| {
        *seen.lock().unwrap() = Some(code);
    });
    log.set_level(Level::Fatal);
    log.set_format("%level% ");

    log.fatal(&[&"cannot continue"]);

    assert_eq!(*status.lock().unwrap(), Some(tintlog::FATAL_EXIT_CODE));
    let out = console.contents();
    assert!(out.starts_with("FATAL cannot continue\n    ("));
    assert!(out.contains("fatal_dumps_stack_and_exits_through_hook"));
}

#[test]
fn threshold_skips_introspection() {
    let console = MemorySink::new();
    let mut log = logger(&console);
    log.set_level(Level::Error);

    log.warn(&[&"dropped"]);
    log.info(&[&"dropped"]);

    assert!(console.is_empty());
}
