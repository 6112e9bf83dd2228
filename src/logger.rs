//! The logger: severity gate, dual-sink write path, and the fatal path.
//!
//! Each emitted message is rendered once. The styled text goes to the
//! interactive sink (stderr by default) and the plain text is appended to the
//! file sink, which is opened lazily on the first message that needs it.
//!
//! A `Logger` has no internal locking. Share one across threads through a
//! `Mutex`, as the process-wide default in [`crate::global`] does.

use std::fmt;
use std::fs::{DirBuilder, File, OpenOptions};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::color::ColorMode;
use crate::clock::{Clock, SystemClock};
use crate::error::TintError;
use crate::format::FormatTable;
use crate::frame::{BacktraceIntrospector, Introspect};
use crate::level::Level;
use crate::render::{self, RenderContext, Rendered};

/// Status passed to the exit hook by the fatal path.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Called with the exit status once a fatal message has been written.
pub type ExitHook = Box<dyn Fn(i32) + Send>;

/// Lazily opened plain-text sink.
#[derive(Debug)]
enum FileSink {
    /// Not opened yet; the next write attempts it.
    Pending,
    Open(File),
    /// Opening or writing failed; console-only from here on.
    Disabled,
}

/// A leveled, template-driven logger.
pub struct Logger {
    level: Level,
    file: PathBuf,
    file_sink: FileSink,
    formats: FormatTable,
    prefix: String,
    call_depth: usize,
    use_color: bool,
    console: Box<dyn Write + Send>,
    clock: Arc<dyn Clock>,
    introspector: Box<dyn Introspect>,
    exit: ExitHook,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// A logger at `Debug` threshold writing to stderr, with no file sink.
    pub fn new() -> Self {
        Self {
            level: Level::Debug,
            file: PathBuf::new(),
            file_sink: FileSink::Pending,
            formats: FormatTable::new(),
            prefix: String::new(),
            call_depth: 0,
            use_color: ColorMode::Auto.resolve(io::stderr().is_terminal()),
            console: Box::new(io::stderr()),
            clock: Arc::new(SystemClock),
            introspector: Box::new(BacktraceIntrospector::default()),
            exit: Box::new(|code| std::process::exit(code)),
        }
    }

    /// Replace the interactive sink.
    #[must_use]
    pub fn with_sink(mut self, sink: impl Write + Send + 'static) -> Self {
        self.console = Box::new(sink);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_introspector(mut self, introspector: impl Introspect + 'static) -> Self {
        self.introspector = Box::new(introspector);
        self
    }

    /// Replace the hook the fatal path calls after writing. Defaults to
    /// [`std::process::exit`].
    #[must_use]
    pub fn with_exit_hook(mut self, hook: impl Fn(i32) + Send + 'static) -> Self {
        self.exit = Box::new(hook);
        self
    }

    #[must_use]
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    pub fn formats(&self) -> &FormatTable {
        &self.formats
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    pub fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    /// Point the file sink at `path`. An empty path is ignored. A new path
    /// drops any handle already open; the next message reopens lazily.
    pub fn set_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return;
        }
        self.file = path.to_path_buf();
        self.file_sink = FileSink::Pending;
    }

    /// Replace the fallback format used by levels without their own.
    pub fn set_format(&mut self, template: &str) {
        self.formats.set_format(template);
    }

    pub fn set_level_format(&mut self, level: Level, template: &str) {
        self.formats.set_level_format(level, template);
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    /// Extra frames to skip when resolving the caller, for code that wraps
    /// logger calls in its own helpers.
    pub fn set_call_depth(&mut self, depth: usize) {
        self.call_depth = depth;
    }

    pub fn set_color(&mut self, use_color: bool) {
        self.use_color = use_color;
    }

    /// Whether a message at `level` would be emitted.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level
    }

    /// Log `args`, joined by spaces, at `level`.
    pub fn log(&mut self, level: Level, args: &[&dyn fmt::Display]) {
        if !self.enabled(level) {
            return;
        }
        self.emit(level, &render::join_args(args), true);
    }

    pub fn debug(&mut self, args: &[&dyn fmt::Display]) {
        self.log(Level::Debug, args);
    }

    pub fn info(&mut self, args: &[&dyn fmt::Display]) {
        self.log(Level::Info, args);
    }

    pub fn warn(&mut self, args: &[&dyn fmt::Display]) {
        self.log(Level::Warn, args);
    }

    /// Log at `Error`; the message carries a stack dump.
    pub fn error(&mut self, args: &[&dyn fmt::Display]) {
        self.log(Level::Error, args);
    }

    /// Log at `Fatal` regardless of threshold, with a stack dump, then call
    /// the exit hook with [`FATAL_EXIT_CODE`].
    ///
    /// With the default hook this never returns.
    pub fn fatal(&mut self, args: &[&dyn fmt::Display]) {
        self.terminate(&render::join_args(args), true);
    }

    /// `print`-style entry: debug level, newline added only when missing.
    pub fn print(&mut self, args: &[&dyn fmt::Display]) {
        if !self.enabled(Level::Debug) {
            return;
        }
        let body = render::join_args(args);
        let newline = !body.ends_with('\n');
        self.emit(Level::Debug, &body, newline);
    }

    /// `printf`-style entry: debug level, newline added only when missing.
    pub fn printf(&mut self, args: fmt::Arguments<'_>) {
        if !self.enabled(Level::Debug) {
            return;
        }
        let body = args.to_string();
        let newline = !body.ends_with('\n');
        self.emit(Level::Debug, &body, newline);
    }

    /// `println`-style entry: debug level, always newline-terminated.
    pub fn println(&mut self, args: &[&dyn fmt::Display]) {
        self.debug(args);
    }

    pub fn fatalf(&mut self, args: fmt::Arguments<'_>) {
        let body = args.to_string();
        let newline = !body.ends_with('\n');
        self.terminate(&body, newline);
    }

    pub fn fatalln(&mut self, args: &[&dyn fmt::Display]) {
        self.fatal(args);
    }

    /// Write an already assembled multi-line block at debug level.
    pub(crate) fn write_block(&mut self, block: &str) {
        if !self.enabled(Level::Debug) {
            return;
        }
        self.emit(Level::Debug, block, !block.ends_with('\n'));
    }

    fn terminate(&mut self, body: &str, newline: bool) {
        self.emit(Level::Fatal, body, newline);
        let _ = self.console.flush();
        if let FileSink::Open(file) = &mut self.file_sink {
            let _ = file.sync_all();
        }
        (self.exit)(FATAL_EXIT_CODE);
    }

    fn context(&self) -> RenderContext<'_> {
        RenderContext {
            formats: &self.formats,
            prefix: &self.prefix,
            call_depth: self.call_depth,
            clock: self.clock.as_ref(),
            introspector: self.introspector.as_ref(),
        }
    }

    fn emit(&mut self, level: Level, body: &str, newline: bool) {
        let rendered = render::render(&self.context(), level, body, newline);
        self.write_console(&rendered);
        self.write_file(&rendered.plain);
    }

    fn write_console(&mut self, rendered: &Rendered) {
        let text = if self.use_color {
            &rendered.styled
        } else {
            &rendered.plain
        };
        // Console failures have nowhere left to be reported.
        let _ = self.console.write_all(text.as_bytes());
    }

    fn write_file(&mut self, plain: &str) {
        let result = match self.file_handle() {
            Some(file) => file.write_all(plain.as_bytes()),
            None => return,
        };
        if let Err(e) = result {
            self.file_sink = FileSink::Disabled;
            let message = format!("cannot write log file {}: {e}", self.file.display());
            self.warn_console(&message);
        }
    }

    /// The open file sink, opening it on first use.
    fn file_handle(&mut self) -> Option<&mut File> {
        if self.file.as_os_str().is_empty() {
            return None;
        }
        if matches!(self.file_sink, FileSink::Pending) {
            match open_append(&self.file) {
                Ok(file) => self.file_sink = FileSink::Open(file),
                Err(e) => {
                    // Disable before warning so the warning cannot recurse
                    // into another open attempt.
                    self.file_sink = FileSink::Disabled;
                    let message = format!("cannot open log file {}: {e}", self.file.display());
                    self.warn_console(&message);
                }
            }
        }
        match &mut self.file_sink {
            FileSink::Open(file) => Some(file),
            FileSink::Pending | FileSink::Disabled => None,
        }
    }

    /// Render a warning to the console only, regardless of threshold.
    fn warn_console(&mut self, message: &str) {
        let rendered = render::render(&self.context(), Level::Warn, message, true);
        self.write_console(&rendered);
    }
}

/// Open `path` for appending, creating it and its parent directories.
fn open_append(path: &Path) -> Result<File, TintError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o755);
        }
        builder.create(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(file)
}

/// An in-memory sink whose contents stay readable after the logger takes
/// ownership of a clone.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl Write for MemorySink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
