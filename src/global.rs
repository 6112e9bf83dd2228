//! The process-wide default logger and the free functions and macros that
//! delegate to it.
//!
//! The default is built on first use from [`Config::for_default_logger`].
//! Initialization is single-flight: racing first calls all observe the same
//! instance. Library code that wants its own settings should construct a
//! [`Logger`] and pass it around instead.

use std::fmt;
use std::path::Path;
use std::sync::{Mutex, OnceLock, PoisonError};

use crate::config::{Config, DEFAULT_FILE};
use crate::level::Level;
use crate::logger::Logger;

static DEFAULT_LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

/// The process-wide default logger.
pub fn default_logger() -> &'static Mutex<Logger> {
    DEFAULT_LOGGER.get_or_init(|| {
        let logger = match Config::for_default_logger() {
            Ok(config) => config.build_logger(),
            Err(e) => {
                let mut logger = Config::default().build_logger();
                logger.set_file(DEFAULT_FILE);
                logger.warn(&[&"ignoring default config:", &e]);
                logger
            }
        };
        Mutex::new(logger)
    })
}

/// Run `f` with the default logger locked. A poisoned lock is recovered.
pub fn with_default<R>(f: impl FnOnce(&mut Logger) -> R) -> R {
    let mut logger = default_logger()
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut logger)
}

pub fn set_level(level: Level) {
    with_default(|l| l.set_level(level));
}

pub fn set_file(path: impl AsRef<Path>) {
    with_default(|l| l.set_file(path));
}

pub fn set_format(template: &str) {
    with_default(|l| l.set_format(template));
}

pub fn set_level_format(level: Level, template: &str) {
    with_default(|l| l.set_level_format(level, template));
}

pub fn set_prefix(prefix: impl Into<String>) {
    with_default(|l| l.set_prefix(prefix));
}

pub fn set_call_depth(depth: usize) {
    with_default(|l| l.set_call_depth(depth));
}

pub fn debug(args: &[&dyn fmt::Display]) {
    with_default(|l| l.debug(args));
}

pub fn info(args: &[&dyn fmt::Display]) {
    with_default(|l| l.info(args));
}

pub fn warn(args: &[&dyn fmt::Display]) {
    with_default(|l| l.warn(args));
}

pub fn error(args: &[&dyn fmt::Display]) {
    with_default(|l| l.error(args));
}

pub fn fatal(args: &[&dyn fmt::Display]) {
    with_default(|l| l.fatal(args));
}

pub fn print(args: &[&dyn fmt::Display]) {
    with_default(|l| l.print(args));
}

pub fn printf(args: fmt::Arguments<'_>) {
    with_default(|l| l.printf(args));
}

pub fn println(args: &[&dyn fmt::Display]) {
    with_default(|l| l.println(args));
}

pub fn fatalf(args: fmt::Arguments<'_>) {
    with_default(|l| l.fatalf(args));
}

pub fn fatalln(args: &[&dyn fmt::Display]) {
    with_default(|l| l.fatalln(args));
}

/// Log any `Display` values at debug level, space separated.
///
/// `debug!(a, b)` goes to the default logger; `debug!(logger => a, b)` to
/// `logger`.
#[macro_export]
macro_rules! debug {
    ($logger:expr => $($arg:expr),* $(,)?) => {
        $logger.debug(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
    ($($arg:expr),* $(,)?) => {
        $crate::global::debug(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

/// Log any `Display` values at info level. See [`debug!`].
#[macro_export]
macro_rules! info {
    ($logger:expr => $($arg:expr),* $(,)?) => {
        $logger.info(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
    ($($arg:expr),* $(,)?) => {
        $crate::global::info(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

/// Log any `Display` values at warn level. See [`debug!`].
#[macro_export]
macro_rules! warn {
    ($logger:expr => $($arg:expr),* $(,)?) => {
        $logger.warn(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
    ($($arg:expr),* $(,)?) => {
        $crate::global::warn(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

/// Log any `Display` values at error level, with a stack dump. See [`debug!`].
#[macro_export]
macro_rules! error {
    ($logger:expr => $($arg:expr),* $(,)?) => {
        $logger.error(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
    ($($arg:expr),* $(,)?) => {
        $crate::global::error(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

/// Log any `Display` values at fatal level, with a stack dump, then exit.
/// See [`debug!`].
#[macro_export]
macro_rules! fatal {
    ($logger:expr => $($arg:expr),* $(,)?) => {
        $logger.fatal(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
    ($($arg:expr),* $(,)?) => {
        $crate::global::fatal(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}
