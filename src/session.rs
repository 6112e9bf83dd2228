//! Session timer: timestamped checkpoints reported as one block.
//!
//! The first checkpoint shows its absolute time; every later one shows the
//! time elapsed since the first. A session is written exactly once, either
//! by [`Session::flush`] or, if that was never called, when it is dropped,
//! so every exit path of the enclosing scope reports it.
//!
//! ```no_run
//! use tintlog::Session;
//!
//! fn import() {
//!     let mut session = Session::start(&[&"import started"]);
//!     session.append(&[&"rows parsed"]);
//!     session.append(&[&"rows stored"]);
//! } // block written to the default logger here
//! ```

use std::fmt::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use jiff::Zoned;

use crate::clock::{self, Clock, SystemClock};
use crate::global;
use crate::logger::Logger;
use crate::render;

#[derive(Debug, Clone)]
struct Entry {
    at: Zoned,
    message: String,
}

/// An ordered checkpoint log bound to a logger.
pub struct Session<'a> {
    entries: Vec<Entry>,
    target: Option<&'a Mutex<Logger>>,
    clock: Arc<dyn Clock>,
    written: bool,
}

impl Session<'static> {
    /// A session reporting to the process-wide default logger.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            target: None,
            clock: Arc::new(SystemClock),
            written: false,
        }
    }

    /// A default-logger session whose first checkpoint is `args`, unless
    /// `args` is empty.
    pub fn start(args: &[&dyn fmt::Display]) -> Self {
        let mut session = Self::new();
        if !args.is_empty() {
            session.append(args);
        }
        session
    }
}

impl Default for Session<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Session<'a> {
    /// A session reporting to `logger`, reading time from the logger's clock.
    ///
    /// The lock is only taken here and when the block is written; do not hold
    /// it yourself while the session is flushed or dropped.
    pub fn with_logger(logger: &'a Mutex<Logger>) -> Self {
        let clock = logger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clock();
        Self {
            entries: Vec::new(),
            target: Some(logger),
            clock,
            written: false,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Record a checkpoint now. The first one fixes the session's epoch.
    pub fn append(&mut self, args: &[&dyn fmt::Display]) {
        self.entries.push(Entry {
            at: self.clock.now(),
            message: render::join_args(args),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The block as it will be written.
    pub fn render(&self) -> String {
        let mut block = String::from("\n");
        let Some(first) = self.entries.first() else {
            return block;
        };
        let epoch = first.at.timestamp();

        for (i, entry) in self.entries.iter().enumerate() {
            let when = if i == 0 {
                clock::format_stamp(&entry.at)
            } else {
                let elapsed = entry.at.timestamp().duration_since(epoch);
                format!("{:?}", Duration::try_from(elapsed).unwrap_or_default())
            };
            let _ = writeln!(block, "\t{when:<10} > {}", entry.message);
        }
        block
    }

    /// Write the block to the bound logger, or the default one. A session
    /// with no checkpoints writes nothing.
    pub fn flush(mut self) {
        self.write();
    }

    fn write(&mut self) {
        if self.written {
            return;
        }
        self.written = true;
        if self.entries.is_empty() {
            return;
        }

        let block = self.render();
        let target = self.target.unwrap_or_else(|| global::default_logger());
        target
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write_block(&block);
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        self.write();
    }
}
