//! `tintlog`: leveled, template-driven logging.
//!
//! Each message is rendered from a per-level template into a colorized line
//! for the console and a plain line appended to a log file. Templates carry
//! the placeholders `%level%`, `%date%`, `%time%` and `%file%` (the caller's
//! `directory/file:line`). Error and fatal messages also carry a dump of the
//! caller's stack, and fatal messages end the process.
//!
//! # Example
//!
//! ```
//! use tintlog::{Level, Logger, MemorySink};
//!
//! let console = MemorySink::new();
//! let mut logger = Logger::new().with_sink(console.clone()).with_color(false);
//! logger.set_level(Level::Info);
//! logger.set_format("[%level%] ");
//!
//! logger.debug(&[&"dropped"]);
//! logger.info(&[&"listening on", &8080]);
//!
//! assert_eq!(console.contents(), "[INFO ] listening on 8080\n");
//! ```

pub mod cli;
pub mod clock;
pub mod color;
pub mod config;
pub mod error;
pub mod format;
pub mod frame;
pub mod global;
pub mod level;
pub mod logger;
pub mod render;
pub mod session;

// Re-export primary API types for convenience.
pub use clock::{Clock, ManualClock, SystemClock};
pub use color::ColorMode;
pub use config::Config;
pub use error::TintError;
pub use format::{DEFAULT_FORMAT, Format, FormatTable};
pub use frame::{BacktraceIntrospector, DEFAULT_MAX_FRAMES, Frame, FrameFilter, Introspect};
pub use global::{
    debug, default_logger, error, fatal, fatalf, fatalln, info, print, printf, println, warn,
    with_default,
};
pub use level::Level;
pub use logger::{FATAL_EXIT_CODE, Logger, MemorySink};
pub use render::{Rendered, strip_ansi};
pub use session::Session;
