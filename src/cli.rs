//! Command-line argument definitions for the `tintlog` binary.
//!
//! Uses [`clap`] derive macros for argument parsing.

use std::path::PathBuf;

use clap::Parser;

pub use crate::color::ColorMode;

/// Log text through a colorized console sink and a plain log file.
///
/// With MESSAGE words, logs them once at LEVEL. Without, logs every stdin
/// line at LEVEL.
#[derive(Debug, Parser)]
#[command(name = "tintlog", version, about, long_about = None)]
pub struct Cli {
    /// Severity of the logged lines (debug, info, warn, error, fatal).
    #[arg(value_parser = parse_level_arg)]
    pub level: String,

    /// Message words, joined with single spaces.
    pub message: Vec<String>,

    /// Control color output.
    ///
    /// `auto` enables colors only when stderr is a TTY and `NO_COLOR` is unset.
    #[arg(short = 'c', long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Minimum severity to emit; lower lines are dropped.
    #[arg(short = 't', long, value_parser = parse_level_arg)]
    pub threshold: Option<String>,

    /// Append plain-text output to this file.
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Line template using %level%, %date%, %time% and %file%.
    #[arg(short = 'F', long)]
    pub format: Option<String>,

    /// Text placed between the rendered template and the message.
    #[arg(short = 'p', long)]
    pub prefix: Option<String>,

    /// Extra stack frames to skip when resolving the caller.
    #[arg(long)]
    pub call_depth: Option<usize>,

    /// Treat stdin lines as session checkpoints and report their timing as
    /// one block at end of input.
    #[arg(short = 's', long)]
    pub session: bool,

    /// Path to configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Parse level argument as case-insensitive string.
fn parse_level_arg(s: &str) -> Result<String, String> {
    let lower = s.to_lowercase();
    match lower.as_str() {
        "debug" | "info" | "warn" | "error" | "fatal" => Ok(lower),
        _ => Err(format!(
            "invalid level '{s}': expected one of debug, info, warn, error, fatal"
        )),
    }
}
