//! Severity levels with parsing, display names, and colorization.
//!
//! Levels are ordered by severity (ascending) so threshold checks are a plain
//! `<` comparison. Each level has a fixed-width display name used by the
//! `%level%` template token and an [`owo_colors::Style`] used on the console.

use std::fmt;
use std::str::FromStr;

use owo_colors::Style;

use crate::error::TintError;

/// Canonical severity enumeration.
///
/// Ordered by severity (ascending) via [`Ord`]; a logger suppresses every
/// message whose level is below its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
    Fatal = 4,
}

impl Level {
    /// Number of levels, used to size per-level tables.
    pub const COUNT: usize = 5;

    /// All levels in ascending severity.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Fatal,
    ];

    /// 5-character display name, left-justified (e.g., `"INFO "`, `"ERROR"`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO ",
            Self::Warn => "WARN ",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }

    /// Position of this level in per-level tables.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether messages at this level carry a call-stack dump.
    pub const fn carries_stack(self) -> bool {
        matches!(self, Self::Error | Self::Fatal)
    }

    /// Returns the [`Style`] for this level's name on the console.
    ///
    /// Every level sits on a black background except fatal, which inverts to
    /// white on red so it stands out in a scrolling terminal.
    pub fn style(self) -> Style {
        match self {
            Self::Debug => Style::new().green().on_black().bold(),
            Self::Info => Style::new().blue().on_black().bold(),
            Self::Warn => Style::new().yellow().on_black().bold(),
            Self::Error => Style::new().red().on_black().bold(),
            Self::Fatal => Style::new().white().on_red().bold(),
        }
    }

    /// Parse a string into a [`Level`], case-insensitive.
    ///
    /// Returns `None` for unrecognized strings.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "debug" | "dbg" | "trace" => Some(Self::Debug),
            "info" | "inf" | "information" => Some(Self::Info),
            "warn" | "warning" | "wrn" => Some(Self::Warn),
            "error" | "err" => Some(Self::Error),
            "fatal" | "critical" | "crit" | "panic" => Some(Self::Fatal),
            _ => None,
        }
    }
}

impl FromStr for Level {
    type Err = TintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_loose(s).ok_or_else(|| {
            TintError::Config(format!(
                "invalid level '{s}': expected one of debug, info, warn, error, fatal"
            ))
        })
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
