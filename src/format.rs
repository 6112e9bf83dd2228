//! Template parsing and the per-level format table.
//!
//! A template is a plain string with zero or more of the placeholders
//! `%level%`, `%date%`, `%time%` and `%file%`. Parsing records, for each
//! placeholder, the literal token that carries it: the placeholder plus any
//! non-whitespace glued to either side, so `(%file%)` is one token and its
//! parentheses are styled together with the substituted location.

use std::sync::OnceLock;

use regex::Regex;

use crate::level::Level;

/// Template used when nothing has been registered.
pub const DEFAULT_FORMAT: &str = "[%level%] %date% %time% (%file%) ";

pub const LEVEL_PLACEHOLDER: &str = "%level%";
pub const DATE_PLACEHOLDER: &str = "%date%";
pub const TIME_PLACEHOLDER: &str = "%time%";
pub const FILE_PLACEHOLDER: &str = "%file%";

fn re_level_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\S*%level%\S*")
            .expect("re_level_token: pattern is valid and should always compile")
    })
}

fn re_date_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\S*%date%\S*")
            .expect("re_date_token: pattern is valid and should always compile")
    })
}

fn re_time_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\S*%time%\S*")
            .expect("re_time_token: pattern is valid and should always compile")
    })
}

fn re_file_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\S*%file%\S*")
            .expect("re_file_token: pattern is valid and should always compile")
    })
}

/// First token in `raw` matching `re`, or an empty string.
fn find_token(re: &Regex, raw: &str) -> String {
    re.find(raw)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// A parsed template. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    raw: String,
    level_token: String,
    date_token: String,
    time_token: String,
    file_token: String,
}

impl Format {
    pub fn parse(template: &str) -> Self {
        Self {
            raw: template.to_string(),
            level_token: find_token(re_level_token(), template),
            date_token: find_token(re_date_token(), template),
            time_token: find_token(re_time_token(), template),
            file_token: find_token(re_file_token(), template),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn level_token(&self) -> &str {
        &self.level_token
    }

    pub fn date_token(&self) -> &str {
        &self.date_token
    }

    pub fn time_token(&self) -> &str {
        &self.time_token
    }

    pub fn file_token(&self) -> &str {
        &self.file_token
    }
}

fn default_format() -> &'static Format {
    static FORMAT: OnceLock<Format> = OnceLock::new();
    FORMAT.get_or_init(|| Format::parse(DEFAULT_FORMAT))
}

/// Level → format mapping with an `ALL` fallback slot.
///
/// The first format ever registered for a specific level also fills the
/// fallback slot when it is still empty, so it becomes the format of every
/// level that has none of its own.
#[derive(Debug, Clone, Default)]
pub struct FormatTable {
    levels: [Option<Format>; Level::COUNT],
    fallback: Option<Format>,
}

impl FormatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `template` for `level`, seeding the fallback if it is empty.
    pub fn set_level_format(&mut self, level: Level, template: &str) {
        let format = Format::parse(template);
        if self.fallback.is_none() {
            self.fallback = Some(format.clone());
        }
        self.levels[level.index()] = Some(format);
    }

    /// Replace the fallback format.
    pub fn set_format(&mut self, template: &str) {
        self.fallback = Some(Format::parse(template));
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// The format for `level`: its own, else the fallback, else the built-in
    /// [`DEFAULT_FORMAT`].
    pub fn format(&self, level: Level) -> &Format {
        self.levels[level.index()]
            .as_ref()
            .or(self.fallback.as_ref())
            .unwrap_or_else(|| default_format())
    }
}
