//! Configuration management with TOML file support.
//!
//! Merges settings from three sources (highest precedence first):
//! 1. CLI flags
//! 2. Config file (`~/.config/tintlog/config.toml` or `$XDG_CONFIG_HOME/tintlog/config.toml`)
//! 3. Built-in defaults

use std::collections::{BTreeMap, HashMap};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::Cli;
use crate::color::ColorMode;
use crate::error::TintError;
use crate::frame::{BacktraceIntrospector, DEFAULT_MAX_FRAMES, FrameFilter};
use crate::level::Level;
use crate::logger::Logger;

/// Log file used by the process-wide default logger.
pub const DEFAULT_FILE: &str = "log/app.log";

/// Runtime configuration merged from defaults, config file, and CLI arguments.
///
/// Use [`Config::from_cli`] to build from parsed CLI arguments, or
/// [`Config::default`] for built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Color output mode (auto/always/never).
    pub color_mode: ColorMode,
    /// Severity threshold; lower messages are suppressed.
    pub level: Level,
    /// Plain-text file sink. `None` = console only.
    pub file: Option<PathBuf>,
    /// Text placed between the rendered template and the message.
    pub prefix: String,
    /// Extra frames to skip when resolving the caller.
    pub call_depth: usize,
    /// Fallback template. `None` keeps the built-in default.
    pub format: Option<String>,
    /// Per-level templates.
    pub level_formats: BTreeMap<Level, String>,
    /// Ceiling on frames inspected by a stack capture.
    pub max_frames: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Auto,
            level: Level::Debug,
            file: None,
            prefix: String::new(),
            call_depth: 0,
            format: None,
            level_formats: BTreeMap::new(),
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }
}

impl Config {
    /// Build a [`Config`] from CLI arguments, loading the config file if present.
    ///
    /// Merge precedence: CLI flags > config file > defaults.
    pub fn from_cli(cli: &Cli) -> Result<Self, TintError> {
        let config_path = cli.config.clone().unwrap_or_else(Self::default_config_path);
        let mut config = if config_path.exists() {
            Self::load(&config_path)?
        } else {
            Self::default()
        };

        // CLI overrides
        if cli.color != ColorMode::Auto {
            config.color_mode = cli.color;
        }
        if let Some(ref threshold) = cli.threshold {
            config.level = threshold.parse()?;
        }
        if cli.file.is_some() {
            config.file.clone_from(&cli.file);
        }
        if cli.format.is_some() {
            config.format.clone_from(&cli.format);
        }
        if let Some(ref prefix) = cli.prefix {
            config.prefix.clone_from(prefix);
        }
        if let Some(depth) = cli.call_depth {
            config.call_depth = depth;
        }

        Ok(config)
    }

    /// Built-in defaults overlaid with the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, TintError> {
        let mut config = Self::default();
        config.apply_file_config(FileConfig::load(path)?)?;
        Ok(config)
    }

    /// Configuration of the process-wide default logger: the default config
    /// file when it exists, otherwise built-in defaults writing to
    /// [`DEFAULT_FILE`].
    pub fn for_default_logger() -> Result<Self, TintError> {
        let path = Self::default_config_path();
        if path.exists() {
            return Self::load(&path);
        }
        Ok(Self {
            file: Some(PathBuf::from(DEFAULT_FILE)),
            ..Self::default()
        })
    }

    /// Default config file path: `$XDG_CONFIG_HOME/tintlog/config.toml` or
    /// `~/.config/tintlog/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(xdg).join("tintlog").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("tintlog")
                .join("config.toml")
        } else {
            PathBuf::from(".config/tintlog/config.toml")
        }
    }

    /// Build a [`Logger`] with this configuration, writing to stderr.
    pub fn build_logger(&self) -> Logger {
        let introspector =
            BacktraceIntrospector::new(FrameFilter::default(), self.max_frames);
        let mut logger = Logger::new()
            .with_color(self.color_mode.resolve(io::stderr().is_terminal()))
            .with_introspector(introspector);

        logger.set_level(self.level);
        if let Some(ref file) = self.file {
            logger.set_file(file);
        }
        logger.set_prefix(self.prefix.clone());
        logger.set_call_depth(self.call_depth);

        // The explicit fallback goes in first so a per-level template does not
        // claim the fallback slot.
        if let Some(ref format) = self.format {
            logger.set_format(format);
        }
        for (level, template) in &self.level_formats {
            logger.set_level_format(*level, template);
        }
        logger
    }

    /// Apply settings from a parsed config file.
    fn apply_file_config(&mut self, file: FileConfig) -> Result<(), TintError> {
        if let Some(color) = file.color {
            self.color_mode = ColorMode::from_config_str(&color);
        }
        if let Some(level) = file.level {
            self.level = level.parse()?;
        }
        if let Some(path) = file.file {
            self.file = Some(path);
        }
        if let Some(prefix) = file.prefix {
            self.prefix = prefix;
        }
        if let Some(depth) = file.call_depth {
            self.call_depth = depth;
        }
        if let Some(format) = file.format {
            self.format = Some(format);
        }
        if let Some(max_frames) = file.max_frames {
            self.max_frames = max_frames;
        }
        if let Some(formats) = file.formats {
            for (key, template) in formats {
                self.level_formats.insert(key.parse()?, template);
            }
        }
        Ok(())
    }
}

/// Config file structure (TOML deserialization).
#[derive(Debug, Deserialize)]
struct FileConfig {
    color: Option<String>,
    level: Option<String>,
    file: Option<PathBuf>,
    prefix: Option<String>,
    call_depth: Option<usize>,
    format: Option<String>,
    max_frames: Option<usize>,
    formats: Option<HashMap<String, String>>,
}

impl FileConfig {
    fn load(path: &Path) -> Result<Self, TintError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TintError::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}
