//! Color decision for the console sink.

use clap::ValueEnum;

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Enable colors only when the console is a TTY.
    Auto,
    /// Always enable colors.
    Always,
    /// Never enable colors.
    Never,
}

impl ColorMode {
    /// Decide whether to emit ANSI styles for a console that is (or is not) a
    /// terminal, honoring `NO_COLOR`, `TERM=dumb` and `FORCE_COLOR` in `auto`.
    pub fn resolve(self, is_terminal: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => {
                if std::env::var_os("FORCE_COLOR").is_some_and(|v| !v.is_empty()) {
                    return true;
                }
                if !is_terminal {
                    return false;
                }
                if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
                    return false;
                }
                if std::env::var("TERM").is_ok_and(|v| v == "dumb") {
                    return false;
                }
                true
            }
        }
    }

    /// Parse a config-file color value; unknown values mean `auto`.
    pub fn from_config_str(s: &str) -> Self {
        match s {
            "always" => Self::Always,
            "never" => Self::Never,
            _ => Self::Auto,
        }
    }
}
