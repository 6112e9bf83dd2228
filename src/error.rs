//! Error types for `tintlog`.
//!
//! Uses [`thiserror`] for ergonomic error derivation. The logging write path
//! never returns these to callers; they surface from configuration loading and
//! from the command-line binary.

use thiserror::Error;

/// Errors that can occur while configuring or driving `tintlog`.
///
/// Maps to exit codes in the binary: [`Config`](Self::Config) and
/// [`Toml`](Self::Toml) → exit 1, [`Io`](Self::Io) → exit 2.
#[derive(Debug, Error)]
pub enum TintError {
    /// Configuration error (unknown level name, unreadable config file).
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error while opening or writing a sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML deserialization error.
    #[error("config file error: {0}")]
    Toml(#[from] toml::de::Error),
}
