//! Crate-wide error type.
//!
//! Resolver-level failures never show up here: the engine converts them
//! into session state plus user-visible notices. `Error` covers the
//! fallible edges of the program (configuration, tracklist parsing,
//! audio output setup, channel wiring).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file or environment loading errors.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Tracklist file parsing errors.
    #[error("tracklist error: {0}")]
    Tracklist(String),

    /// File I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Audio output device errors.
    #[error("audio output error: {0}")]
    AudioOutput(String),

    /// The player thread is gone and its command channel is closed.
    #[error("player command channel closed")]
    ChannelClosed,
}

/// Convenience `Result` alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;
