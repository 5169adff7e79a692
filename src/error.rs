//! Error types for richdoc library.
//!
//! Markup parsing and rendering are total and never fail. Errors only come
//! from the surrounding layer: reading files, serializing output, and
//! validating caller-supplied options.

use std::io;
use thiserror::Error;

/// Result type alias for richdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur around a conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error while serializing rendered output.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Options describe an impossible configuration.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}
