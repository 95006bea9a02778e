//! Crate-level error types.

use std::fmt;

/// Errors produced by the spbview crate.
#[derive(Debug)]
pub enum SpbError {
    /// The inference API answered with a non-2xx status.
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Request path relative to the base URL.
        path: String,
    },
    /// The response body was not valid JSON or not the expected shape.
    InvalidResponse(String),
    /// Connection-level failure before any HTTP status existed.
    Transport(String),
    /// An uploaded structure file does not carry the `.cif` suffix.
    InvalidFileFormat(String),
    /// The potential-energy grid failed shape validation.
    MalformedGrid(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Failed to spawn the fetch worker thread.
    ThreadSpawn(std::io::Error),
}

impl fmt::Display for SpbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestFailed { status, path } => {
                write!(f, "request to {path} failed with status {status}")
            }
            Self::InvalidResponse(msg) => {
                write!(f, "invalid response: {msg}")
            }
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::InvalidFileFormat(name) => {
                write!(f, "invalid file format: {name} (expected .cif)")
            }
            Self::MalformedGrid(msg) => {
                write!(f, "malformed energy grid: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn fetch worker: {e}")
            }
        }
    }
}

impl std::error::Error for SpbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SpbError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SpbError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidResponse(e.to_string())
    }
}
