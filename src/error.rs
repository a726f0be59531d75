//! Crate-level error types
//!
//! Validation failures are surfaced to the ingestion caller; transport
//! failures on individual subscribers never reach this type (they are
//! handled locally by the broadcast hub).

use crate::protocol::FrameError;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
#[derive(Debug)]
pub enum Error {
    /// Frame encoding/decoding failed
    Frame(FrameError),
    /// The relay is shutting down and no longer accepts ingestion
    ShuttingDown,
    /// I/O error (bind, accept)
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Frame(e) => write!(f, "Frame error: {}", e),
            Error::ShuttingDown => write!(f, "Relay is shutting down"),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Frame(e) => Some(e),
            Error::ShuttingDown => None,
            Error::Io(e) => Some(e),
        }
    }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        Error::Frame(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
