//! Crate error type
//!
//! Probe timeouts and an expired solver ceiling are ordinary results, not
//! errors; this type covers I/O, decoding and resource failures.

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum Error {
    /// Reading a settings or level file failed
    Io(io::Error),
    /// A settings or level document did not decode
    Json(serde_json::Error),
    /// The solver's worker pool could not be built
    ThreadPool(rayon::ThreadPoolBuildError),
    /// Every generated level was rejected by goal placement
    GenerationExhausted {
        /// Levels generated before giving up
        attempts: u32,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Json(e) => write!(f, "invalid JSON: {e}"),
            Error::ThreadPool(e) => write!(f, "failed to build worker pool: {e}"),
            Error::GenerationExhausted { attempts } => {
                write!(f, "no goal could be placed after {attempts} generated levels")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::ThreadPool(e) => Some(e),
            Error::GenerationExhausted { .. } => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        Error::ThreadPool(e)
    }
}
