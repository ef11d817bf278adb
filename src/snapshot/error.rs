//! Error type for snapshot loading

use std::{io, result};
use thiserror::Error;

/// Load-time failures. Any of these aborts the session before replay begins.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying cause of error is I/O related
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The snapshot file is not valid JSON, or is missing a required field.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(#[from] serde_json::Error),

    /// A region's bounds do not describe a non-empty range.
    #[error("malformed snapshot: region {index} has bounds {start:#x}-{end:#x}")]
    EmptyRegion { index: usize, start: u64, end: u64 },
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        match err {
            Error::Io(e) => e,
            _ => io::Error::new(io::ErrorKind::InvalidData, format!("{}", err)),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
