//! Error type for demand paging

use crate::emu::{self, Fault};
use std::{io, result};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A region's permissions have no corresponding protection.
    #[error("unsupported permission combination: R={r}, W={w}, X={x}")]
    InvalidProtectionCombination { r: bool, w: bool, x: bool },

    /// No backing content was captured for the region.
    #[error("no backing content for region {key}")]
    BackingNotFound { key: String },

    /// Backing content exists but could not be read or decompressed.
    #[error("backing content for region {key} is unreadable: {source}")]
    BackingUnreadable {
        key: String,
        #[source]
        source: io::Error,
    },

    /// An access fault that lazy paging cannot explain: either no region
    /// covers the address, or the region is already materialized. This is a
    /// genuine fault in the replayed program.
    #[error("unresolvable fault: {0}")]
    UnresolvableFault(Fault),

    /// The emulator refused a mapping or memory operation.
    #[error("emulator error: {0}")]
    Emulator(#[from] emu::Error),
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        match err {
            Error::BackingUnreadable { source, .. } => source,
            Error::BackingNotFound { .. } => io::Error::new(io::ErrorKind::NotFound, format!("{}", err)),
            _ => io::Error::new(io::ErrorKind::Other, format!("{}", err)),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
