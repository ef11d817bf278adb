//! Error type for host-side emulator operations

use std::result;
use thiserror::Error;

/// Failures of host requests made to the emulator (mapping, host memory
/// access, register access). Guest faults are reported through
/// `StepResult`, never through this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("address {0:#x} is not mapped")]
    Unmapped(u64),

    #[error("range {start:#x}+{len:#x} overlaps an existing mapping")]
    AlreadyMapped { start: u64, len: u64 },

    #[error("range {start:#x}+{len:#x} is empty or wraps the address space")]
    InvalidRange { start: u64, len: u64 },

    #[error("no register named {0}")]
    UnknownRegister(String),
}

pub type Result<T> = result::Result<T, Error>;
