//! The contract between the replay engine and an instruction emulator.
//!
//! The replay engine treats the emulator as a black box: it can map address
//! ranges with a protection, change that protection, write bytes, access
//! registers by name, and step. Everything else about the CPU is the
//! emulator's business.

mod error;
mod fault;

pub use error::{Error, Result};
pub use fault::{ExceptionKind, Fault, StepResult};

use crate::memory::ProtectionKind;

/// Trait which represents the minimum capability set an emulator must expose
/// in order to replay a snapshot.
pub trait Emulator {
    /// Map `[start, start + len)` with an initial protection.
    ///
    /// The new mapping must not overlap an existing one.
    fn map(&mut self, start: u64, len: u64, protection: ProtectionKind) -> Result<()>;

    /// Change the protection of an already mapped range.
    fn protect(&mut self, start: u64, len: u64, protection: ProtectionKind) -> Result<()>;

    /// Report the protection currently in effect at an address, or `None` if
    /// it is not mapped.
    fn protection_at(&self, address: u64) -> Option<ProtectionKind>;

    /// Write bytes into mapped memory on behalf of the host.
    ///
    /// Host writes are not subject to guest protection.
    fn write_memory(&mut self, address: u64, data: &[u8]) -> Result<()>;

    /// Read bytes out of mapped memory on behalf of the host.
    fn read_memory(&self, address: u64, buf: &mut [u8]) -> Result<()>;

    /// Read a register by its architecture-specific name.
    fn read_register(&self, name: &str) -> Result<u64>;

    /// Write a register by its architecture-specific name.
    ///
    /// Names the emulator does not model yield `Error::UnknownRegister`.
    fn write_register(&mut self, name: &str, value: u64) -> Result<()>;

    /// Execute up to `count` instructions.
    ///
    /// Execution stops at the first exception. A faulting instruction has no
    /// architectural effect, so stepping again after the cause is removed
    /// re-executes it.
    fn step(&mut self, count: u64) -> StepResult;
}
