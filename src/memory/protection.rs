//! Page protection as seen by the emulator

use crate::memory::{Error, Result};
use std::fmt;

/// The kinds of memory access a program can perform.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    Read,
    Write,
    Execute,
}

/// Protection applied to a mapped range.
///
/// This is a closed set. Write access is never granted without read access,
/// so a `-w-` region has no representation and is rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProtectionKind {
    NoAccess,
    ReadOnly,
    ReadWrite,
    ExecuteOnly,
    ExecuteRead,
    ExecuteReadWrite,
}

impl ProtectionKind {
    /// Compute the protection for a region's declared permissions.
    ///
    /// Combinations that grant write without read have no defined protection
    /// and yield `Error::InvalidProtectionCombination`.
    pub fn from_rwx(r: bool, w: bool, x: bool) -> Result<Self> {
        match (r, w, x) {
            (false, false, false) => Ok(ProtectionKind::NoAccess),
            (true, false, false) => Ok(ProtectionKind::ReadOnly),
            (true, true, false) => Ok(ProtectionKind::ReadWrite),
            (false, false, true) => Ok(ProtectionKind::ExecuteOnly),
            (true, false, true) => Ok(ProtectionKind::ExecuteRead),
            (true, true, true) => Ok(ProtectionKind::ExecuteReadWrite),
            (r, w, x) => Err(Error::InvalidProtectionCombination { r, w, x }),
        }
    }

    /// Determine if this protection permits a given access.
    pub fn allows(self, access: Access) -> bool {
        use ProtectionKind::*;

        match access {
            Access::Read => matches!(self, ReadOnly | ReadWrite | ExecuteRead | ExecuteReadWrite),
            Access::Write => matches!(self, ReadWrite | ExecuteReadWrite),
            Access::Execute => matches!(self, ExecuteOnly | ExecuteRead | ExecuteReadWrite),
        }
    }
}

impl fmt::Display for ProtectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = if self.allows(Access::Read) { 'r' } else { '-' };
        let w = if self.allows(Access::Write) { 'w' } else { '-' };
        let x = if self.allows(Access::Execute) { 'x' } else { '-' };

        write!(f, "{}{}{}", r, w, x)
    }
}
