//! Processor architectures that snapshots can be replayed on.
//!
//! Each architecture supplies a register alias table, which maps the names a
//! capture tool reports onto the names its emulator understands. Architectures
//! with a built-in emulator also provide a module implementing
//! `emu::Emulator`.

pub mod aarch64;

use serde::Serialize;
use std::collections::HashMap;
use std::str;

lazy_static! {
    /// Debugger register names for AArch64 that are not architectural names.
    static ref AARCH64_ALIASES: HashMap<&'static str, &'static str> = {
        let mut aliases = HashMap::new();

        aliases.insert("fp", "x29");
        aliases.insert("lr", "x30");
        aliases.insert("ip0", "x16");
        aliases.insert("ip1", "x17");

        aliases
    };
}

/// Enumeration of all architectures snapshots can be replayed on.
#[derive(Copy, Clone, Serialize, Debug, PartialEq, Eq, Hash)]
pub enum ArchName {
    AArch64,
}

impl ArchName {
    /// The width of a pointer, and thus of every captured register, in bytes.
    pub fn pointer_width(self) -> usize {
        match self {
            ArchName::AArch64 => 8,
        }
    }

    /// The alias table for this architecture's register names.
    pub fn register_aliases(self) -> &'static HashMap<&'static str, &'static str> {
        match self {
            ArchName::AArch64 => &AARCH64_ALIASES,
        }
    }

    /// Yield a name for this architecture.
    pub fn friendly_name(self) -> &'static str {
        match self {
            ArchName::AArch64 => "AArch64",
        }
    }
}

impl Default for ArchName {
    fn default() -> Self {
        ArchName::AArch64
    }
}

impl str::FromStr for ArchName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_ref() {
            "aarch64" => Ok(ArchName::AArch64),
            "arm64" => Ok(ArchName::AArch64),
            "armv8" => Ok(ArchName::AArch64),
            _ => Err(()),
        }
    }
}

derive_deserialize_from_str!(ArchName, "valid architecture name");

#[cfg(test)]
mod tests;
