//! The register transfer unit

use crate::arch::ArchName;
use crate::emu::{self, Emulator};
use log::{info, warn};
use std::collections::{BTreeMap, HashMap};

/// A resolved mapping from capture-tool register names to emulator register
/// names, built once per session.
#[derive(Debug, Clone)]
pub struct RegisterMap {
    aliases: HashMap<String, String>,
}

impl RegisterMap {
    pub fn for_arch(arch: ArchName) -> Self {
        RegisterMap {
            aliases: arch
                .register_aliases()
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }

    /// Resolve a captured name. Names with no alias pass through unchanged.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(|s| s.as_str()).unwrap_or(name)
    }
}

/// What happened to each captured register.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferReport {
    /// Captured name, emulator name, and value of every register written.
    pub applied: Vec<(String, String, u64)>,

    /// Captured names with no emulator counterpart.
    pub skipped: Vec<String>,
}

/// Write captured register values into the emulator.
///
/// Registers the emulator does not model are skipped and reported rather
/// than treated as errors; capture tools routinely include status and
/// metadata registers. Any other emulator error aborts the transfer.
pub fn transfer<E>(
    registers: &BTreeMap<String, u64>,
    map: &RegisterMap,
    emu: &mut E,
) -> emu::Result<TransferReport>
where
    E: Emulator + ?Sized,
{
    let mut report = TransferReport::default();

    for (name, value) in registers.iter() {
        let target = map.resolve(name);

        match emu.write_register(target, *value) {
            Ok(()) => {
                info!("{} -> {} = {:#x}", name, target, value);
                report
                    .applied
                    .push((name.clone(), target.to_string(), *value));
            }
            Err(emu::Error::UnknownRegister(_)) => {
                warn!("Skipping register {}: no such register in the emulator", name);
                report.skipped.push(name.clone());
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}
