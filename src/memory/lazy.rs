//! The lazy mapping state machine.
//!
//! Every region starts out as a *stub*: mapped in the emulator with no access
//! rights, so that the first touch of any kind raises an access fault. When
//! that fault arrives, the region is *materialized*: its content is loaded
//! from the backing store, its real protection is applied, and the content
//! is written in. Materialization happens at most once per region. A fault on
//! a region that is already materialized, or on an address no region covers,
//! is a genuine fault in the replayed program and is never retried.

use crate::emu::{Emulator, Fault};
use crate::memory::{BackingStore, Error, ProtectionKind, RegionDirectory, Result};
use crate::snapshot::Region;
use log::{info, warn};

/// Runtime mapping state for one region of the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LazyMappingEntry {
    /// Index of the region within the directory.
    region: usize,

    /// The protection the region receives once materialized. `None` if the
    /// region's declared permissions have no protection.
    target_protection: Option<ProtectionKind>,

    materialized: bool,
}

impl LazyMappingEntry {
    pub fn region_index(&self) -> usize {
        self.region
    }

    pub fn target_protection(&self) -> Option<ProtectionKind> {
        self.target_protection
    }

    pub fn is_materialized(&self) -> bool {
        self.materialized
    }
}

/// Owns the region directory and the per-region mapping state.
///
/// Entries correspond one-to-one with the directory's regions, by index.
/// Neither collection changes shape after construction.
pub struct LazyMapper {
    directory: RegionDirectory,
    entries: Vec<LazyMappingEntry>,
}

impl LazyMapper {
    /// Stub out every region of the directory in the emulator.
    ///
    /// All regions are mapped `NoAccess` regardless of declared permissions,
    /// including regions the source process reported as not mapped.
    pub fn install<E>(directory: RegionDirectory, emu: &mut E) -> Result<Self>
    where
        E: Emulator + ?Sized,
    {
        let mut entries = Vec::with_capacity(directory.len());

        for (index, region) in directory.iter().enumerate() {
            info!("Mapping {}", region);
            emu.map(region.start(), region.len(), ProtectionKind::NoAccess)?;

            let target_protection = match ProtectionKind::from_rwx(
                region.is_readable(),
                region.is_writable(),
                region.is_executable(),
            ) {
                Ok(protection) => Some(protection),
                Err(e) => {
                    warn!("Region {} will stay inaccessible: {}", region.backing_key(), e);
                    None
                }
            };

            entries.push(LazyMappingEntry {
                region: index,
                target_protection,
                materialized: false,
            });
        }

        Ok(LazyMapper { directory, entries })
    }

    pub fn directory(&self) -> &RegionDirectory {
        &self.directory
    }

    pub fn entry(&self, index: usize) -> Option<&LazyMappingEntry> {
        self.entries.get(index)
    }

    pub fn iter_entries(&self) -> impl Iterator<Item = (&Region, &LazyMappingEntry)> {
        self.directory.iter().zip(self.entries.iter())
    }

    /// Count how many regions have been materialized so far.
    pub fn materialized_count(&self) -> usize {
        self.entries.iter().filter(|e| e.materialized).count()
    }

    /// Attempt to resolve an access fault by materializing the region that
    /// covers the faulting address.
    ///
    /// On success, yields the index of the region that was materialized; the
    /// faulting instruction can then be retried. If lazy paging does not
    /// explain the fault, yields `Error::UnresolvableFault`. If the region
    /// cannot be materialized (no protection for its permissions, or no
    /// backing content), the region is left as a stub and the error is
    /// returned.
    pub fn handle_fault<E, B>(&mut self, fault: Fault, emu: &mut E, store: &B) -> Result<usize>
    where
        E: Emulator + ?Sized,
        B: BackingStore + ?Sized,
    {
        let index = self
            .directory
            .find_index(fault.address)
            .ok_or(Error::UnresolvableFault(fault))?;

        if self.entries[index].materialized {
            return Err(Error::UnresolvableFault(fault));
        }

        self.materialize(index, emu, store)?;

        Ok(index)
    }

    /// Transition a stub region to materialized.
    fn materialize<E, B>(&mut self, index: usize, emu: &mut E, store: &B) -> Result<()>
    where
        E: Emulator + ?Sized,
        B: BackingStore + ?Sized,
    {
        let region = &self.directory.as_slice()[index];
        let entry = &mut self.entries[index];

        let protection = match entry.target_protection {
            Some(protection) => protection,
            None => {
                return Err(Error::InvalidProtectionCombination {
                    r: region.is_readable(),
                    w: region.is_writable(),
                    x: region.is_executable(),
                })
            }
        };

        // Load before touching the emulator, so a missing blob leaves the
        // stub in place.
        let mut data = store.load(region).map_err(|e| {
            warn!("Cannot materialize region {}: {}", region, e);
            e
        })?;

        info!("Remapping region {} as {}", region, protection);

        let declared = region.len();
        if data.len() as u64 != declared {
            warn!(
                "Region {} has {:#x} bytes of backing content, expected {:#x}",
                region.backing_key(),
                data.len(),
                declared
            );

            if data.len() as u64 > declared {
                data.truncate(declared as usize);
            }
        }

        emu.protect(region.start(), declared, protection)?;
        emu.write_memory(region.start(), &data)?;

        entry.materialized = true;

        Ok(())
    }
}
