//! The captured process snapshot: identity, registers, and memory layout.
//!
//! A snapshot is produced by a capture tool attached to a live process and
//! consumed once, at session start. Region contents are not part of the
//! snapshot itself; see `memory::BackingStore` for how those are retrieved.

mod error;
mod region;

pub use error::{Error, Result};
pub use region::Region;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// Identity of the captured process.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u64,
    pub ppid: u64,
    pub executable: String,
}

/// Identity of the captured thread.
///
/// Debuggers frequently report unnamed threads as `null`, so the name is
/// optional.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ThreadInfo {
    pub tid: u64,

    #[serde(default)]
    pub name: Option<String>,
}

/// A complete snapshot of a single-threaded process at a point in time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    process: ProcessInfo,
    thread: ThreadInfo,

    /// Pointer-width registers, by the capture tool's names.
    registers: BTreeMap<String, u64>,

    regions: Vec<Region>,
}

impl Snapshot {
    /// Read and validate a snapshot file.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = fs::File::open(path)?;

        Self::from_reader(io::BufReader::new(file))
    }

    /// Parse and validate a snapshot from any reader.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_reader(reader)?;

        snapshot.validate()?;

        Ok(snapshot)
    }

    /// Check the structural invariants the rest of the engine relies on.
    ///
    /// Overlap between regions is the capture side's responsibility and is
    /// not checked here.
    fn validate(&self) -> Result<()> {
        for (index, region) in self.regions.iter().enumerate() {
            if region.start() >= region.end() {
                return Err(Error::EmptyRegion {
                    index,
                    start: region.start(),
                    end: region.end(),
                });
            }
        }

        Ok(())
    }

    pub fn process(&self) -> &ProcessInfo {
        &self.process
    }

    pub fn thread(&self) -> &ThreadInfo {
        &self.thread
    }

    pub fn registers(&self) -> &BTreeMap<String, u64> {
        &self.registers
    }

    pub fn iter_regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    /// The sum of every region's declared length, in bytes.
    pub fn total_size(&self) -> u64 {
        self.regions.iter().map(|r| r.len()).sum()
    }

    /// Split the snapshot into its register file and region list.
    pub fn into_parts(self) -> (BTreeMap<String, u64>, Vec<Region>) {
        (self.registers, self.regions)
    }
}

#[cfg(test)]
mod tests;
