//! Address-to-region lookup

use crate::snapshot::Region;

/// The declared memory layout of a snapshot, ordered for lookup.
///
/// Regions are sorted by start address once, at construction, and never
/// change afterwards. Indices handed out by `find_index` therefore remain
/// valid for the lifetime of the directory.
pub struct RegionDirectory {
    regions: Vec<Region>,
}

impl RegionDirectory {
    /// Build a directory from a snapshot's region list.
    ///
    /// Regions are assumed not to overlap.
    pub fn new(mut regions: Vec<Region>) -> Self {
        regions.sort_by_key(|r| r.start());

        RegionDirectory { regions }
    }

    /// Find the index of the region containing `address`.
    pub fn find_index(&self, address: u64) -> Option<usize> {
        // Number of regions starting at or below the address; the candidate
        // is the last of them.
        let after = self.regions.partition_point(|r| r.start() <= address);
        let index = after.checked_sub(1)?;

        if self.regions[index].contains(address) {
            Some(index)
        } else {
            None
        }
    }

    /// Find the region containing `address`.
    pub fn find_region(&self, address: u64) -> Option<&Region> {
        self.find_index(address).map(|i| &self.regions[i])
    }

    pub fn region(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn as_slice(&self) -> &[Region] {
        &self.regions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }
}
