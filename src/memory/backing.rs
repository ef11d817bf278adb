//! Region content storage

use crate::memory::{Error, Result};
use crate::snapshot::Region;
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Trait which represents a source of region contents.
///
/// Content is keyed by the region's bounds (see `Region::backing_key`). A
/// region with no stored content must yield `Error::BackingNotFound` rather
/// than any substitute; a capture tool is allowed to skip regions, and the
/// engine must not pretend otherwise.
pub trait BackingStore {
    /// Retrieve the decompressed content of a region.
    ///
    /// The returned length may differ from the region's declared length.
    fn load(&self, region: &Region) -> Result<Vec<u8>>;
}

/// Region contents stored as individual gzip files in a directory, one per
/// region, named `<start>-<end>.bin` with hex bounds.
pub struct RegionFiles {
    root: PathBuf,
}

impl RegionFiles {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        RegionFiles { root: root.into() }
    }

    pub fn as_root(&self) -> &Path {
        &self.root
    }

    /// The file a region's content would be stored in.
    pub fn path_for(&self, region: &Region) -> PathBuf {
        self.root.join(format!("{}.bin", region.backing_key()))
    }
}

impl BackingStore for RegionFiles {
    fn load(&self, region: &Region) -> Result<Vec<u8>> {
        let key = region.backing_key();
        let file = match fs::File::open(self.path_for(region)) {
            Ok(file) => file,
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::BackingNotFound { key })
            }
            Err(source) => return Err(Error::BackingUnreadable { key, source }),
        };

        let mut data = Vec::new();
        GzDecoder::new(io::BufReader::new(file))
            .read_to_end(&mut data)
            .map_err(|source| Error::BackingUnreadable {
                key: key.clone(),
                source,
            })?;

        Ok(data)
    }
}

/// Already-decompressed region contents held in memory, keyed the same way
/// as on disk.
impl BackingStore for HashMap<String, Vec<u8>> {
    fn load(&self, region: &Region) -> Result<Vec<u8>> {
        let key = region.backing_key();

        match self.get(&key) {
            Some(data) => Ok(data.clone()),
            None => Err(Error::BackingNotFound { key }),
        }
    }
}
