//! Demand-paged memory: the region directory, backing content, and the lazy
//! mapping state machine that ties them to an emulator.

mod backing;
mod directory;
mod error;
mod lazy;
mod protection;

pub use backing::{BackingStore, RegionFiles};
pub use directory::RegionDirectory;
pub use error::{Error, Result};
pub use lazy::{LazyMapper, LazyMappingEntry};
pub use protection::{Access, ProtectionKind};
