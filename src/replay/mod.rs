//! The execution driver.
//!
//! A `Session` owns everything needed to replay one snapshot: the emulator,
//! the lazy mapping state, and the backing store. Sessions share nothing, so
//! independent snapshots can be replayed side by side by creating one
//! session each.

mod session;

pub use session::{RunSummary, Session, Stepped, Stop};
