//! Transfer of captured register state into an emulator.

mod transfer;

pub use transfer::{transfer, RegisterMap, TransferReport};

#[cfg(test)]
mod tests;
