//! A small AArch64 interpreter.
//!
//! Only the user-mode integer subset needed to replay simple code paths is
//! implemented; anything else raises `ExceptionKind::InvalidInstruction`.

mod dis;
mod exec;
mod machine;
mod types;

pub use dis::{decode, Instruction};
pub use machine::Machine;
pub use types::Register;

#[cfg(test)]
pub mod tests;
