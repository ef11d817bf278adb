//! CLI commands

mod common;
mod info;
mod main;
mod replay;

pub use info::info;
pub use main::main;
pub use replay::replay;
