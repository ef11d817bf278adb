#[macro_use]
extern crate clap;

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate serde_plain;

mod arch;
mod cli;
mod emu;
mod memory;
mod project;
mod reg;
mod replay;
mod snapshot;

fn main() -> std::io::Result<()> {
    cli::main()
}
