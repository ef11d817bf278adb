//! Replay command

use crate::arch::aarch64::Machine;
use crate::arch::ArchName;
use crate::cli::common::load_snapshot;
use crate::emu::Emulator;
use crate::memory::{self, RegionFiles};
use crate::project::Profile;
use crate::replay::{Session, Stop};
use std::io;

fn print_watched<E: Emulator>(profile: &Profile, emu: &E) {
    let values: Vec<String> = profile
        .iter_watch()
        .map(|name| match emu.read_register(name) {
            Ok(value) => format!("{}: {:#x}", name.to_ascii_uppercase(), value),
            Err(_) => format!("{}: ?", name.to_ascii_uppercase()),
        })
        .collect();

    println!("{}", values.join(", "));
}

/// Replay a snapshot for the profile's step budget and report what happened.
///
/// A fault lazy paging cannot resolve is a legitimate outcome of replay and
/// is reported rather than returned as an error.
pub fn replay(profile: &Profile) -> io::Result<()> {
    let snapshot = load_snapshot(profile)?;
    let regions = profile.regions().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "Did not specify a regions directory")
    })?;

    let total_size = snapshot.total_size();

    let mut session = match profile.arch() {
        ArchName::AArch64 => Session::start(
            snapshot,
            ArchName::AArch64,
            Machine::new(),
            RegionFiles::new(regions),
        )?,
    };

    println!(
        "Process: {}, {} ({}), thread {}",
        session.process().pid,
        session.process().executable,
        profile.arch().friendly_name(),
        session.thread().tid
    );
    println!("Total size: {:.2} MiB", total_size as f64 / 1024.0 / 1024.0);

    for name in session.transfer_report().skipped.iter() {
        println!("Skipped register {}", name);
    }

    print_watched(profile, session.emulator());

    let result = session.run_with(profile.steps(), |n, stepped, emu| {
        let pc = emu.read_register("pc").unwrap_or_default();

        match stepped.materialized {
            Some(index) => println!("[{}] status: {}, PC: {:#x} (paged in region {})", n, stepped.status, pc, index),
            None => println!("[{}] status: {}, PC: {:#x}", n, stepped.status, pc),
        }
    });

    match result {
        Ok(summary) => match summary.stop {
            Stop::BudgetExhausted => println!("Stopped after {} steps", summary.steps),
            Stop::Exception(fault) => println!("Stopped on {}", fault),
        },
        Err(memory::Error::UnresolvableFault(fault)) => println!("Program fault: {}", fault),
        Err(e) => {
            print_watched(profile, session.emulator());
            return Err(e.into());
        }
    }

    print_watched(profile, session.emulator());

    println!(
        "Materialized {} of {} regions",
        session.mapper().materialized_count(),
        session.mapper().directory().len()
    );

    Ok(())
}
