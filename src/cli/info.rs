//! Snapshot summary command

use crate::cli::common::load_snapshot;
use crate::project::Profile;
use std::io;

/// Display a snapshot's identity, memory layout, and registers.
pub fn info(profile: &Profile) -> io::Result<()> {
    let snapshot = load_snapshot(profile)?;
    let process = snapshot.process();
    let thread = snapshot.thread();

    println!("Process: {}, {} (parent {})", process.pid, process.executable, process.ppid);
    println!(
        "Thread: {} {}",
        thread.tid,
        thread.name.as_deref().unwrap_or("<unnamed>")
    );

    for region in snapshot.iter_regions() {
        println!("Mapping {}", region);

        if let Some(pretty) = region.as_pretty() {
            println!("    {}", pretty);
        }
    }

    println!(
        "Total size: {:.2} MiB",
        snapshot.total_size() as f64 / 1024.0 / 1024.0
    );

    for (name, value) in snapshot.registers().iter() {
        println!("{} = {:#x}", name, value);
    }

    Ok(())
}
