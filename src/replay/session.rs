//! Replay sessions

use crate::arch::ArchName;
use crate::emu::{Emulator, Fault, StepResult};
use crate::memory::{BackingStore, LazyMapper, RegionDirectory, Result};
use crate::reg::{self, RegisterMap, TransferReport};
use crate::snapshot::{ProcessInfo, Snapshot, ThreadInfo};
use log::{debug, info};

/// The result of one driver step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Stepped {
    /// What the emulator reported for the last step it took.
    pub status: StepResult,

    /// The region materialized to service a fault, if any. When this is set,
    /// `status` is the result of retrying the faulting instruction.
    pub materialized: Option<usize>,
}

/// Why a run stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stop {
    /// The step budget ran out.
    BudgetExhausted,

    /// The program raised an exception that is not an access fault, such as
    /// a breakpoint.
    Exception(Fault),
}

/// Summary of a bounded run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of driver steps taken.
    pub steps: u64,

    /// Regions materialized during the run, in order.
    pub materialized: Vec<usize>,

    pub stop: Stop,
}

/// A single replay of a snapshot.
pub struct Session<E, B>
where
    E: Emulator,
    B: BackingStore,
{
    process: ProcessInfo,
    thread: ThreadInfo,
    mapper: LazyMapper,
    transfer: TransferReport,
    emu: E,
    store: B,
}

impl<E, B> Session<E, B>
where
    E: Emulator,
    B: BackingStore,
{
    /// Prepare an emulator to replay a snapshot.
    ///
    /// Every region is stubbed out and the captured registers are written.
    /// No backing content is read until execution touches a region.
    pub fn start(snapshot: Snapshot, arch: ArchName, mut emu: E, store: B) -> Result<Self> {
        let process = snapshot.process().clone();
        let thread = snapshot.thread().clone();
        let (registers, regions) = snapshot.into_parts();

        info!(
            "Replaying process {} ({}) thread {} on {}",
            process.pid,
            process.executable,
            thread.tid,
            arch.friendly_name()
        );

        let mapper = LazyMapper::install(RegionDirectory::new(regions), &mut emu)?;
        let transfer = reg::transfer(&registers, &RegisterMap::for_arch(arch), &mut emu)?;

        Ok(Session {
            process,
            thread,
            mapper,
            transfer,
            emu,
            store,
        })
    }

    pub fn process(&self) -> &ProcessInfo {
        &self.process
    }

    pub fn thread(&self) -> &ThreadInfo {
        &self.thread
    }

    pub fn mapper(&self) -> &LazyMapper {
        &self.mapper
    }

    pub fn transfer_report(&self) -> &TransferReport {
        &self.transfer
    }

    pub fn emulator(&self) -> &E {
        &self.emu
    }

    pub fn emulator_mut(&mut self) -> &mut E {
        &mut self.emu
    }

    /// Execute one instruction, materializing memory as needed.
    ///
    /// An access fault on a stub region materializes it and retries the
    /// instruction once; whatever the retry reports is returned as-is. An
    /// access fault lazy paging cannot explain is returned as
    /// `Error::UnresolvableFault` without retrying. Other exceptions are
    /// returned unchanged.
    pub fn step(&mut self) -> Result<Stepped> {
        let status = self.emu.step(1);
        let fault = match status.access_fault() {
            Some(fault) => fault,
            None => {
                return Ok(Stepped {
                    status,
                    materialized: None,
                })
            }
        };

        debug!("Access fault: {}", fault);

        let index = self.mapper.handle_fault(fault, &mut self.emu, &self.store)?;
        let status = self.emu.step(1);

        Ok(Stepped {
            status,
            materialized: Some(index),
        })
    }

    /// Step until the budget runs out or the program stops on a
    /// non-access exception.
    pub fn run(&mut self, budget: u64) -> Result<RunSummary> {
        self.run_with(budget, |_, _, _| {})
    }

    /// As `run`, reporting every step to an observer along with the
    /// emulator state after it.
    pub fn run_with<F>(&mut self, budget: u64, mut observe: F) -> Result<RunSummary>
    where
        F: FnMut(u64, &Stepped, &E),
    {
        let mut summary = RunSummary {
            steps: 0,
            materialized: Vec::new(),
            stop: Stop::BudgetExhausted,
        };

        while summary.steps < budget {
            let stepped = self.step()?;

            summary.steps += 1;
            observe(summary.steps, &stepped, &self.emu);

            if let Some(index) = stepped.materialized {
                summary.materialized.push(index);
            }

            match stepped.status {
                StepResult::Completed => {}

                // The retry ran into another stub region; the next step
                // will page it in.
                StepResult::Exception(fault)
                    if fault.kind.is_access_fault() && stepped.materialized.is_some() => {}

                StepResult::Exception(fault) => {
                    summary.stop = Stop::Exception(fault);
                    break;
                }
            }
        }

        Ok(summary)
    }
}
