//! Structured step results

use std::fmt;

/// The kind of exception an emulator stopped on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExceptionKind {
    /// Data read from a mapped range without read permission.
    ReadViolation,

    /// Data write to a mapped range without write permission.
    WriteViolation,

    /// Instruction fetch from a mapped range without execute permission.
    ExecViolation,

    /// Data read from an address with no mapping at all.
    ReadUnmapped,

    /// Data write to an address with no mapping at all.
    WriteUnmapped,

    /// Instruction fetch from an address with no mapping at all.
    ExecUnmapped,

    /// The fetched word does not decode to a supported instruction.
    InvalidInstruction,

    /// The program executed a breakpoint instruction.
    Breakpoint,
}

impl ExceptionKind {
    /// Determine if this exception was caused by a memory access, and thus
    /// carries a faulting address that lazy paging may be able to resolve.
    pub fn is_access_fault(self) -> bool {
        use ExceptionKind::*;

        match self {
            ReadViolation | WriteViolation | ExecViolation => true,
            ReadUnmapped | WriteUnmapped | ExecUnmapped => true,
            InvalidInstruction | Breakpoint => false,
        }
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ExceptionKind::*;

        match self {
            ReadViolation => write!(f, "read violation"),
            WriteViolation => write!(f, "write violation"),
            ExecViolation => write!(f, "execute violation"),
            ReadUnmapped => write!(f, "read of unmapped memory"),
            WriteUnmapped => write!(f, "write to unmapped memory"),
            ExecUnmapped => write!(f, "execution of unmapped memory"),
            InvalidInstruction => write!(f, "invalid instruction"),
            Breakpoint => write!(f, "breakpoint"),
        }
    }
}

/// An exception reported by the emulator.
///
/// For access faults `address` is the faulting data or fetch address; for
/// other exceptions it is the address of the instruction that raised it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fault {
    pub kind: ExceptionKind,
    pub address: u64,
}

impl Fault {
    pub fn new(kind: ExceptionKind, address: u64) -> Self {
        Fault { kind, address }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {:#x}", self.kind, self.address)
    }
}

/// The outcome of asking the emulator to step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepResult {
    /// All requested instructions retired.
    Completed,

    /// Execution stopped on an exception.
    Exception(Fault),
}

impl StepResult {
    /// Extract the fault if this result is a memory access fault.
    pub fn access_fault(&self) -> Option<Fault> {
        match self {
            StepResult::Exception(fault) if fault.kind.is_access_fault() => Some(*fault),
            _ => None,
        }
    }
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepResult::Completed => write!(f, "completed"),
            StepResult::Exception(fault) => write!(f, "{}", fault),
        }
    }
}
