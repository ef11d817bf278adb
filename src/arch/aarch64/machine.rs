//! Machine state and the `Emulator` implementation

use crate::arch::aarch64::{exec, Register};
use crate::emu::{self, Emulator, ExceptionKind, Fault, StepResult};
use crate::memory::{Access, ProtectionKind};
use std::cmp::min;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

/// Granularity of backing storage. Protection is byte-granular.
const PAGE_SIZE: u64 = 0x1000;

/// A mapped range of the address space. The start address is the key it is
/// stored under.
struct Mapping {
    end: u64,
    protection: ProtectionKind,
}

/// An AArch64 machine: integer registers plus a sparse address space.
///
/// Storage for a page is only allocated on first write, so mapping a large
/// reserved range is free until something is written into it. Unwritten
/// mapped memory reads as zero.
pub struct Machine {
    /// Mapped ranges, keyed by start address. Never overlapping.
    mappings: BTreeMap<u64, Mapping>,

    /// Page number to page contents.
    pages: HashMap<u64, Box<[u8]>>,

    x: [u64; 31],
    sp: u64,
    pc: u64,
}

impl Default for Machine {
    fn default() -> Self {
        Machine {
            mappings: BTreeMap::new(),
            pages: HashMap::new(),
            x: [0; 31],
            sp: 0,
            pc: 0,
        }
    }
}

impl Machine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_register(&self, reg: Register) -> u64 {
        match reg {
            Register::X(n) => self.x[n as usize],
            Register::Sp => self.sp,
            Register::Pc => self.pc,
        }
    }

    pub fn set_register(&mut self, reg: Register, value: u64) {
        match reg {
            Register::X(n) => self.x[n as usize] = value,
            Register::Sp => self.sp = value,
            Register::Pc => self.pc = value,
        }
    }

    pub fn pc(&self) -> u64 {
        self.pc
    }

    /// Read a register field where encoding 31 is `sp`.
    pub(super) fn reg_or_sp(&self, n: u8) -> u64 {
        match n {
            31 => self.sp,
            n => self.x[n as usize],
        }
    }

    pub(super) fn set_reg_or_sp(&mut self, n: u8, value: u64) {
        match n {
            31 => self.sp = value,
            n => self.x[n as usize] = value,
        }
    }

    /// Read a register field where encoding 31 is the zero register.
    pub(super) fn reg_or_zr(&self, n: u8) -> u64 {
        match n {
            31 => 0,
            n => self.x[n as usize],
        }
    }

    pub(super) fn set_reg_or_zr(&mut self, n: u8, value: u64) {
        if n < 31 {
            self.x[n as usize] = value;
        }
    }

    pub(super) fn set_pc(&mut self, pc: u64) {
        self.pc = pc;
    }

    /// Find the mapping containing an address, with its start.
    fn mapping_at(&self, address: u64) -> Option<(u64, &Mapping)> {
        self.mappings
            .range(..=address)
            .next_back()
            .filter(|(_, m)| address < m.end)
            .map(|(start, m)| (*start, m))
    }

    /// Compute the exclusive end of a range, rejecting empty and wrapping
    /// ranges.
    fn range_end(start: u64, len: u64) -> emu::Result<u64> {
        match start.checked_add(len) {
            Some(end) if len > 0 => Ok(end),
            _ => Err(emu::Error::InvalidRange { start, len }),
        }
    }

    /// Ensure every byte of `[start, end)` is mapped.
    fn check_mapped(&self, start: u64, end: u64) -> emu::Result<()> {
        let mut cursor = start;

        while cursor < end {
            match self.mapping_at(cursor) {
                Some((_, m)) => cursor = m.end,
                None => return Err(emu::Error::Unmapped(cursor)),
            }
        }

        Ok(())
    }

    /// Split the mapping containing `address` so that a mapping starts there.
    fn split_at(&mut self, address: u64) {
        let (start, end, protection) = match self.mapping_at(address) {
            Some((start, m)) if start < address => (start, m.end, m.protection),
            _ => return,
        };

        if let Some(lower) = self.mappings.get_mut(&start) {
            lower.end = address;
        }

        self.mappings.insert(address, Mapping { end, protection });
    }

    /// Check that the guest may perform an access over `len` bytes.
    ///
    /// The fault reports the first offending byte.
    pub(super) fn check_access(&self, address: u64, len: u64, access: Access) -> Result<(), Fault> {
        let (violation, unmapped) = match access {
            Access::Read => (ExceptionKind::ReadViolation, ExceptionKind::ReadUnmapped),
            Access::Write => (ExceptionKind::WriteViolation, ExceptionKind::WriteUnmapped),
            Access::Execute => (ExceptionKind::ExecViolation, ExceptionKind::ExecUnmapped),
        };

        let end = address
            .checked_add(len)
            .ok_or_else(|| Fault::new(unmapped, address))?;
        let mut cursor = address;

        while cursor < end {
            match self.mapping_at(cursor) {
                None => return Err(Fault::new(unmapped, cursor)),
                Some((_, m)) if !m.protection.allows(access) => {
                    return Err(Fault::new(violation, cursor))
                }
                Some((_, m)) => cursor = m.end,
            }
        }

        Ok(())
    }

    /// Copy bytes out of page storage. The range must already be checked.
    pub(super) fn load_bytes(&self, address: u64, buf: &mut [u8]) {
        let mut offset = 0;

        while offset < buf.len() {
            let addr = address.wrapping_add(offset as u64);
            let in_page = (addr % PAGE_SIZE) as usize;
            let chunk = min(PAGE_SIZE as usize - in_page, buf.len() - offset);

            match self.pages.get(&(addr / PAGE_SIZE)) {
                Some(page) => {
                    buf[offset..offset + chunk].copy_from_slice(&page[in_page..in_page + chunk])
                }
                None => buf[offset..offset + chunk].iter_mut().for_each(|b| *b = 0),
            }

            offset += chunk;
        }
    }

    /// Copy bytes into page storage. The range must already be checked.
    pub(super) fn store_bytes(&mut self, address: u64, data: &[u8]) {
        let mut offset = 0;

        while offset < data.len() {
            let addr = address.wrapping_add(offset as u64);
            let in_page = (addr % PAGE_SIZE) as usize;
            let chunk = min(PAGE_SIZE as usize - in_page, data.len() - offset);
            let page = self
                .pages
                .entry(addr / PAGE_SIZE)
                .or_insert_with(|| vec![0; PAGE_SIZE as usize].into_boxed_slice());

            page[in_page..in_page + chunk].copy_from_slice(&data[offset..offset + chunk]);
            offset += chunk;
        }
    }
}

impl Emulator for Machine {
    fn map(&mut self, start: u64, len: u64, protection: ProtectionKind) -> emu::Result<()> {
        let end = Self::range_end(start, len)?;
        let overlaps = self.mapping_at(start).is_some() || self.mappings.range(start..end).next().is_some();

        if overlaps {
            return Err(emu::Error::AlreadyMapped { start, len });
        }

        self.mappings.insert(start, Mapping { end, protection });

        Ok(())
    }

    fn protect(&mut self, start: u64, len: u64, protection: ProtectionKind) -> emu::Result<()> {
        let end = Self::range_end(start, len)?;

        self.check_mapped(start, end)?;
        self.split_at(start);
        self.split_at(end);

        for (_, mapping) in self.mappings.range_mut(start..end) {
            mapping.protection = protection;
        }

        Ok(())
    }

    fn protection_at(&self, address: u64) -> Option<ProtectionKind> {
        self.mapping_at(address).map(|(_, m)| m.protection)
    }

    fn write_memory(&mut self, address: u64, data: &[u8]) -> emu::Result<()> {
        if data.is_empty() {
            return Ok(());
        }

        let end = Self::range_end(address, data.len() as u64)?;

        self.check_mapped(address, end)?;
        self.store_bytes(address, data);

        Ok(())
    }

    fn read_memory(&self, address: u64, buf: &mut [u8]) -> emu::Result<()> {
        if buf.is_empty() {
            return Ok(());
        }

        let end = Self::range_end(address, buf.len() as u64)?;

        self.check_mapped(address, end)?;
        self.load_bytes(address, buf);

        Ok(())
    }

    fn read_register(&self, name: &str) -> emu::Result<u64> {
        let reg = Register::from_str(name).map_err(|_| emu::Error::UnknownRegister(name.to_string()))?;

        Ok(self.get_register(reg))
    }

    fn write_register(&mut self, name: &str, value: u64) -> emu::Result<()> {
        let reg = Register::from_str(name).map_err(|_| emu::Error::UnknownRegister(name.to_string()))?;

        self.set_register(reg, value);

        Ok(())
    }

    fn step(&mut self, count: u64) -> StepResult {
        for _ in 0..count {
            if let Err(fault) = exec::execute(self) {
                return StepResult::Exception(fault);
            }
        }

        StepResult::Completed
    }
}
