//! Instruction execution

use crate::arch::aarch64::{decode, Instruction, Machine};
use crate::emu::{ExceptionKind, Fault};
use crate::memory::Access;
use log::debug;

/// Execute the instruction at the current program counter.
///
/// All access checks happen before any state is modified, so a faulting
/// instruction leaves the machine exactly as it was.
pub fn execute(machine: &mut Machine) -> Result<(), Fault> {
    use Instruction::*;

    let pc = machine.pc();
    machine.check_access(pc, 4, Access::Execute)?;

    let mut word = [0; 4];
    machine.load_bytes(pc, &mut word);

    let instr = decode(u32::from_le_bytes(word))
        .ok_or_else(|| Fault::new(ExceptionKind::InvalidInstruction, pc))?;
    let mut next_pc = pc.wrapping_add(4);

    debug!("{:#x}: {}", pc, instr);

    match instr {
        Nop => {}
        Movz { rd, imm } => machine.set_reg_or_zr(rd, imm),
        AddImm { rd, rn, imm } => {
            let value = machine.reg_or_sp(rn).wrapping_add(imm);
            machine.set_reg_or_sp(rd, value);
        }
        SubImm { rd, rn, imm } => {
            let value = machine.reg_or_sp(rn).wrapping_sub(imm);
            machine.set_reg_or_sp(rd, value);
        }
        Ldr { rt, rn, offset } => {
            let address = machine.reg_or_sp(rn).wrapping_add(offset);
            machine.check_access(address, 8, Access::Read)?;

            let mut data = [0; 8];
            machine.load_bytes(address, &mut data);
            machine.set_reg_or_zr(rt, u64::from_le_bytes(data));
        }
        Str { rt, rn, offset } => {
            let address = machine.reg_or_sp(rn).wrapping_add(offset);
            machine.check_access(address, 8, Access::Write)?;

            let data = machine.reg_or_zr(rt).to_le_bytes();
            machine.store_bytes(address, &data);
        }
        Ldrb { rt, rn, offset } => {
            let address = machine.reg_or_sp(rn).wrapping_add(offset);
            machine.check_access(address, 1, Access::Read)?;

            let mut data = [0; 1];
            machine.load_bytes(address, &mut data);
            machine.set_reg_or_zr(rt, data[0] as u64);
        }
        Strb { rt, rn, offset } => {
            let address = machine.reg_or_sp(rn).wrapping_add(offset);
            machine.check_access(address, 1, Access::Write)?;

            let data = [machine.reg_or_zr(rt) as u8];
            machine.store_bytes(address, &data);
        }
        B { offset } => next_pc = pc.wrapping_add(offset as u64),
        Bl { offset } => {
            machine.set_reg_or_zr(30, pc.wrapping_add(4));
            next_pc = pc.wrapping_add(offset as u64);
        }
        Ret { rn } => next_pc = machine.reg_or_zr(rn),
        Brk { .. } => return Err(Fault::new(ExceptionKind::Breakpoint, pc)),
    }

    machine.set_pc(next_pc);

    Ok(())
}
