//! Interpreter tests, plus an assembler for building test programs.

use crate::arch::aarch64::{decode, Instruction, Machine, Register};
use crate::emu::{self, Emulator, ExceptionKind, Fault, StepResult};
use crate::memory::ProtectionKind;

/// Encode a single instruction.
pub fn encode(instr: Instruction) -> u32 {
    use Instruction::*;

    let imm12 = |imm: u64| -> u32 {
        if imm & 0xFFF == 0 && imm > 0xFFF {
            (1 << 22) | (((imm >> 12) as u32 & 0xFFF) << 10)
        } else {
            (imm as u32 & 0xFFF) << 10
        }
    };

    match instr {
        Nop => 0xD503_201F,
        Movz { rd, imm } => {
            let hw = (0..4).find(|hw| imm >> (16 * hw) <= 0xFFFF).unwrap_or(3);
            0xD280_0000 | (hw << 21) | (((imm >> (16 * hw)) as u32 & 0xFFFF) << 5) | rd as u32
        }
        AddImm { rd, rn, imm } => 0x9100_0000 | imm12(imm) | (rn as u32) << 5 | rd as u32,
        SubImm { rd, rn, imm } => 0xD100_0000 | imm12(imm) | (rn as u32) << 5 | rd as u32,
        Ldr { rt, rn, offset } => 0xF940_0000 | ((offset / 8) as u32) << 10 | (rn as u32) << 5 | rt as u32,
        Str { rt, rn, offset } => 0xF900_0000 | ((offset / 8) as u32) << 10 | (rn as u32) << 5 | rt as u32,
        Ldrb { rt, rn, offset } => 0x3940_0000 | (offset as u32) << 10 | (rn as u32) << 5 | rt as u32,
        Strb { rt, rn, offset } => 0x3900_0000 | (offset as u32) << 10 | (rn as u32) << 5 | rt as u32,
        B { offset } => 0x1400_0000 | ((offset / 4) as u32 & 0x03FF_FFFF),
        Bl { offset } => 0x9400_0000 | ((offset / 4) as u32 & 0x03FF_FFFF),
        Ret { rn } => 0xD65F_0000 | (rn as u32) << 5,
        Brk { imm } => 0xD420_0000 | (imm as u32) << 5,
    }
}

/// Assemble a program into little-endian machine code.
pub fn assemble(program: &[Instruction]) -> Vec<u8> {
    program
        .iter()
        .flat_map(|i| encode(*i).to_le_bytes().to_vec())
        .collect()
}

/// A machine with one region of code at 0x1000 and one page of data at
/// 0x8000.
fn machine_with(program: &[Instruction]) -> Machine {
    let mut machine = Machine::new();

    machine
        .map(0x1000, 0x1000, ProtectionKind::ExecuteRead)
        .unwrap();
    machine.map(0x8000, 0x1000, ProtectionKind::ReadWrite).unwrap();
    machine.write_memory(0x1000, &assemble(program)).unwrap();
    machine.write_register("pc", 0x1000).unwrap();

    machine
}

#[test]
fn decode_known_words() {
    assert_eq!(decode(0xD503_201F), Some(Instruction::Nop));
    assert_eq!(decode(0xD65F_03C0), Some(Instruction::Ret { rn: 30 }));
    assert_eq!(
        decode(0xD280_00A8),
        Some(Instruction::Movz { rd: 8, imm: 5 })
    );
    assert_eq!(
        decode(0x9100_0508),
        Some(Instruction::AddImm { rd: 8, rn: 8, imm: 1 })
    );
    assert_eq!(decode(0x17FF_FFFF), Some(Instruction::B { offset: -4 }));
    assert_eq!(decode(0x0000_0000), None);
}

#[test]
fn encode_decode_agree() {
    let program = [
        Instruction::Movz { rd: 3, imm: 0x1234_0000 },
        Instruction::SubImm { rd: 31, rn: 31, imm: 0x10 },
        Instruction::Ldr { rt: 1, rn: 2, offset: 0x18 },
        Instruction::Strb { rt: 4, rn: 5, offset: 3 },
        Instruction::Bl { offset: -0x100 },
        Instruction::Brk { imm: 0xF000 },
    ];

    for instr in program.iter() {
        assert_eq!(decode(encode(*instr)), Some(*instr));
    }
}

#[test]
fn register_names() {
    assert_eq!("x0".parse(), Ok(Register::X(0)));
    assert_eq!("X30".parse(), Ok(Register::X(30)));
    assert_eq!("sp".parse(), Ok(Register::Sp));
    assert_eq!("pc".parse(), Ok(Register::Pc));
    assert_eq!("x31".parse::<Register>(), Err(()));
    assert_eq!("x08".parse::<Register>(), Err(()));
    assert_eq!("fp".parse::<Register>(), Err(()));
    assert_eq!("cpsr".parse::<Register>(), Err(()));
}

#[test]
fn unknown_register_is_reported() {
    let mut machine = Machine::new();

    assert_eq!(
        machine.write_register("lr", 1),
        Err(emu::Error::UnknownRegister("lr".to_string()))
    );
}

#[test]
fn arithmetic_and_branches() {
    let mut machine = machine_with(&[
        Instruction::Movz { rd: 8, imm: 5 },
        Instruction::AddImm { rd: 8, rn: 8, imm: 1 },
        Instruction::Bl { offset: 8 },
        Instruction::Nop,
        Instruction::SubImm { rd: 8, rn: 8, imm: 2 },
        Instruction::Ret { rn: 30 },
    ]);

    assert_eq!(machine.step(4), StepResult::Completed);
    assert_eq!(machine.read_register("x8").unwrap(), 4);
    assert_eq!(machine.read_register("x30").unwrap(), 0x100C);
    assert_eq!(machine.read_register("pc").unwrap(), 0x1014);

    assert_eq!(machine.step(1), StepResult::Completed);
    assert_eq!(machine.read_register("pc").unwrap(), 0x100C);
}

#[test]
fn loads_and_stores() {
    let mut machine = machine_with(&[
        Instruction::Movz { rd: 9, imm: 0x8000 },
        Instruction::Movz { rd: 1, imm: 0xBEEF },
        Instruction::Str { rt: 1, rn: 9, offset: 0x10 },
        Instruction::Ldr { rt: 2, rn: 9, offset: 0x10 },
        Instruction::Ldrb { rt: 3, rn: 9, offset: 0x11 },
    ]);

    assert_eq!(machine.step(5), StepResult::Completed);
    assert_eq!(machine.read_register("x2").unwrap(), 0xBEEF);
    assert_eq!(machine.read_register("x3").unwrap(), 0xBE);

    let mut buf = [0; 2];
    machine.read_memory(0x8010, &mut buf).unwrap();
    assert_eq!(buf, [0xEF, 0xBE]);
}

#[test]
fn faults_leave_state_untouched() {
    let mut machine = machine_with(&[
        Instruction::Movz { rd: 9, imm: 0x1000 },
        Instruction::Str { rt: 9, rn: 9, offset: 0 },
    ]);

    assert_eq!(machine.step(1), StepResult::Completed);
    assert_eq!(
        machine.step(1),
        StepResult::Exception(Fault::new(ExceptionKind::WriteViolation, 0x1000))
    );
    assert_eq!(machine.read_register("pc").unwrap(), 0x1004);

    machine.write_register("pc", 0x8000).unwrap();
    assert_eq!(
        machine.step(1),
        StepResult::Exception(Fault::new(ExceptionKind::ExecViolation, 0x8000))
    );

    machine.write_register("pc", 0x5000).unwrap();
    assert_eq!(
        machine.step(1),
        StepResult::Exception(Fault::new(ExceptionKind::ExecUnmapped, 0x5000))
    );
    assert_eq!(machine.read_register("pc").unwrap(), 0x5000);
}

#[test]
fn breakpoint_and_invalid_instruction() {
    let mut machine = machine_with(&[Instruction::Brk { imm: 0 }]);

    assert_eq!(
        machine.step(1),
        StepResult::Exception(Fault::new(ExceptionKind::Breakpoint, 0x1000))
    );

    machine.write_register("pc", 0x1004).unwrap();
    assert_eq!(
        machine.step(1),
        StepResult::Exception(Fault::new(ExceptionKind::InvalidInstruction, 0x1004))
    );
}

#[test]
fn protect_splits_mappings() {
    let mut machine = Machine::new();

    machine.map(0x1000, 0x3000, ProtectionKind::NoAccess).unwrap();
    machine
        .protect(0x2000, 0x1000, ProtectionKind::ReadOnly)
        .unwrap();

    assert_eq!(machine.protection_at(0x1FFF), Some(ProtectionKind::NoAccess));
    assert_eq!(machine.protection_at(0x2000), Some(ProtectionKind::ReadOnly));
    assert_eq!(machine.protection_at(0x2FFF), Some(ProtectionKind::ReadOnly));
    assert_eq!(machine.protection_at(0x3000), Some(ProtectionKind::NoAccess));
    assert_eq!(machine.protection_at(0x4000), None);
}

#[test]
fn mapping_errors() {
    let mut machine = Machine::new();

    machine.map(0x1000, 0x1000, ProtectionKind::NoAccess).unwrap();

    assert_eq!(
        machine.map(0x1800, 0x1000, ProtectionKind::NoAccess),
        Err(emu::Error::AlreadyMapped { start: 0x1800, len: 0x1000 })
    );
    assert_eq!(
        machine.map(0x0800, 0x1000, ProtectionKind::NoAccess),
        Err(emu::Error::AlreadyMapped { start: 0x0800, len: 0x1000 })
    );
    assert_eq!(
        machine.map(0x3000, 0, ProtectionKind::NoAccess),
        Err(emu::Error::InvalidRange { start: 0x3000, len: 0 })
    );
    assert_eq!(
        machine.protect(0x1000, 0x2000, ProtectionKind::ReadOnly),
        Err(emu::Error::Unmapped(0x2000))
    );
    assert_eq!(
        machine.write_memory(0x1FFF, &[1, 2]),
        Err(emu::Error::Unmapped(0x2000))
    );
}

#[test]
fn host_writes_ignore_protection() {
    let mut machine = Machine::new();
    let mut buf = [0; 4];

    machine.map(0x1000, 0x2000, ProtectionKind::NoAccess).unwrap();
    machine.write_memory(0x1FFE, &[1, 2, 3, 4]).unwrap();
    machine.read_memory(0x1FFE, &mut buf).unwrap();

    assert_eq!(buf, [1, 2, 3, 4]);
}
