//! Instruction decoding for the supported AArch64 subset

use std::fmt;

/// A decoded instruction.
///
/// Register fields hold raw 5-bit encodings. Whether 31 means `sp` or the
/// zero register depends on the instruction and is resolved at execution.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    Nop,

    /// Move wide with zero. `imm` is already shifted into place.
    Movz { rd: u8, imm: u64 },

    AddImm { rd: u8, rn: u8, imm: u64 },
    SubImm { rd: u8, rn: u8, imm: u64 },

    /// 64-bit load, unsigned scaled offset. `offset` is in bytes.
    Ldr { rt: u8, rn: u8, offset: u64 },

    /// 64-bit store, unsigned scaled offset. `offset` is in bytes.
    Str { rt: u8, rn: u8, offset: u64 },

    Ldrb { rt: u8, rn: u8, offset: u64 },
    Strb { rt: u8, rn: u8, offset: u64 },

    /// PC-relative branch. `offset` is in bytes.
    B { offset: i64 },
    Bl { offset: i64 },

    Ret { rn: u8 },
    Brk { imm: u16 },
}

fn field(word: u32, shift: u32, bits: u32) -> u32 {
    (word >> shift) & ((1 << bits) - 1)
}

/// Sign-extend the low 26 bits of a branch immediate and scale to bytes.
fn branch_offset(word: u32) -> i64 {
    let imm26 = field(word, 0, 26) as i64;

    ((imm26 << 38) >> 38) * 4
}

/// Decode a single instruction word.
///
/// Yields `None` for anything outside the supported subset.
pub fn decode(word: u32) -> Option<Instruction> {
    use Instruction::*;

    let rd = field(word, 0, 5) as u8;
    let rn = field(word, 5, 5) as u8;

    if word == 0xD503_201F {
        return Some(Nop);
    }

    if word & 0xFFFF_FC1F == 0xD65F_0000 {
        return Some(Ret { rn });
    }

    if word & 0xFFE0_001F == 0xD420_0000 {
        return Some(Brk {
            imm: field(word, 5, 16) as u16,
        });
    }

    match word & 0xFC00_0000 {
        0x1400_0000 => return Some(B { offset: branch_offset(word) }),
        0x9400_0000 => return Some(Bl { offset: branch_offset(word) }),
        _ => {}
    }

    match word & 0xFF80_0000 {
        0xD280_0000 | 0x5280_0000 => {
            let hw = field(word, 21, 2);
            let is_32bit = word & 0x8000_0000 == 0;

            if is_32bit && hw > 1 {
                return None;
            }

            return Some(Movz {
                rd,
                imm: (field(word, 5, 16) as u64) << (16 * hw),
            });
        }
        0x9100_0000 => {
            let imm = (field(word, 10, 12) as u64) << (12 * field(word, 22, 1));

            return Some(AddImm { rd, rn, imm });
        }
        0xD100_0000 => {
            let imm = (field(word, 10, 12) as u64) << (12 * field(word, 22, 1));

            return Some(SubImm { rd, rn, imm });
        }
        _ => {}
    }

    let imm12 = field(word, 10, 12) as u64;

    match word & 0xFFC0_0000 {
        0xF940_0000 => Some(Ldr {
            rt: rd,
            rn,
            offset: imm12 * 8,
        }),
        0xF900_0000 => Some(Str {
            rt: rd,
            rn,
            offset: imm12 * 8,
        }),
        0x3940_0000 => Some(Ldrb {
            rt: rd,
            rn,
            offset: imm12,
        }),
        0x3900_0000 => Some(Strb {
            rt: rd,
            rn,
            offset: imm12,
        }),
        _ => None,
    }
}

/// Name a register field where 31 means `sp`.
struct SpOr(u8);

impl fmt::Display for SpOr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            31 => write!(f, "sp"),
            n => write!(f, "x{}", n),
        }
    }
}

/// Name a register field where 31 means the zero register.
struct ZrOr(u8);

impl fmt::Display for ZrOr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            31 => write!(f, "xzr"),
            n => write!(f, "x{}", n),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Nop => write!(f, "nop"),
            Movz { rd, imm } => write!(f, "mov {}, #{:#x}", ZrOr(rd), imm),
            AddImm { rd, rn, imm } => write!(f, "add {}, {}, #{:#x}", SpOr(rd), SpOr(rn), imm),
            SubImm { rd, rn, imm } => write!(f, "sub {}, {}, #{:#x}", SpOr(rd), SpOr(rn), imm),
            Ldr { rt, rn, offset } => write!(f, "ldr {}, [{}, #{:#x}]", ZrOr(rt), SpOr(rn), offset),
            Str { rt, rn, offset } => write!(f, "str {}, [{}, #{:#x}]", ZrOr(rt), SpOr(rn), offset),
            Ldrb { rt, rn, offset } => {
                write!(f, "ldrb w{}, [{}, #{:#x}]", rt, SpOr(rn), offset)
            }
            Strb { rt, rn, offset } => {
                write!(f, "strb w{}, [{}, #{:#x}]", rt, SpOr(rn), offset)
            }
            B { offset } => write!(f, "b #{}", offset),
            Bl { offset } => write!(f, "bl #{}", offset),
            Ret { rn: 30 } => write!(f, "ret"),
            Ret { rn } => write!(f, "ret {}", ZrOr(rn)),
            Brk { imm } => write!(f, "brk #{:#x}", imm),
        }
    }
}
