//! Types used in modeling AArch64

use std::{fmt, str};

/// Enumeration of the registers the interpreter models.
///
/// `X(31)` is not a register: encodings 31 mean either `sp` or the zero
/// register depending on the instruction, and are resolved before a
/// `Register` is ever constructed.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Register {
    X(u8),
    Sp,
    Pc,
}

impl Register {
    pub fn from_instr(reg: u32) -> Option<Register> {
        if reg < 31 {
            Some(Register::X(reg as u8))
        } else {
            None
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::X(n) => write!(f, "x{}", n),
            Register::Sp => write!(f, "sp"),
            Register::Pc => write!(f, "pc"),
        }
    }
}

impl str::FromStr for Register {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_ref() {
            "sp" => Ok(Register::Sp),
            "pc" => Ok(Register::Pc),
            name => {
                let num = name.strip_prefix('x').ok_or(())?;

                // Reject "x", "x007" and friends along with out of range
                // numbers.
                if num.is_empty() || (num.len() > 1 && num.starts_with('0')) {
                    return Err(());
                }

                match num.parse::<u32>() {
                    Ok(n) => Register::from_instr(n).ok_or(()),
                    Err(_) => Err(()),
                }
            }
        }
    }
}
