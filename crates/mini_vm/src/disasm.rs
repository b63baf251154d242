//! Static listing of an instruction stream.
//!
//! Walks the stream by declared operand counts, so data words that follow an
//! unconditional jump are still decoded as if they were instructions.

use crate::{Opcode, Register, Word};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Value,
    Reg,
    Target,
}

fn slots(op: Opcode) -> &'static [Slot] {
    use Opcode::*;
    match op {
        Psh => &[Slot::Value],
        Gld | Gpt | Log => &[Slot::Reg],
        Mov => &[Slot::Reg, Slot::Reg],
        Set => &[Slot::Reg, Slot::Value],
        If => &[Slot::Reg, Slot::Value, Slot::Target],
        Jmp => &[Slot::Target],
        Pop | Add | Sub | Mul | Dup | Hlt => &[],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Instr { at: usize, op: Opcode, operands: Vec<Word> },
    /// Not an opcode.
    Data { at: usize, value: Word },
    /// Stream ended before all operands were present.
    Truncated { at: usize, op: Opcode, operands: Vec<Word> },
}

impl Line {
    pub fn at(&self) -> usize {
        match self {
            Line::Instr { at, .. } | Line::Data { at, .. } | Line::Truncated { at, .. } => *at,
        }
    }
}

fn write_operands(f: &mut fmt::Formatter<'_>, op: Opcode, operands: &[Word]) -> fmt::Result {
    for (slot, w) in slots(op).iter().zip(operands) {
        match slot {
            Slot::Reg => match Register::try_from(*w) {
                Ok(r) => write!(f, " {r}")?,
                Err(_) => write!(f, " ?{w}")?,
            },
            Slot::Value | Slot::Target => write!(f, " {w}")?,
        }
    }
    Ok(())
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Instr { at, op, operands } => {
                write!(f, "{at:04}: {op}")?;
                write_operands(f, *op, operands)
            }
            Line::Data { at, value } => write!(f, "{at:04}: .word {value}"),
            Line::Truncated { at, op, operands } => {
                write!(f, "{at:04}: {op}")?;
                write_operands(f, *op, operands)?;
                f.write_str(" <truncated>")
            }
        }
    }
}

pub fn disassemble(code: &[Word]) -> Vec<Line> {
    let mut out = Vec::new();
    let mut at = 0;
    while let Some(&word) = code.get(at) {
        let Ok(op) = Opcode::try_from(word) else {
            out.push(Line::Data { at, value: word });
            at += 1;
            continue;
        };
        let end = at + op.width();
        let operands = code[at + 1..end.min(code.len())].to_vec();
        if end > code.len() {
            out.push(Line::Truncated { at, op, operands });
            break;
        }
        out.push(Line::Instr { at, op, operands });
        at = end;
    }
    out
}

/// The whole listing, one instruction per line.
pub fn listing(code: &[Word]) -> String {
    disassemble(code).iter().map(|l| format!("{l}\n")).collect()
}
