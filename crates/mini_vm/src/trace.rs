use crate::{Opcode, Register, Word};
use serde::Serialize;
use std::fmt;

/// What a single instruction did to the machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    Pushed { value: Word },
    Popped { value: Word },
    /// `lhs` was popped second, `rhs` first.
    Arith { op: Opcode, lhs: Word, rhs: Word, result: Word },
    Duplicated { value: Word },
    Stored { reg: Register, value: Word },
    Loaded { reg: Register, value: Word },
    Set { reg: Register, value: Word },
    Moved { from: Register, to: Register, value: Word },
    Jumped { from: usize, to: usize },
    NotTaken { reg: Register, value: Word, expected: Word },
    Logged { reg: Register, value: Word },
    Halted,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Pushed { value } => write!(f, "pushed {value}"),
            Effect::Popped { value } => write!(f, "popped {value}"),
            Effect::Arith { op, lhs, rhs, result } => {
                let sym = match op {
                    Opcode::Add => "+",
                    Opcode::Sub => "-",
                    Opcode::Mul => "*",
                    _ => "?",
                };
                write!(f, "{lhs} {sym} {rhs} = {result}, pushed")
            }
            Effect::Duplicated { value } => write!(f, "duplicated {value}"),
            Effect::Stored { reg, value } => write!(f, "stored {value} into {reg}"),
            Effect::Loaded { reg, value } => write!(f, "pushed {value} from {reg}"),
            Effect::Set { reg, value } => write!(f, "set {reg} to {value}"),
            Effect::Moved { from, to, value } => write!(f, "copied {value} from {from} to {to}"),
            Effect::Jumped { from, to } => write!(f, "jumped from {from} to {to}"),
            Effect::NotTaken { reg, value, expected } => {
                write!(f, "{reg} is {value}, not {expected}; fell through")
            }
            Effect::Logged { reg, value } => write!(f, "log {reg} = {value}"),
            Effect::Halted => f.write_str("halted"),
        }
    }
}

/// One executed instruction, as captured when tracing is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    pub ip: usize,
    pub opcode: Opcode,
    pub operands: Vec<Word>,
    #[serde(flatten)]
    pub effect: Effect,
}

impl TraceStep {
    /// Mnemonic followed by the raw operand words, e.g. `IF 1 0 25`.
    pub fn instruction(&self) -> String {
        let mut text = self.opcode.mnemonic().to_string();
        for w in &self.operands {
            text.push_str(&format!(" {w}"));
        }
        text
    }
}

impl fmt::Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}: {} ; {}", self.ip, self.instruction(), self.effect)
    }
}
