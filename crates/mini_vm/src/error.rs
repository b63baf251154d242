use crate::{Opcode, Word};
use serde::Serialize;
use thiserror::Error;

/// A runtime fault raised by the machine state or an opcode handler.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fault {
    #[error("stack overflow")]
    StackOverflow,
    #[error("stack underflow")]
    StackUnderflow,
    #[error("invalid register {id}")]
    InvalidRegister { id: Word },
    #[error("fetch out of bounds at slot {index}")]
    OutOfBoundsFetch { index: i64 },
    #[error("step limit of {limit} exhausted")]
    StepLimitExceeded { limit: u64 },
}

/// A fault pinned to the instruction that raised it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[error("{fault} at ip {ip}{}", .opcode.map(|op| format!(" ({op})")).unwrap_or_default())]
pub struct ExecError {
    pub ip: usize,
    /// `None` when the fault happened before the opcode could be decoded.
    pub opcode: Option<Opcode>,
    pub fault: Fault,
}

pub type Result<T> = std::result::Result<T, Fault>;
