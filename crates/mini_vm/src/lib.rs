//! mini-vm - small deterministic stack VM
//!
//! - Word-coded instruction stream: opcodes interleaved with immediate operands
//! - 256-slot operand stack, six registers (A-F)
//! - Every stack, register and fetch access is checked; faults halt the machine
//! - Optional per-instruction trace and step limit

pub mod disasm;
pub mod error;
pub mod exec;
pub mod opcode;
pub mod programs;
pub mod register;
pub mod stack;
pub mod state;
pub mod trace;

/// The machine integer.
pub type Word = i32;

pub use disasm::{disassemble, listing};
pub use error::{ExecError, Fault};
pub use exec::{HaltReason, Steps, Vm, VmConfig, VmOutcome};
pub use opcode::Opcode;
pub use register::{Register, RegisterFile, REGISTER_COUNT};
pub use stack::{OperandStack, STACK_SIZE};
pub use state::Machine;
pub use trace::{Effect, TraceStep};
