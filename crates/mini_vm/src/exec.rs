use crate::error::{ExecError, Fault};
use crate::state::Machine;
use crate::trace::{Effect, TraceStep};
use crate::{Opcode, Register, RegisterFile, Word};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

pub type Steps = u64;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VmConfig {
    /// Keep a `TraceStep` for every executed instruction.
    #[serde(default)]
    pub trace: bool,
    /// Fault with `StepLimitExceeded` once this many instructions have run.
    #[serde(default)]
    pub max_steps: Option<Steps>,
}

/// How a run that did not fault came to a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum HaltReason {
    /// `HLT` executed.
    Halted,
    /// The word at `ip` is not an opcode.
    UnknownOpcode { opcode: Word, ip: usize },
}

impl HaltReason {
    pub fn is_clean(&self) -> bool {
        matches!(self, HaltReason::Halted)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VmOutcome {
    pub halt: HaltReason,
    pub steps: Steps,
    /// Bottom first.
    pub stack: Vec<Word>,
    pub registers: RegisterFile,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<TraceStep>,
}

enum Flow {
    Next,
    Jump(usize),
}

pub struct Vm {
    cfg: VmConfig,
    machine: Machine,
    steps: Steps,
    status: Option<Result<HaltReason, ExecError>>,
    trace: Vec<TraceStep>,
}

impl Vm {
    pub fn new(cfg: VmConfig, code: impl Into<Vec<Word>>) -> Self {
        Self { cfg, machine: Machine::new(code), steps: 0, status: None, trace: Vec::new() }
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn steps(&self) -> Steps {
        self.steps
    }

    /// `None` while running.
    pub fn status(&self) -> Option<Result<HaltReason, ExecError>> {
        self.status
    }

    pub fn trace(&self) -> &[TraceStep] {
        &self.trace
    }

    /// Runs until `HLT`, an unknown opcode, or a fault.
    pub fn run(&mut self) -> Result<VmOutcome, ExecError> {
        loop {
            if let Some(done) = self.status {
                return done.map(|halt| self.outcome(halt));
            }
            self.step()?;
        }
    }

    /// Executes one instruction. Once halted this is a no-op, and once
    /// faulted it keeps returning the same fault.
    ///
    /// A faulting instruction leaves the stack and registers as they were
    /// before it ran. `ip` rests on its last operand slot.
    pub fn step(&mut self) -> Result<(), ExecError> {
        match self.status {
            Some(Err(e)) => return Err(e),
            Some(Ok(_)) => return Ok(()),
            None => {}
        }
        let at = self.machine.ip();
        if let Some(limit) = self.cfg.max_steps {
            if self.steps >= limit {
                return Err(self.fail(at, None, Fault::StepLimitExceeded { limit }));
            }
        }

        let word = self.machine.fetch(at).map_err(|f| self.fail(at, None, f))?;
        let op = match Opcode::try_from(word) {
            Ok(op) => op,
            Err(opcode) => {
                warn!(ip = at, opcode, "unknown opcode, halting");
                self.machine.halt();
                self.status = Some(Ok(HaltReason::UnknownOpcode { opcode, ip: at }));
                return Ok(());
            }
        };

        let n = op.operand_count();
        let mut operands: [Word; 3] = [0; 3];
        for (i, slot) in operands[..n].iter_mut().enumerate() {
            *slot = self.machine.fetch(at + 1 + i).map_err(|f| self.fail(at, Some(op), f))?;
        }
        // ip rests on the last slot the instruction used
        self.machine.set_ip(at + n);
        self.steps += 1;

        let (flow, effect) = self.exec(at, op, operands).map_err(|f| self.fail(at, Some(op), f))?;
        debug!(ip = at, op = %op, "{effect}");
        if self.cfg.trace {
            self.trace.push(TraceStep { ip: at, opcode: op, operands: operands[..n].to_vec(), effect });
        }
        match flow {
            Flow::Next => self.machine.advance(),
            Flow::Jump(target) => self.machine.set_ip(target),
        }
        if !self.machine.is_running() {
            self.status = Some(Ok(HaltReason::Halted));
        }
        Ok(())
    }

    fn exec(&mut self, at: usize, op: Opcode, ops: [Word; 3]) -> Result<(Flow, Effect), Fault> {
        use Opcode::*;
        let m = &mut self.machine;
        let effect = match op {
            Psh => {
                m.push(ops[0])?;
                Effect::Pushed { value: ops[0] }
            }
            Pop => Effect::Popped { value: m.pop()? },
            Add | Sub | Mul => {
                if m.stack().depth() < 2 {
                    return Err(Fault::StackUnderflow);
                }
                let rhs = m.pop()?;
                let lhs = m.pop()?;
                let result = match op {
                    Add => lhs.wrapping_add(rhs),
                    Sub => lhs.wrapping_sub(rhs),
                    _ => lhs.wrapping_mul(rhs),
                };
                m.push(result)?;
                Effect::Arith { op, lhs, rhs, result }
            }
            Dup => {
                let value = m.stack().peek().ok_or(Fault::StackUnderflow)?;
                m.push(value)?;
                Effect::Duplicated { value }
            }
            Gld => {
                let reg = Register::try_from(ops[0])?;
                let value = m.pop()?;
                m.set(reg, value);
                Effect::Stored { reg, value }
            }
            Gpt => {
                let reg = Register::try_from(ops[0])?;
                let value = m.get(reg);
                m.push(value)?;
                Effect::Loaded { reg, value }
            }
            Mov => {
                let from = Register::try_from(ops[0])?;
                let to = Register::try_from(ops[1])?;
                let value = m.get(from);
                m.set(to, value);
                Effect::Moved { from, to, value }
            }
            Log => {
                let reg = Register::try_from(ops[0])?;
                let value = m.get(reg);
                info!(ip = at, "log: {reg} = {value}");
                Effect::Logged { reg, value }
            }
            Set => {
                let reg = Register::try_from(ops[0])?;
                m.set(reg, ops[1]);
                Effect::Set { reg, value: ops[1] }
            }
            If => {
                let reg = Register::try_from(ops[0])?;
                let (value, expected) = (m.get(reg), ops[1]);
                if value == expected {
                    let to = jump_target(ops[2])?;
                    return Ok((Flow::Jump(to), Effect::Jumped { from: at, to }));
                }
                Effect::NotTaken { reg, value, expected }
            }
            Jmp => {
                let to = jump_target(ops[0])?;
                return Ok((Flow::Jump(to), Effect::Jumped { from: at, to }));
            }
            Hlt => {
                m.halt();
                Effect::Halted
            }
        };
        Ok((Flow::Next, effect))
    }

    fn fail(&mut self, ip: usize, opcode: Option<Opcode>, fault: Fault) -> ExecError {
        let err = ExecError { ip, opcode, fault };
        error!(ip, "{err}");
        self.machine.halt();
        self.status = Some(Err(err));
        err
    }

    fn outcome(&self, halt: HaltReason) -> VmOutcome {
        VmOutcome {
            halt,
            steps: self.steps,
            stack: self.machine.stack().as_slice().to_vec(),
            registers: *self.machine.registers(),
            trace: self.trace.clone(),
        }
    }
}

fn jump_target(target: Word) -> Result<usize, Fault> {
    usize::try_from(target).map_err(|_| Fault::OutOfBoundsFetch { index: i64::from(target) })
}
