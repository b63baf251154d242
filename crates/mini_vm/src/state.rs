use crate::error::{Fault, Result};
use crate::register::{Register, RegisterFile};
use crate::stack::OperandStack;
use crate::Word;

/// Everything one execution owns: the program, the instruction pointer, the
/// running flag, the operand stack and the register file.
#[derive(Debug, Clone)]
pub struct Machine {
    code: Vec<Word>,
    ip: usize,
    running: bool,
    stack: OperandStack,
    registers: RegisterFile,
}

impl Machine {
    pub fn new(code: impl Into<Vec<Word>>) -> Self {
        Self {
            code: code.into(),
            ip: 0,
            running: true,
            stack: OperandStack::new(),
            registers: RegisterFile::new(),
        }
    }

    pub fn code(&self) -> &[Word] {
        &self.code
    }

    pub fn fetch(&self, index: usize) -> Result<Word> {
        self.code
            .get(index)
            .copied()
            .ok_or(Fault::OutOfBoundsFetch { index: index as i64 })
    }

    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn set_ip(&mut self, ip: usize) {
        self.ip = ip;
    }

    pub fn advance(&mut self) {
        self.ip += 1;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn halt(&mut self) {
        self.running = false;
    }

    pub fn push(&mut self, v: Word) -> Result<()> {
        self.stack.push(v)
    }

    pub fn pop(&mut self) -> Result<Word> {
        self.stack.pop()
    }

    pub fn stack(&self) -> &OperandStack {
        &self.stack
    }

    pub fn register(&self, id: Word) -> Result<Word> {
        self.registers.load(id)
    }

    pub fn set_register(&mut self, id: Word, v: Word) -> Result<()> {
        self.registers.store(id, v)
    }

    pub fn get(&self, r: Register) -> Word {
        self.registers.get(r)
    }

    pub fn set(&mut self, r: Register, v: Word) {
        self.registers.set(r, v);
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }
}
