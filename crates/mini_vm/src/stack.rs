use crate::error::{Fault, Result};
use crate::Word;

pub const STACK_SIZE: usize = 256;

/// Fixed-capacity operand stack. `sp` is the index of the top slot, -1 when empty.
#[derive(Debug, Clone)]
pub struct OperandStack {
    slots: [Word; STACK_SIZE],
    sp: isize,
}

impl Default for OperandStack {
    fn default() -> Self {
        Self { slots: [0; STACK_SIZE], sp: -1 }
    }
}

impl OperandStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, v: Word) -> Result<()> {
        let next = self.sp + 1;
        if next as usize >= STACK_SIZE {
            return Err(Fault::StackOverflow);
        }
        self.sp = next;
        self.slots[next as usize] = v;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Word> {
        if self.sp < 0 {
            return Err(Fault::StackUnderflow);
        }
        let v = self.slots[self.sp as usize];
        self.sp -= 1;
        Ok(v)
    }

    pub fn peek(&self) -> Option<Word> {
        self.as_slice().last().copied()
    }

    pub fn sp(&self) -> isize {
        self.sp
    }

    pub fn depth(&self) -> usize {
        (self.sp + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.sp < 0
    }

    /// Live values, bottom first.
    pub fn as_slice(&self) -> &[Word] {
        &self.slots[..self.depth()]
    }
}
