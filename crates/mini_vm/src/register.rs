use crate::error::{Fault, Result};
use crate::Word;
use serde::{Deserialize, Serialize};

pub const REGISTER_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i32)]
pub enum Register {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
}

impl Register {
    pub const ALL: [Register; REGISTER_COUNT] =
        [Register::A, Register::B, Register::C, Register::D, Register::E, Register::F];

    pub const fn word(self) -> Word {
        self as Word
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<Word> for Register {
    type Error = Fault;
    fn try_from(id: Word) -> Result<Self> {
        usize::try_from(id)
            .ok()
            .and_then(|i| Register::ALL.get(i).copied())
            .ok_or(Fault::InvalidRegister { id })
    }
}

impl From<Register> for Word {
    fn from(r: Register) -> Word {
        r.word()
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Register::A => "A",
            Register::B => "B",
            Register::C => "C",
            Register::D => "D",
            Register::E => "E",
            Register::F => "F",
        };
        f.write_str(name)
    }
}

/// Six general-purpose registers, all zero at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RegisterFile([Word; REGISTER_COUNT]);

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, r: Register) -> Word {
        self.0[r.index()]
    }

    pub fn set(&mut self, r: Register, v: Word) {
        self.0[r.index()] = v;
    }

    /// Raw-id access, as decoded straight from an operand slot.
    pub fn load(&self, id: Word) -> Result<Word> {
        Register::try_from(id).map(|r| self.get(r))
    }

    pub fn store(&mut self, id: Word, v: Word) -> Result<()> {
        let r = Register::try_from(id)?;
        self.set(r, v);
        Ok(())
    }

    pub fn as_array(&self) -> &[Word; REGISTER_COUNT] {
        &self.0
    }
}
