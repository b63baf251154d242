use crate::Word;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum Opcode {
    Psh = 0,  // operand: value
    Pop = 1,
    Add = 2,
    Sub = 3,
    Mul = 4,
    // 5 is unassigned and decodes as unknown
    Dup = 6,
    Gld = 7,  // operand: register (pop into it)
    Gpt = 8,  // operand: register (push from it)
    Mov = 9,  // operands: source register, dest register
    Log = 10, // operand: register
    Set = 11, // operands: register, value
    If = 12,  // operands: register, value, target
    Jmp = 13, // operand: target
    Hlt = 14,
}

impl Opcode {
    pub const ALL: [Opcode; 14] = [
        Opcode::Psh,
        Opcode::Pop,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Dup,
        Opcode::Gld,
        Opcode::Gpt,
        Opcode::Mov,
        Opcode::Log,
        Opcode::Set,
        Opcode::If,
        Opcode::Jmp,
        Opcode::Hlt,
    ];

    /// Number of immediate operand slots following the opcode in the
    /// instruction stream.
    pub const fn operand_count(self) -> usize {
        use Opcode::*;
        match self {
            Pop | Add | Sub | Mul | Dup | Hlt => 0,
            Psh | Gld | Gpt | Log | Jmp => 1,
            Mov | Set => 2,
            If => 3,
        }
    }

    /// Total slots taken by the instruction, opcode included.
    pub const fn width(self) -> usize {
        1 + self.operand_count()
    }

    pub const fn mnemonic(self) -> &'static str {
        use Opcode::*;
        match self {
            Psh => "PSH",
            Pop => "POP",
            Add => "ADD",
            Sub => "SUB",
            Mul => "MUL",
            Dup => "DUP",
            Gld => "GLD",
            Gpt => "GPT",
            Mov => "MOV",
            Log => "LOG",
            Set => "SET",
            If => "IF",
            Jmp => "JMP",
            Hlt => "HLT",
        }
    }

    pub const fn word(self) -> Word {
        self as Word
    }
}

impl TryFrom<Word> for Opcode {
    type Error = Word;
    fn try_from(v: Word) -> Result<Self, Self::Error> {
        use Opcode::*;
        Ok(match v {
            0 => Psh,
            1 => Pop,
            2 => Add,
            3 => Sub,
            4 => Mul,
            6 => Dup,
            7 => Gld,
            8 => Gpt,
            9 => Mov,
            10 => Log,
            11 => Set,
            12 => If,
            13 => Jmp,
            14 => Hlt,
            other => return Err(other),
        })
    }
}

impl From<Opcode> for Word {
    fn from(op: Opcode) -> Word {
        op.word()
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
