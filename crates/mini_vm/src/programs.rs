//! Built-in programs, pre-assembled as word streams.

use crate::Opcode::*;
use crate::Register::*;
use crate::Word;

/// Computes `n!` and leaves it as the only value on the stack.
///
/// First counts down from `n`, stacking `n, n-1, .., 1, 0` while register A
/// counts the pushes, then drops the 0 and multiplies down the stack, using A
/// as the remaining-multiplications counter. B holds the last countdown value
/// for the loop test. The listing ends with `LOG A` so the final counter
/// shows up in the log.
///
/// `n` must be in `1..=255`: with `n <= 0` the countdown never reaches zero,
/// and above 255 the countdown outgrows the stack. Either way the run ends in
/// a stack overflow. Results past `12!` wrap.
#[rustfmt::skip]
pub fn factorial(n: Word) -> Vec<Word> {
    vec![
        Psh.word(), n,                  // 0
        Set.word(), A.word(), 0,        // 2
        // countdown loop
        Dup.word(),                     // 5
        Psh.word(), 1,                  // 6
        Sub.word(),                     // 8
        Gpt.word(), A.word(),           // 9
        Psh.word(), 1,                  // 11
        Add.word(),                     // 13
        Gld.word(), A.word(),           // 14
        Dup.word(),                     // 16
        Gld.word(), B.word(),           // 17
        If.word(), B.word(), 0, 25,     // 19
        Jmp.word(), 5,                  // 23
        // multiply loop
        Pop.word(),                     // 25
        Gpt.word(), A.word(),           // 26
        Psh.word(), 1,                  // 28
        Sub.word(),                     // 30
        Gld.word(), A.word(),           // 31
        If.word(), A.word(), 0, 40,     // 33
        Mul.word(),                     // 37
        Jmp.word(), 26,                 // 38
        Log.word(), A.word(),           // 40
        Hlt.word(),                     // 42
    ]
}

/// A built-in program selectable by name.
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub about: &'static str,
    pub build: fn(Word) -> Vec<Word>,
}

pub const BUILTINS: &[Builtin] = &[Builtin {
    name: "factorial",
    about: "n! by countdown then repeated MUL (default n = 10)",
    build: factorial,
}];

pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disasm::{disassemble, Line};

    #[test]
    fn factorial_layout_matches_jump_targets() {
        let code = factorial(10);
        assert_eq!(code.len(), 43);
        let starts: Vec<usize> = disassemble(&code).iter().map(Line::at).collect();
        for target in [5, 25, 26, 40] {
            assert!(starts.contains(&target), "{target} is not an instruction start");
        }
        assert!(disassemble(&code).iter().all(|l| matches!(l, Line::Instr { .. })));
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(lookup("factorial").map(|b| (b.build)(3)), Some(factorial(3)));
        assert!(lookup("fib").is_none());
    }
}
