use anyhow::{anyhow, Result};
use colored::Colorize;
use mini_vm::disasm::{disassemble, Line};
use mini_vm::programs::{self, Builtin};
use mini_vm::{ExecError, HaltReason, Register, TraceStep, Vm, VmConfig, VmOutcome, Word};
use tracing::info;

pub struct RunOpts {
    pub program: String,
    pub n: Word,
    pub trace: bool,
    pub max_steps: Option<u64>,
    pub json: bool,
}

/// How a run ended, as far as the exit code is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Halted,
    UnknownOpcode,
    Fault,
}

fn resolve(name: &str) -> Result<&'static Builtin> {
    programs::lookup(name).ok_or_else(|| {
        let known: Vec<&str> = programs::BUILTINS.iter().map(|b| b.name).collect();
        anyhow!("unknown program '{name}' (known: {})", known.join(", "))
    })
}

// ── run ─────────────────────────────────────────────────────────

pub fn run(opts: &RunOpts) -> Result<Completion> {
    let builtin = resolve(&opts.program)?;
    let code = (builtin.build)(opts.n);
    info!(program = builtin.name, n = opts.n, words = code.len(), "running");

    if opts.trace && !opts.json {
        let words: Vec<String> = code.iter().map(|w| w.to_string()).collect();
        println!("{} {{ {} }}", "Program:".dimmed(), words.join(", ").dimmed());
    }

    let cfg = VmConfig { trace: opts.trace, max_steps: opts.max_steps };
    let mut vm = Vm::new(cfg, code);
    let result = vm.run();

    if opts.json {
        let body = match &result {
            Ok(out) => serde_json::to_value(out)?,
            Err(e) => serde_json::json!({
                "fault": e,
                "steps": vm.steps(),
                "stack": vm.machine().stack().as_slice(),
                "registers": vm.machine().registers(),
                "trace": vm.trace(),
            }),
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        for step in vm.trace() {
            print_step(step);
        }
        match &result {
            Ok(out) => print_outcome(out),
            Err(e) => print_fault(e, &vm),
        }
    }

    Ok(match result {
        Ok(VmOutcome { halt: HaltReason::Halted, .. }) => Completion::Halted,
        Ok(_) => Completion::UnknownOpcode,
        Err(_) => Completion::Fault,
    })
}

fn print_step(step: &TraceStep) {
    println!(
        "  {} {:<14} {}",
        format!("{:04}", step.ip).dimmed(),
        step.instruction().cyan(),
        step.effect.to_string().dimmed()
    );
}

fn registers_line(regs: &mini_vm::RegisterFile) -> String {
    Register::ALL
        .iter()
        .map(|r| format!("{r}={}", regs.get(*r)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn stack_line(stack: &[Word]) -> String {
    let items: Vec<String> = stack.iter().map(|w| w.to_string()).collect();
    format!("[{}]", items.join(", "))
}

fn print_outcome(out: &VmOutcome) {
    let badge = match out.halt {
        HaltReason::Halted => "HALTED".green().bold(),
        HaltReason::UnknownOpcode { opcode, ip } => {
            format!("UNKNOWN OPCODE {opcode} at {ip}").yellow().bold()
        }
    };
    println!("{} {}", "Status:   ".dimmed(), badge);
    println!("{} {}", "Steps:    ".dimmed(), out.steps);
    println!("{} {}", "Stack:    ".dimmed(), stack_line(&out.stack).cyan());
    println!("{} {}", "Registers:".dimmed(), registers_line(&out.registers));
}

fn print_fault(e: &ExecError, vm: &Vm) {
    println!("{} {}", "Status:   ".dimmed(), "FAULT".red().bold());
    println!("{} {}", "Fault:    ".dimmed(), e.to_string().red());
    println!("{} {}", "Steps:    ".dimmed(), vm.steps());
    println!("{} {}", "Stack:    ".dimmed(), stack_line(vm.machine().stack().as_slice()));
    println!("{} {}", "Registers:".dimmed(), registers_line(vm.machine().registers()));
}

// ── disasm ──────────────────────────────────────────────────────

pub fn disasm(program: &str, n: Word) -> Result<()> {
    let builtin = resolve(program)?;
    let code = (builtin.build)(n);
    println!("{} {} (n = {n}, {} words)", "Program:".dimmed(), builtin.name.bold(), code.len());
    for line in disassemble(&code) {
        let text = line.to_string();
        match line {
            Line::Instr { .. } => println!("  {text}"),
            Line::Data { .. } => println!("  {}", text.yellow()),
            Line::Truncated { .. } => println!("  {}", text.red()),
        }
    }
    Ok(())
}

// ── programs ────────────────────────────────────────────────────

pub fn programs() {
    for b in programs::BUILTINS {
        println!("{}  {}", b.name.cyan().bold(), b.about.dimmed());
    }
}
