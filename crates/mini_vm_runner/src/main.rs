use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process;
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod commands;

/// Standardized exit codes for the CLI.
/// 0 = clean HLT, 2 = input error, 3 = halted on unknown opcode, 4 = runtime fault, 1 = other.
const EXIT_OK: i32 = 0;
const EXIT_OTHER: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_UNKNOWN_OPCODE: i32 = 3;
const EXIT_FAULT: i32 = 4;

#[derive(Parser)]
#[command(name = "mini-vm", version, about = "mini-vm: run and inspect built-in stack VM programs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a built-in program to completion
    Run {
        /// Built-in program name (see `mini-vm programs`)
        #[arg(long, env = "MINI_VM_PROGRAM", default_value = "factorial")]
        program: String,
        /// Program argument (factorial: the starting value)
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        n: i32,
        /// Print every executed instruction
        #[arg(long)]
        trace: bool,
        /// Fault once this many instructions have run
        #[arg(long, env = "MINI_VM_MAX_STEPS")]
        max_steps: Option<u64>,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the listing of a built-in program
    Disasm {
        #[arg(long, env = "MINI_VM_PROGRAM", default_value = "factorial")]
        program: String,
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        n: i32,
    },
    /// List built-in programs
    Programs,
}

/// Map error strings to exit codes.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    let msg = err.to_string();
    if msg.starts_with("unknown program") {
        EXIT_INPUT
    } else {
        EXIT_OTHER
    }
}

/// Per-instruction VM events are at debug level: `RUST_LOG=mini_vm=debug`.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Run { program, n, trace, max_steps, json } => {
            let opts = commands::RunOpts { program, n, trace, max_steps, json };
            commands::run(&opts).map(|c| match c {
                commands::Completion::Halted => EXIT_OK,
                commands::Completion::UnknownOpcode => EXIT_UNKNOWN_OPCODE,
                commands::Completion::Fault => EXIT_FAULT,
            })
        }
        Commands::Disasm { program, n } => commands::disasm(&program, n).map(|()| EXIT_OK),
        Commands::Programs => {
            commands::programs();
            Ok(EXIT_OK)
        }
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            process::exit(exit_code_for(&e));
        }
    }
}
