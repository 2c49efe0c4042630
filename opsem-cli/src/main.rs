//! opsem CLI: run the instruction fixture catalog, assembled blocks and
//! single instructions.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Input/assembly error or failing fixtures
//! - 3: Runtime error

use std::path::PathBuf;
use std::process;

use clap::Parser;
use opsem_cli::{commands, logger};
use opsem_vm::MAX_STACK_DEPTH;

#[derive(Parser, Debug)]
#[command(name = "opsem", version, about = "JVM instruction semantics workbench")]
struct Args {
    /// Turn on verbose logging. Repeat to increase verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Selects the subcommand.
    #[command(subcommand)]
    action: Action,
}

#[derive(clap::Subcommand, Debug)]
enum Action {
    /// Lists catalog fixtures and the instruction each one exercises.
    List {
        /// Only fixtures whose name contains this text.
        #[arg(long)]
        filter: Option<String>,
    },
    /// Runs catalog fixtures and reports which ones pass.
    Check {
        /// Only fixtures whose name contains this text.
        #[arg(long)]
        filter: Option<String>,
    },
    /// Assembles a text block and runs it until the first control event.
    Run {
        /// Path to the assembly text file.
        file: PathBuf,

        /// Initial value of the next local slot (e.g. `3`, `2L`, `1.5f`, `null`).
        #[arg(long = "local", allow_hyphen_values = true)]
        locals: Vec<String>,

        /// Maximum operand stack depth.
        #[arg(long, default_value_t = MAX_STACK_DEPTH)]
        max_stack: usize,
    },
    /// Pushes values and executes a single instruction.
    Eval {
        /// The instruction, e.g. `iadd` or `bipush 5`.
        instruction: String,

        /// Values pushed before the instruction runs, bottom first.
        #[arg(allow_hyphen_values = true)]
        values: Vec<String>,
    },
}

fn main() {
    let args = Args::parse();

    if let Err(e) = logger::configure(args.verbose) {
        eprintln!("error: {e}");
        process::exit(1);
    }

    let result = match args.action {
        Action::List { filter } => commands::list(filter.as_deref()),
        Action::Check { filter } => commands::check(filter.as_deref()),
        Action::Run {
            file,
            locals,
            max_stack,
        } => commands::run(&file, &locals, max_stack),
        Action::Eval {
            instruction,
            values,
        } => commands::eval(&instruction, &values),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}
