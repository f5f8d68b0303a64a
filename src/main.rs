use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ls8_core::Machine;
use ls8_cpu::machine::{Ls8Machine, MachineConfig};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

/// Runs an LS-8 program.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Program file: one base-2 byte per line, `#` starts a comment.
    program: PathBuf,

    /// Log a trace record (PC, next three bytes, registers) before every instruction.
    #[arg(long)]
    trace: bool,

    /// Fail if the program has not halted after this many instructions.
    #[arg(long, value_name = "N")]
    max_steps: Option<u64>,

    /// Raise log verbosity; repeat for more.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        let level = match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };
        if self.trace {
            level.max(LevelFilter::INFO)
        } else {
            level
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let stderr_format = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(args.log_level());
    tracing_subscriber::registry().with(stderr_format).init();

    let config = MachineConfig {
        trace: args.trace,
        max_steps: args.max_steps,
    };
    let mut machine = Ls8Machine::new(io::stdout(), config);
    tracing::info!("loading LS-8 program {}", args.program.display());
    machine
        .load(&args.program)
        .with_context(|| format!("failed to load {}", args.program.display()))?;
    machine.run()?;
    Ok(())
}
