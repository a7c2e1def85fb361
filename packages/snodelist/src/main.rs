#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

//! Binary entry point for the snodelist tool.
//!
//! This module is excluded from mutation testing because testing process entry/exit behavior
//! is impractical - it requires spawning subprocesses and checking exit codes.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use argh::FromArgs;
use snodelist::{Mode, RunInput, Template, run};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Environment variable that configures diagnostic logging, in `tracing` filter syntax.
const LOG_ENV_VAR: &str = "SNODELIST_LOG";

/// Build a host list from host expressions, environment variables or files and display it in
/// expanded or compressed form, or generate an MPI-style machine file for the current job.
#[derive(FromArgs)]
struct Args {
    /// output as individual names (default mode)
    #[argh(switch, short = 'e')]
    expand: bool,

    /// output in compressed (compact) form
    #[argh(switch, short = 'c')]
    compress: bool,

    /// generate an MPI-style machine file from SLURM_JOB_NODELIST and SLURM_TASKS_PER_NODE
    #[argh(switch, short = 'm')]
    machinefile: bool,

    /// include the host list held in this environment variable (can be repeated)
    #[argh(option, short = 'i')]
    include_env: Vec<String>,

    /// read host expressions from this file, "-" meaning stdin (can be repeated)
    #[argh(option, short = 'l')]
    nodelist: Vec<PathBuf>,

    /// remove duplicate names (expand and compress modes)
    #[argh(switch, short = 'u')]
    unique: bool,

    /// text placed between names in expand mode (default: a newline)
    #[argh(option, short = 'd')]
    delimiter: Option<String>,

    /// machine file line format; tokens: %% literal percent, %h host name, %c task count,
    /// %C task count unless 1, %[:]c and %[:]C the same preceded by ":" (default: "%h%[:]C")
    #[argh(option, short = 'f')]
    format: Option<String>,

    /// if the line format lacks a count token, write one line per host instead of one per task
    #[argh(switch, short = 'n')]
    no_repeats: bool,

    /// host expressions such as n[000-003]
    #[argh(positional)]
    expressions: Vec<String>,
}

impl Args {
    fn mode(&self) -> Mode {
        // Machinefile wins over everything, and an explicit expand wins over compress.
        match (self.machinefile, self.expand, self.compress) {
            (true, _, _) => Mode::Machinefile,
            (false, false, true) => Mode::Compress,
            (false, _, _) => Mode::Expand,
        }
    }

    fn into_input(self) -> RunInput {
        RunInput {
            mode: self.mode(),
            include_env: self.include_env,
            nodelists: self.nodelist,
            expressions: self.expressions,
            unique: self.unique,
            delimiter: self.delimiter.unwrap_or_else(|| "\n".to_string()),
            format: self
                .format
                .unwrap_or_else(|| Template::DEFAULT.to_string()),
            no_repeats: self.no_repeats,
        }
    }
}

// Logging setup has no behavior worth testing.
#[cfg_attr(test, mutants::skip)]
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

// Binary entry point - mutations would require subprocess testing which is impractical.
#[cfg_attr(test, mutants::skip)]
fn main() -> ExitCode {
    let args: Args = argh::from_env();

    init_logging();

    let input = args.into_input();

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    let result = run(&input, &mut out);

    // Lines written before a failure are kept.
    let flushed = out.flush();

    match (result, flushed) {
        (Ok(_), Ok(())) => ExitCode::SUCCESS,
        (Err(e), _) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        (Ok(_), Err(e)) => {
            eprintln!("Error: failed to write output: {e}");
            ExitCode::FAILURE
        }
    }
}
