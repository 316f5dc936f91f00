//! The cimgen command-line interface. Turns trained weight tensors into CIM array netlists.
//!
//! Provides `cimgen generate` for the full pipeline, `cimgen rom` for the
//! weight dumps alone, `cimgen synth` for netlists from existing schematic
//! dumps, and `cimgen check` for validating a layout without writing output.

#![warn(missing_docs)]

mod check;
mod generate;
mod project;
mod rom;
mod synth;

use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// cimgen: weight layout and netlist generator for compute-in-memory arrays.
#[derive(Parser, Debug)]
#[command(name = "cimgen", version, about = "CIM Array Netlist Generator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file to load (any name), or a project directory holding `cim.toml`.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Worker threads for per-array stages (default: available parallelism).
    #[arg(short, long, global = true)]
    pub jobs: Option<usize>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the weight cube, write the dumps, and synthesize every array.
    Generate(GenerateArgs),
    /// Write the ROM-order and schematic-order weight dumps only.
    Rom(RomArgs),
    /// Synthesize netlists from previously written schematic dumps.
    Synth(SynthArgs),
    /// Validate the configuration and weight files without writing output.
    Check,
}

/// Arguments for the `cimgen generate` subcommand.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Output directory (default: `paths.output_dir` from `cim.toml`).
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for the `cimgen rom` subcommand.
#[derive(Parser, Debug)]
pub struct RomArgs {
    /// Output directory (default: `paths.output_dir` from `cim.toml`).
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for the `cimgen synth` subcommand.
#[derive(Parser, Debug)]
pub struct SynthArgs {
    /// Directory of `output_{a}.txt` schematic dumps, or a combined dump file.
    #[arg(long)]
    pub dump_dir: String,

    /// Output directory (default: `paths.output_dir` from `cim.toml`).
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional config file or project directory.
    pub config: Option<String>,
    /// Optional worker thread count.
    pub jobs: Option<usize>,
}

impl GlobalArgs {
    /// Default log filter when `RUST_LOG` is unset.
    fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

fn init_logging(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(global.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
        jobs: cli.jobs,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::Generate(ref args) => generate::run(args, &global),
        Command::Rom(ref args) => rom::run(args, &global),
        Command::Synth(ref args) => synth::run(args, &global),
        Command::Check => check::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
