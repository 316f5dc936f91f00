//! `cimgen synth`: netlists from previously written schematic dumps.
//!
//! Lets a dump be inspected or hand-edited between layout and synthesis;
//! the weight files are not read.

use std::path::Path;

use crate::project::{open_project, print_grid, run_options};
use crate::{GlobalArgs, SynthArgs};

/// Runs the `cimgen synth` command.
pub fn run(args: &SynthArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = open_project(global, args.output.as_deref())?;
    let dump = Path::new(&args.dump_dir);
    if !dump.exists() {
        return Err(format!("dump path {} does not exist", dump.display()).into());
    }
    print_grid(&project, global);

    let report = cimgen_pipeline::synth_from_dumps(&project, dump, run_options(global))?;

    if !global.quiet {
        eprintln!(
            " Synthesized {} array netlist(s) from {}",
            report.arrays,
            dump.display()
        );
        eprintln!("     Output {}", project.paths.output_dir.display());
    }
    Ok(0)
}
