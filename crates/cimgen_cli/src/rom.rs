//! `cimgen rom`: weight dumps without netlist synthesis.

use crate::project::{open_project, print_grid, run_options};
use crate::{GlobalArgs, RomArgs};

/// Runs the `cimgen rom` command.
pub fn run(args: &RomArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = open_project(global, args.output.as_deref())?;
    print_grid(&project, global);

    let outputs = cimgen_pipeline::rom(&project, run_options(global))?;

    if !global.quiet {
        for path in &outputs {
            eprintln!("     Wrote {}", path.display());
        }
    }
    Ok(0)
}
