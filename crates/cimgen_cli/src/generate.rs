//! `cimgen generate`: full pipeline from weight files to netlists.
//!
//! Builds the weight cube, writes both dump orders, synthesizes every array,
//! and assembles `Array_all.sp`.

use crate::project::{open_project, print_grid, run_options};
use crate::{GenerateArgs, GlobalArgs};

/// Runs the `cimgen generate` command.
///
/// Returns exit code 0 on success; any pipeline failure is returned as an
/// error and leaves no partially written file behind.
pub fn run(args: &GenerateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = open_project(global, args.output.as_deref())?;

    if !global.quiet {
        eprintln!(
            "  Generating {} region(s){}",
            project.config.regions.len(),
            if project.config.fc.is_some() { " + fc" } else { "" }
        );
    }
    print_grid(&project, global);

    let report = cimgen_pipeline::generate(&project, run_options(global))?;

    if !global.quiet {
        eprintln!(
            "   Generated {} array netlist(s): {} subcircuits, {} transistors",
            report.arrays, report.subckts, report.devices
        );
        eprintln!("     Output {}", project.paths.output_dir.display());
    }
    Ok(0)
}
