//! `cimgen check`: layout validation without output.

use crate::project::{open_project, print_grid};
use crate::GlobalArgs;

/// Runs the `cimgen check` command.
///
/// Loads every weight file and builds the cube. Uncovered lines are only
/// reported here; they are an error when `remap.require_full_coverage` is set.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = open_project(global, None)?;
    print_grid(&project, global);

    let report = cimgen_pipeline::check(&project)?;

    if !global.quiet {
        eprintln!(
            "     Checked {} region(s) across {} array(s)",
            report.regions, report.arrays
        );
        if report.uncovered_lines > 0 {
            eprintln!(
                "warning: {} physical line(s) are not covered by any region",
                report.uncovered_lines
            );
        }
    }
    Ok(0)
}
