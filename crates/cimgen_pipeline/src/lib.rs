//! End-to-end lowering pipeline for cimgen.
//!
//! Chains the stages of the workspace:
//!
//! 1. load `cim.toml` and resolve paths ([`Project::open`])
//! 2. resolve regions and build the frozen weight cube
//! 3. encode every array into bit-planes and render the dumps
//! 4. synthesize every array's netlist
//! 5. aggregate the per-array artifacts
//!
//! Stages 3 and 4 work on in-memory artifacts ([`stages`]); file I/O is
//! confined to [`output`] and [`aggregate`].

#![warn(missing_docs)]

pub mod aggregate;
pub mod error;
pub mod output;
pub mod stages;

pub use aggregate::{assemble_all_netlist, write_dumps, DumpKind, Fragments};
pub use error::PipelineError;
pub use output::{concat_atomic, dump_file_name, write_atomic, OutputLayout};
pub use stages::{build_pool, encode_all, render_dumps, synthesize_each, ArrayDumps};

use cimgen_common::ArrayId;
use cimgen_config::{load_config, load_config_file, resolve_paths, CimConfig, ResolvedPaths};
use cimgen_rom::{split_dump, SchematicArray};
use cimgen_weights::{build_cube, PhysicalWeightCube};
use std::path::{Path, PathBuf};

/// A loaded project: its configuration and resolved paths.
#[derive(Debug, Clone)]
pub struct Project {
    /// The parsed and validated configuration.
    pub config: CimConfig,
    /// Input and output locations.
    pub paths: ResolvedPaths,
}

impl Project {
    /// Loads `<project_dir>/cim.toml` and resolves its paths.
    pub fn open(project_dir: &Path, output_override: Option<&Path>) -> Result<Self, PipelineError> {
        let config = load_config(project_dir)?;
        let paths = resolve_paths(&config, project_dir, output_override);
        Ok(Self { config, paths })
    }

    /// Loads the configuration file at `config_path`, whatever its name.
    ///
    /// Relative paths in the file are anchored at its directory.
    pub fn open_file(
        config_path: &Path,
        output_override: Option<&Path>,
    ) -> Result<Self, PipelineError> {
        let config = load_config_file(config_path)?;
        let project_dir = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let paths = resolve_paths(&config, project_dir, output_override);
        Ok(Self { config, paths })
    }

    /// Output locations of this project.
    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(&self.paths.output_dir)
    }

    /// Resolves every region and builds the frozen weight cube.
    pub fn build_cube(&self) -> Result<PhysicalWeightCube, PipelineError> {
        Ok(build_cube(&self.config, &self.paths)?)
    }
}

/// Options shared by every pipeline run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Worker threads; `None` uses the available parallelism.
    pub jobs: Option<usize>,
}

/// Summary of a run that produced netlists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// Number of arrays synthesized.
    pub arrays: usize,
    /// Subcircuits across all arrays.
    pub subckts: usize,
    /// Transistors across all arrays.
    pub devices: usize,
    /// Files written, in write order.
    pub outputs: Vec<PathBuf>,
}

/// Summary of a layout check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Arrays on the grid.
    pub arrays: usize,
    /// Convolutional regions plus the FC region, if any.
    pub regions: usize,
    /// `(array, line)` pairs no region writes.
    pub uncovered_lines: usize,
}

/// Validates the configuration, loads every weight file and builds the cube
/// without writing anything.
pub fn check(project: &Project) -> Result<CheckReport, PipelineError> {
    let cube = project.build_cube()?;
    let report = CheckReport {
        arrays: project.config.geometry.array_count(),
        regions: project.config.regions.len() + usize::from(project.config.fc.is_some()),
        uncovered_lines: cube.uncovered_lines(),
    };
    tracing::info!(
        arrays = report.arrays,
        regions = report.regions,
        uncovered = report.uncovered_lines,
        "layout check passed"
    );
    Ok(report)
}

/// Builds the cube and writes the ROM-order and schematic-order dumps.
pub fn rom(project: &Project, options: RunOptions) -> Result<Vec<PathBuf>, PipelineError> {
    let pool = build_pool(options.jobs)?;
    let cube = project.build_cube()?;
    let planes = encode_all(&cube, &pool)?;
    write_all_dumps(project, &planes, &pool)
}

fn write_all_dumps(
    project: &Project,
    planes: &[cimgen_rom::ArrayBitPlanes],
    pool: &rayon::ThreadPool,
) -> Result<Vec<PathBuf>, PipelineError> {
    let layout = project.layout();
    let geometry = project.config.geometry;
    let (rom, schematic): (Vec<String>, Vec<String>) = render_dumps(planes, pool)
        .into_iter()
        .map(|d| (d.rom, d.schematic))
        .unzip();
    let outputs = vec![
        write_dumps(&layout, geometry, DumpKind::Rom, &rom)?,
        write_dumps(&layout, geometry, DumpKind::Schematic, &schematic)?,
    ];
    tracing::info!(arrays = rom.len(), "wrote weight dumps");
    Ok(outputs)
}

/// Runs the full pipeline: cube, dumps, per-array netlists, and the
/// all-array netlist.
pub fn generate(project: &Project, options: RunOptions) -> Result<GenerateReport, PipelineError> {
    let pool = build_pool(options.jobs)?;
    let fragments = Fragments::load(&project.paths)?;
    let cube = project.build_cube()?;
    let planes = encode_all(&cube, &pool)?;
    let mut outputs = write_all_dumps(project, &planes, &pool)?;
    let mut report = synthesize_to_disk(project, &planes, &fragments, &pool)?;
    outputs.append(&mut report.outputs);
    report.outputs = outputs;
    Ok(report)
}

/// Synthesizes netlists from previously written schematic-order dumps.
///
/// `dump` is either a directory holding `output_{a}.txt` per array, or a
/// combined dump file with array markers.
pub fn synth_from_dumps(
    project: &Project,
    dump: &Path,
    options: RunOptions,
) -> Result<GenerateReport, PipelineError> {
    let pool = build_pool(options.jobs)?;
    let fragments = Fragments::load(&project.paths)?;
    let sources = load_schematic_dumps(project, dump)?;
    synthesize_to_disk(project, &sources, &fragments, &pool)
}

fn load_schematic_dumps(project: &Project, dump: &Path) -> Result<Vec<SchematicArray>, PipelineError> {
    let geometry = project.config.geometry;
    let ids: Vec<ArrayId> = geometry.arrays().map(|(id, _)| id).collect();
    let texts: Vec<String> = if dump.is_dir() {
        ids.iter()
            .map(|&id| {
                let path = dump.join(dump_file_name(id));
                if !path.is_file() {
                    return Err(PipelineError::MissingArray { array: id, path });
                }
                output::read_text(&path)
            })
            .collect::<Result<_, _>>()?
    } else {
        let parts = split_dump(&output::read_text(dump)?);
        if parts.len() != ids.len() {
            return Err(PipelineError::DumpArrayCount {
                path: dump.to_path_buf(),
                expected: ids.len(),
                got: parts.len(),
            });
        }
        parts
    };
    let sources = ids
        .iter()
        .zip(&texts)
        .map(|(&id, text)| SchematicArray::parse(id, text))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::info!(arrays = sources.len(), path = %dump.display(), "loaded schematic dumps");
    Ok(sources)
}

fn synthesize_to_disk<S>(
    project: &Project,
    sources: &[S],
    fragments: &Fragments,
    pool: &rayon::ThreadPool,
) -> Result<GenerateReport, PipelineError>
where
    S: cimgen_rom::ColumnSource + Sync,
{
    let layout = project.layout();
    let written = synthesize_each(sources, &project.config.devices, pool, |netlist| {
        let path = layout.array_netlist(netlist.array);
        write_atomic(&path, &fragments.wrap(&netlist.body))?;
        tracing::debug!(array = %netlist.array, path = %path.display(), "wrote array netlist");
        Ok((path, netlist.subckt_count, netlist.device_count))
    })?;

    let mut report = GenerateReport {
        arrays: written.len(),
        ..GenerateReport::default()
    };
    for (path, subckts, devices) in written {
        report.subckts += subckts;
        report.devices += devices;
        report.outputs.push(path);
    }
    report
        .outputs
        .push(assemble_all_netlist(&layout, project.config.geometry)?);
    tracing::info!(
        arrays = report.arrays,
        subckts = report.subckts,
        devices = report.devices,
        "synthesized netlists"
    );
    Ok(report)
}
