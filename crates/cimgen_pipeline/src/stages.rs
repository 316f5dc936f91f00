//! In-memory pipeline stages.
//!
//! Each stage takes the previous stage's artifacts by reference and returns
//! its own; per-array work runs on a bounded rayon pool and is collected in
//! ascending array order.

use crate::error::PipelineError;
use cimgen_config::DeviceConfig;
use cimgen_netlist::{synthesize_array, ArrayNetlist};
use cimgen_rom::{encode_array, rom_text, schematic_text, ArrayBitPlanes, ColumnSource};
use cimgen_weights::PhysicalWeightCube;
use rayon::prelude::*;
use rayon::ThreadPool;

/// Builds the worker pool; `None` or `Some(0)` uses the available parallelism.
pub fn build_pool(jobs: Option<usize>) -> Result<ThreadPool, PipelineError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.unwrap_or(0))
        .build()
        .map_err(|e| PipelineError::ThreadPool(e.to_string()))
}

/// Encodes every array of the frozen cube into bit-planes.
pub fn encode_all(
    cube: &PhysicalWeightCube,
    pool: &ThreadPool,
) -> Result<Vec<ArrayBitPlanes>, PipelineError> {
    let ids: Vec<_> = cube.geometry().arrays().map(|(id, _)| id).collect();
    let planes = pool.install(|| {
        ids.par_iter()
            .map(|&id| encode_array(cube, id))
            .collect::<Result<Vec<_>, _>>()
    })?;
    tracing::info!(arrays = planes.len(), "encoded bit-planes");
    Ok(planes)
}

/// ROM-order and schematic-order texts of one array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayDumps {
    /// ROM-order text.
    pub rom: String,
    /// Schematic-order text.
    pub schematic: String,
}

/// Renders both dump orders for every array.
pub fn render_dumps(planes: &[ArrayBitPlanes], pool: &ThreadPool) -> Vec<ArrayDumps> {
    pool.install(|| {
        planes
            .par_iter()
            .map(|p| ArrayDumps {
                rom: rom_text(p),
                schematic: schematic_text(p),
            })
            .collect()
    })
}

/// Synthesizes every source and hands each netlist to `emit` on the worker
/// that produced it.
///
/// `emit` can keep the netlist in memory or write it out and return a
/// summary; its results come back in source order.
pub fn synthesize_each<S, T, F>(
    sources: &[S],
    devices: &DeviceConfig,
    pool: &ThreadPool,
    emit: F,
) -> Result<Vec<T>, PipelineError>
where
    S: ColumnSource + Sync,
    T: Send,
    F: Fn(ArrayNetlist) -> Result<T, PipelineError> + Sync,
{
    pool.install(|| {
        sources
            .par_iter()
            .map(|source| {
                let netlist = synthesize_array(source, devices)?;
                emit(netlist)
            })
            .collect()
    })
}
