//! Weight tensors and the physical weight cube.
//!
//! This crate implements the first two lowering stages: resolving the layout
//! descriptor table into `(region, tensor)` pairs, and scattering those
//! tensors into a single [`PhysicalWeightCube`] indexed by
//! `(array row, array col, line, input channel, output channel, bit)`.
//!
//! The main entry point is [`build_cube`], which chains
//! [`resolve_regions`] and [`remap`].

#![warn(missing_docs)]

pub mod cube;
pub mod error;
pub mod remap;
pub mod resolve;
pub mod tensor;

pub use cube::{CubeBuilder, PhysicalWeightCube, RegionTag};
pub use error::WeightError;
pub use remap::remap;
pub use resolve::{resolve_regions, ResolvedLayout};
pub use tensor::SourceWeightTensor;

use cimgen_config::{CimConfig, ResolvedPaths};

/// Resolves every region of `config`, loads its tensor, and builds the cube.
pub fn build_cube(
    config: &CimConfig,
    paths: &ResolvedPaths,
) -> Result<PhysicalWeightCube, WeightError> {
    let layout = resolve_regions(config, paths)?;
    remap(config, &layout)
}
