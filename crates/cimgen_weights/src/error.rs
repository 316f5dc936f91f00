//! Error types for weight loading and address remapping.

use crate::cube::RegionTag;
use cimgen_config::ConfigError;
use std::path::PathBuf;

/// Errors raised while resolving regions, loading tensors, or building the cube.
#[derive(Debug, thiserror::Error)]
pub enum WeightError {
    /// A region descriptor disagrees with the floorplan or its tensor's declared shape.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A weight file could not be read.
    #[error("failed to read weight file {path}: {source}")]
    Io {
        /// The weight file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A weight file was read but is not a valid tensor.
    #[error("malformed weight file {path}: {reason}")]
    Parse {
        /// The weight file path.
        path: PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// A computed source index falls outside the tensor.
    #[error("{region}: source index {index:?} is outside tensor shape {shape:?}")]
    ShapeMismatch {
        /// The region being inserted.
        region: RegionTag,
        /// The computed (out-of-range) source index.
        index: Vec<usize>,
        /// The tensor's shape, without the trailing bit axis.
        shape: Vec<usize>,
    },

    /// Two regions claim the same physical line of the same array.
    #[error("{region} overlaps {other} at array ({array_row}, {array_col}) line {line}")]
    RegionOverlap {
        /// The region attempting the write.
        region: RegionTag,
        /// The region that already owns the line.
        other: RegionTag,
        /// Array grid row.
        array_row: usize,
        /// Array grid column.
        array_col: usize,
        /// Physical line.
        line: usize,
    },

    /// Some physical lines were not written by any region.
    #[error(
        "{count} physical lines are not covered by any region \
         (first: array ({array_row}, {array_col}) line {line})"
    )]
    IncompleteCoverage {
        /// Number of uncovered `(array row, array col, line)` triples.
        count: usize,
        /// Grid row of the first uncovered line.
        array_row: usize,
        /// Grid column of the first uncovered line.
        array_col: usize,
        /// First uncovered line.
        line: usize,
    },
}
