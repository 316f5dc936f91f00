//! Error type covering every pipeline stage.

use cimgen_common::ArrayId;
use cimgen_config::ConfigError;
use cimgen_netlist::NetlistError;
use cimgen_rom::RomError;
use cimgen_weights::WeightError;
use std::path::PathBuf;

/// Errors that abort a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Region resolution or remapping failed.
    #[error(transparent)]
    Weights(#[from] WeightError),

    /// Bit-serial encoding or dump parsing failed.
    #[error(transparent)]
    Rom(#[from] RomError),

    /// Netlist synthesis failed.
    #[error(transparent)]
    Netlist(#[from] NetlistError),

    /// An input could not be read or an output could not be written.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A per-array artifact needed for aggregation does not exist.
    #[error("artifact for array {array} is missing: {path}")]
    MissingArray {
        /// The array whose artifact is missing.
        array: ArrayId,
        /// Where the artifact was expected.
        path: PathBuf,
    },

    /// A combined dump holds a different number of arrays than the grid.
    #[error("{path} holds {got} arrays, the grid has {expected}")]
    DumpArrayCount {
        /// The combined dump.
        path: PathBuf,
        /// Arrays on the grid.
        expected: usize,
        /// Arrays found in the dump.
        got: usize,
    },

    /// The worker pool could not be created.
    #[error("failed to start worker pool: {0}")]
    ThreadPool(String),
}

impl PipelineError {
    /// Wraps an I/O error with the path it occurred at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
