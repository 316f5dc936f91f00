//! Shared foundational types used across the cimgen workspace.
//!
//! This crate provides the fixed floorplan constants of the compute-in-memory
//! array, array identifiers, the two-level row-select address, and the
//! sign-magnitude weight code used by every stage of the lowering pipeline.

#![warn(missing_docs)]

pub mod geometry;
pub mod select;
pub mod weight_code;

pub use geometry::{
    ArrayCoord, ArrayId, Geometry, INPUT_BUS_WIDTH, INPUT_CHANNELS, LINES, MAX_ARRAYS,
    OUTPUT_CHANNELS, PLANES, SUM_WIDTH, WEIGHT_BITS,
};
pub use select::{SelectAddress, SELECT_GROUPS, SELECT_ROWS};
pub use weight_code::{WeightCode, WeightCodeError};
