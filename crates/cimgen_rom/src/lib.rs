//! Bit-serial layout encoding for CIM arrays.
//!
//! This crate turns the frozen [`PhysicalWeightCube`](cimgen_weights::PhysicalWeightCube)
//! into per-array [`ArrayBitPlanes`]: 16 input channels × 128 bit-planes of
//! 96-line [`PhysicalBitColumn`]s. It also renders and reads back the textual
//! ROM-order and schematic-order dumps, and defines the [`ColumnSource`] seam
//! consumed by the netlist synthesizer.

#![warn(missing_docs)]

pub mod column;
pub mod dump;
pub mod encode;
pub mod error;

pub use column::{ColumnSource, PhysicalBitColumn};
pub use dump::{
    combined_dump, rom_text, schematic_text, split_dump, SchematicArray, ARRAY_MARKER, ROW_MARKER,
};
pub use encode::{encode_array, plane_index, ArrayBitPlanes};
pub use error::RomError;
