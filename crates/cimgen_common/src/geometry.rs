//! Floorplan constants and array addressing.
//!
//! Every CIM array holds [`LINES`] physical rows per input channel, with
//! [`INPUT_CHANNELS`] × [`OUTPUT_CHANNELS`] weights of [`WEIGHT_BITS`] bits on
//! each line. Arrays are laid out on a rectangular grid described by
//! [`Geometry`] and numbered row-major starting at 1.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical lines (rows) per input-channel slice of an array.
pub const LINES: usize = 96;

/// Input channels per array block.
pub const INPUT_CHANNELS: usize = 16;

/// Output channels per array block.
pub const OUTPUT_CHANNELS: usize = 16;

/// Bits per weight (1 sign bit + 7 magnitude bits).
pub const WEIGHT_BITS: usize = 8;

/// Bit-planes per array: one per (bit position, output channel) pair.
pub const PLANES: usize = WEIGHT_BITS * OUTPUT_CHANNELS;

/// Width of the shared input bus feeding one column (16 wires per input channel).
pub const INPUT_BUS_WIDTH: usize = INPUT_CHANNELS * 16;

/// Width of the signed partial sum produced by one output-channel group.
pub const SUM_WIDTH: usize = 13;

/// Largest number of arrays a grid may hold.
///
/// Each array occupies 196 608 cube bytes; the cap keeps the cube near
/// 200 MB and every array ID well inside `u32`.
pub const MAX_ARRAYS: usize = 1024;

/// The 1-based index of an array on the grid.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct ArrayId(u32);

impl ArrayId {
    /// Creates an ID from a raw 1-based index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw 1-based index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ArrayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A position on the array grid (zero-based row and column).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct ArrayCoord {
    /// Grid row.
    pub row: usize,
    /// Grid column.
    pub col: usize,
}

/// Dimensions of the array grid.
///
/// The per-array shape is fixed by the constants of this module; only the
/// number of arrays varies between floorplans.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    /// Number of array rows on the grid.
    pub array_rows: usize,
    /// Number of array columns on the grid.
    pub array_cols: usize,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            array_rows: 4,
            array_cols: 4,
        }
    }
}

impl Geometry {
    /// Creates a grid with the given number of array rows and columns.
    pub fn new(array_rows: usize, array_cols: usize) -> Self {
        Self {
            array_rows,
            array_cols,
        }
    }

    /// Total number of arrays on the grid.
    ///
    /// Grids accepted by config validation hold at most [`MAX_ARRAYS`]
    /// arrays; use [`Geometry::checked_array_count`] on unvalidated input.
    pub fn array_count(&self) -> usize {
        self.array_rows * self.array_cols
    }

    /// Number of arrays on the grid, or `None` if the grid is empty or
    /// larger than [`MAX_ARRAYS`].
    pub fn checked_array_count(&self) -> Option<usize> {
        self.array_rows
            .checked_mul(self.array_cols)
            .filter(|&count| count > 0 && count <= MAX_ARRAYS)
    }

    /// Returns the ID of the array at `coord`, or `None` when off the grid.
    pub fn array_id(&self, coord: ArrayCoord) -> Option<ArrayId> {
        if coord.row >= self.array_rows || coord.col >= self.array_cols {
            return None;
        }
        Some(ArrayId((coord.row * self.array_cols + coord.col + 1) as u32))
    }

    /// Returns the grid position of `id`, or `None` when the ID is out of range.
    pub fn coord(&self, id: ArrayId) -> Option<ArrayCoord> {
        let raw = id.0 as usize;
        if raw == 0 || raw > self.array_count() {
            return None;
        }
        Some(ArrayCoord {
            row: (raw - 1) / self.array_cols,
            col: (raw - 1) % self.array_cols,
        })
    }

    /// Iterates over all arrays in ascending ID order.
    pub fn arrays(&self) -> impl Iterator<Item = (ArrayId, ArrayCoord)> + '_ {
        (0..self.array_rows).flat_map(move |row| {
            (0..self.array_cols).map(move |col| {
                let coord = ArrayCoord { row, col };
                (ArrayId((row * self.array_cols + col + 1) as u32), coord)
            })
        })
    }

    /// Number of output channels spanned by one row of arrays.
    pub fn grid_output_channels(&self) -> usize {
        self.array_cols * OUTPUT_CHANNELS
    }
}
