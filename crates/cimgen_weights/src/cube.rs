//! The physical weight cube.
//!
//! All weights of the whole array grid live in one flat `Vec<u8>` indexed by
//! a computed linear offset over
//! `[array row][array col][line][input channel][output channel][bit]`.
//! The cube is assembled through a [`CubeBuilder`], which also records which
//! region owns each `(array row, array col, line)` so that overlapping or
//! missing regions are caught before any bit is encoded.

use crate::error::WeightError;
use cimgen_common::{
    ArrayCoord, Geometry, INPUT_CHANNELS, LINES, OUTPUT_CHANNELS, WEIGHT_BITS,
};
use std::fmt;

/// Identifies the region that wrote a physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionTag {
    /// Entry `n` of the `[[region]]` table.
    Conv(usize),
    /// The reserved fully connected region.
    Fc,
}

impl fmt::Display for RegionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionTag::Conv(index) => write!(f, "region {index}"),
            RegionTag::Fc => write!(f, "fc region"),
        }
    }
}

/// Bytes occupied by one array: every line × IC × OC × bit.
const ARRAY_STRIDE: usize = LINES * INPUT_CHANNELS * OUTPUT_CHANNELS * WEIGHT_BITS;

/// Fully populated, read-only weight storage for the array grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalWeightCube {
    geometry: Geometry,
    bits: Vec<u8>,
    owners: Vec<Option<RegionTag>>,
}

impl PhysicalWeightCube {
    /// The grid the cube was built for.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// The 8 bits (sign first) stored at one physical weight position.
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is outside the cube.
    pub fn weight(&self, coord: ArrayCoord, line: usize, ic: usize, oc: usize) -> &[u8] {
        let start = weight_offset(self.geometry, coord, line, ic, oc);
        &self.bits[start..start + WEIGHT_BITS]
    }

    /// A single stored bit; `bit` 0 is the sign (MSB), 7 the LSB.
    pub fn bit(&self, coord: ArrayCoord, line: usize, ic: usize, oc: usize, bit: usize) -> u8 {
        self.weight(coord, line, ic, oc)[bit]
    }

    /// The contiguous storage of one array, `[line][ic][oc][bit]`.
    pub fn array_slice(&self, coord: ArrayCoord) -> &[u8] {
        let start = array_offset(self.geometry, coord);
        &self.bits[start..start + ARRAY_STRIDE]
    }

    /// The region that wrote `line` of the array at `coord`, if any.
    pub fn owner(&self, coord: ArrayCoord, line: usize) -> Option<RegionTag> {
        self.owners[line_slot(self.geometry, coord, line)]
    }

    /// Number of `(array row, array col, line)` triples not written by any region.
    pub fn uncovered_lines(&self) -> usize {
        self.owners.iter().filter(|o| o.is_none()).count()
    }
}

fn array_offset(geometry: Geometry, coord: ArrayCoord) -> usize {
    (coord.row * geometry.array_cols + coord.col) * ARRAY_STRIDE
}

fn weight_offset(geometry: Geometry, coord: ArrayCoord, line: usize, ic: usize, oc: usize) -> usize {
    debug_assert!(line < LINES && ic < INPUT_CHANNELS && oc < OUTPUT_CHANNELS);
    array_offset(geometry, coord) + ((line * INPUT_CHANNELS + ic) * OUTPUT_CHANNELS + oc) * WEIGHT_BITS
}

fn line_slot(geometry: Geometry, coord: ArrayCoord, line: usize) -> usize {
    (coord.row * geometry.array_cols + coord.col) * LINES + line
}

/// Write-once accumulator for a [`PhysicalWeightCube`].
///
/// Every line must be claimed by exactly one region before its weights are
/// written; [`CubeBuilder::finish`] consumes the builder so no writer can
/// outlive construction.
#[derive(Debug)]
pub struct CubeBuilder {
    geometry: Geometry,
    bits: Vec<u8>,
    owners: Vec<Option<RegionTag>>,
}

impl CubeBuilder {
    /// Creates a zero-filled builder for the given grid.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            bits: vec![0; geometry.array_count() * ARRAY_STRIDE],
            owners: vec![None; geometry.array_count() * LINES],
        }
    }

    /// The grid being built.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Records `region` as the owner of `line` in the array at `coord`.
    ///
    /// Fails with [`WeightError::RegionOverlap`] if another region already owns it.
    pub fn claim(
        &mut self,
        region: RegionTag,
        coord: ArrayCoord,
        line: usize,
    ) -> Result<(), WeightError> {
        let slot = line_slot(self.geometry, coord, line);
        match self.owners[slot] {
            Some(other) => Err(WeightError::RegionOverlap {
                region,
                other,
                array_row: coord.row,
                array_col: coord.col,
                line,
            }),
            None => {
                self.owners[slot] = Some(region);
                Ok(())
            }
        }
    }

    /// Stores one weight's 8 bits at a physical position.
    ///
    /// Ownership is not checked here; callers claim the line first.
    ///
    /// # Panics
    ///
    /// Panics if `code` is not exactly 8 entries long.
    pub fn write(&mut self, coord: ArrayCoord, line: usize, ic: usize, oc: usize, code: &[u8]) {
        let start = weight_offset(self.geometry, coord, line, ic, oc);
        self.bits[start..start + WEIGHT_BITS].copy_from_slice(code);
    }

    /// Freezes the cube.
    ///
    /// With `require_full_coverage`, any unclaimed line is an
    /// [`WeightError::IncompleteCoverage`] error; otherwise unclaimed lines
    /// stay zero.
    pub fn finish(self, require_full_coverage: bool) -> Result<PhysicalWeightCube, WeightError> {
        let uncovered = self.owners.iter().filter(|o| o.is_none()).count();
        if uncovered > 0 {
            let first = self.owners.iter().position(Option::is_none).unwrap_or(0);
            let array = first / LINES;
            let (array_row, array_col, line) = (
                array / self.geometry.array_cols,
                array % self.geometry.array_cols,
                first % LINES,
            );
            if require_full_coverage {
                return Err(WeightError::IncompleteCoverage {
                    count: uncovered,
                    array_row,
                    array_col,
                    line,
                });
            }
            tracing::warn!(
                uncovered,
                array_row,
                array_col,
                line,
                "layout leaves physical lines unwritten; they are zero-filled"
            );
        }
        Ok(PhysicalWeightCube {
            geometry: self.geometry,
            bits: self.bits,
            owners: self.owners,
        })
    }
}
