//! Bit-serial encoding of the weight cube.
//!
//! Each array is transposed from `[line][ic][oc][bit]` into
//! `[ic][plane][line]`, where `plane = bit * 16 + oc`. A plane of one input
//! channel is a [`PhysicalBitColumn`]: the 96 bits one cell stores.

use crate::column::{ColumnSource, PhysicalBitColumn};
use crate::error::RomError;
use cimgen_common::{
    ArrayCoord, ArrayId, INPUT_CHANNELS, LINES, OUTPUT_CHANNELS, PLANES, WEIGHT_BITS,
};
use cimgen_weights::PhysicalWeightCube;

/// Index of the bit-plane holding bit position `bit` of output channel `oc`.
pub fn plane_index(oc: usize, bit: usize) -> usize {
    bit * OUTPUT_CHANNELS + oc
}

/// The 16 × 128 bit columns of one array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayBitPlanes {
    array: ArrayId,
    coord: ArrayCoord,
    columns: Vec<PhysicalBitColumn>,
}

impl ArrayBitPlanes {
    /// The array's ID.
    pub fn array(&self) -> ArrayId {
        self.array
    }

    /// The array's grid position.
    pub fn coord(&self) -> ArrayCoord {
        self.coord
    }

    /// Column `plane` of input channel `ic`.
    ///
    /// # Panics
    ///
    /// Panics if `ic >= 16` or `plane >= 128`.
    pub fn plane(&self, ic: usize, plane: usize) -> &PhysicalBitColumn {
        &self.columns[ic * PLANES + plane]
    }

    /// The 128 planes of input channel `ic`, in plane order.
    pub fn planes(&self, ic: usize) -> &[PhysicalBitColumn] {
        &self.columns[ic * PLANES..(ic + 1) * PLANES]
    }

    /// Total number of stored ones in the array.
    pub fn count_ones(&self) -> usize {
        self.columns.iter().map(PhysicalBitColumn::count_ones).sum()
    }
}

impl ColumnSource for ArrayBitPlanes {
    fn array(&self) -> ArrayId {
        self.array
    }

    fn column(&self, ic: usize, oc: usize, bit: usize) -> Result<PhysicalBitColumn, RomError> {
        Ok(*self.plane(ic, plane_index(oc, bit)))
    }
}

/// Encodes one array of the cube into bit-planes.
///
/// Every stored value must be 0 or 1; anything else is reported with its
/// full coordinates.
pub fn encode_array(cube: &PhysicalWeightCube, array: ArrayId) -> Result<ArrayBitPlanes, RomError> {
    let geometry = cube.geometry();
    let coord = geometry.coord(array).ok_or(RomError::UnknownArray {
        array,
        count: geometry.array_count(),
    })?;
    let slice = cube.array_slice(coord);

    let mut columns = vec![PhysicalBitColumn::default(); INPUT_CHANNELS * PLANES];
    for ic in 0..INPUT_CHANNELS {
        for oc in 0..OUTPUT_CHANNELS {
            for bit in 0..WEIGHT_BITS {
                let mut lines = [false; LINES];
                for (line, slot) in lines.iter_mut().enumerate() {
                    let offset = ((line * INPUT_CHANNELS + ic) * OUTPUT_CHANNELS + oc) * WEIGHT_BITS;
                    let value = slice[offset + bit];
                    *slot = match value {
                        0 => false,
                        1 => true,
                        value => {
                            return Err(RomError::InvalidBit {
                                array,
                                ic,
                                oc,
                                bit,
                                line,
                                value,
                            })
                        }
                    };
                }
                columns[ic * PLANES + plane_index(oc, bit)] =
                    PhysicalBitColumn::from_fn(|k| lines[k]);
            }
        }
    }

    let planes = ArrayBitPlanes {
        array,
        coord,
        columns,
    };
    tracing::debug!(%array, ones = planes.count_ones(), "encoded array bit-planes");
    Ok(planes)
}
