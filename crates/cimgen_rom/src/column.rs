//! Physical bit columns and the sources that provide them.

use crate::error::RomError;
use cimgen_common::{ArrayId, SelectAddress, LINES, SELECT_GROUPS, SELECT_ROWS};

/// The 96 stored bits of one cell: a single (array, ic, oc, bit) position
/// across every physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalBitColumn {
    bits: [bool; LINES],
}

impl Default for PhysicalBitColumn {
    fn default() -> Self {
        Self {
            bits: [false; LINES],
        }
    }
}

impl PhysicalBitColumn {
    /// Builds a column by evaluating `f` for every line `0..96`.
    pub fn from_fn(f: impl FnMut(usize) -> bool) -> Self {
        Self {
            bits: std::array::from_fn(f),
        }
    }

    /// The bit stored on line `k`.
    ///
    /// # Panics
    ///
    /// Panics if `k >= 96`.
    pub fn get(&self, k: usize) -> bool {
        self.bits[k]
    }

    /// All 96 bits in line order.
    pub fn bits(&self) -> &[bool; LINES] {
        &self.bits
    }

    /// Number of lines storing a 1.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// The column as a 16 × 6 select matrix, `matrix[local_row][group]`.
    ///
    /// Filled fast axis first, so `matrix[r][c]` is line `c * 16 + r`.
    pub fn matrix(&self) -> [[bool; SELECT_GROUPS]; SELECT_ROWS] {
        let mut matrix = [[false; SELECT_GROUPS]; SELECT_ROWS];
        for (k, &bit) in self.bits.iter().enumerate() {
            if let Some(addr) = SelectAddress::from_line(k) {
                matrix[addr.local_row][addr.group] = bit;
            }
        }
        matrix
    }
}

/// Anything that can supply the bit columns of one array.
///
/// Implemented by freshly encoded bit-planes and by schematic-order dumps
/// read back from disk, so the netlist synthesizer does not care where the
/// bits came from.
pub trait ColumnSource {
    /// The array the columns belong to.
    fn array(&self) -> ArrayId;

    /// The column for input channel `ic`, output channel `oc` and bit
    /// position `bit` (0 = sign).
    fn column(&self, ic: usize, oc: usize, bit: usize) -> Result<PhysicalBitColumn, RomError>;
}
