//! Two-level row selection.
//!
//! The 96 physical lines of a cell are driven by 16 first-level row enables
//! (`row_en<0:15>`) and 6 second-level group selects (`row_2level<0:5>`).
//! Line `k` sits at local row `k % 16` of group `k / 16`. This decomposition is
//! shared by the ROM encoder and the netlist synthesizer and must not change.

use crate::geometry::LINES;
use serde::{Deserialize, Serialize};

/// Number of first-level row enables.
pub const SELECT_ROWS: usize = 16;

/// Number of second-level group selects.
pub const SELECT_GROUPS: usize = 6;

const _: () = assert!(SELECT_ROWS * SELECT_GROUPS == LINES);

/// A line index split into its (local row, group) select pair.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct SelectAddress {
    /// First-level row enable driving the line, in `0..16`.
    pub local_row: usize,
    /// Second-level group the line belongs to, in `0..6`.
    pub group: usize,
}

impl SelectAddress {
    /// Decomposes line `k`. Returns `None` when `k >= 96`.
    pub fn from_line(k: usize) -> Option<Self> {
        if k >= LINES {
            return None;
        }
        Some(Self {
            local_row: k % SELECT_ROWS,
            group: k / SELECT_ROWS,
        })
    }

    /// Recombines the pair into a line index.
    pub fn line(self) -> usize {
        self.group * SELECT_ROWS + self.local_row
    }
}
