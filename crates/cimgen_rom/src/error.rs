//! Error types for bit-serial encoding and dump parsing.

use cimgen_common::ArrayId;

/// Errors raised while turning stored weights into physical bit columns.
#[derive(Debug, thiserror::Error)]
pub enum RomError {
    /// A stored bit is neither 0 nor 1.
    #[error(
        "array {array}: bit {bit} of ic {ic} oc {oc} line {line} holds {value}, expected 0 or 1"
    )]
    InvalidBit {
        /// Array the bit belongs to.
        array: ArrayId,
        /// Input channel.
        ic: usize,
        /// Output channel.
        oc: usize,
        /// Bit position (0 = sign).
        bit: usize,
        /// Physical line.
        line: usize,
        /// The offending stored value.
        value: u8,
    },

    /// A textual dump does not have the expected shape.
    #[error("array {array}: malformed dump at line {line}: {reason}")]
    MalformedDump {
        /// Array the dump was read for.
        array: ArrayId,
        /// 1-based text line of the problem.
        line: usize,
        /// Description of the problem.
        reason: String,
    },

    /// The requested array is not part of the grid.
    #[error("array {array} is not on the {count}-array grid")]
    UnknownArray {
        /// The requested array.
        array: ArrayId,
        /// Number of arrays on the grid.
        count: usize,
    },
}
