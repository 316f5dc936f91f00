//! Error types for netlist synthesis.

use cimgen_rom::RomError;

/// Errors raised while building or emitting subcircuits.
#[derive(Debug, thiserror::Error)]
pub enum NetlistError {
    /// The column source could not supply valid bits.
    #[error(transparent)]
    Source(#[from] RomError),

    /// An instance connects a different number of wires than its callee declares.
    #[error(
        "{parent}: instance {instance} of {subckt} connects {got} wires, \
         the subcircuit declares {expected}"
    )]
    WidthMismatch {
        /// Subcircuit containing the instance.
        parent: String,
        /// Instance name.
        instance: String,
        /// Instantiated subcircuit.
        subckt: String,
        /// Port width declared by the callee.
        expected: usize,
        /// Wires connected by the instance.
        got: usize,
    },

    /// Two subcircuits with the same name were emitted into one netlist.
    #[error("subcircuit {0} is defined twice")]
    DuplicateSubckt(String),
}
