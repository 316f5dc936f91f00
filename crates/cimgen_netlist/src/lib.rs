//! Hierarchical SPICE netlist synthesis for CIM arrays.
//!
//! This crate builds, for one array at a time, the four-level subcircuit
//! hierarchy Cell → Column → output-channel group → Array from any
//! [`ColumnSource`](cimgen_rom::ColumnSource), and renders it as SPICE text
//! with deterministic instance and port naming.
//!
//! The main entry point is [`synthesize_array`].

#![warn(missing_docs)]

pub mod error;
pub mod node;
pub mod synth;
pub mod writer;

pub use error::NetlistError;
pub use node::{bus_width, Pin, PinDirection, Statement, Subckt, SubcktKind, SEPARATOR};
pub use synth::{
    array_name, build_array, build_cell, build_column, build_oc_group, cell_name, column_label,
    column_name, oc_group_name, synthesize_array, ArrayNetlist, SIGN_COLUMN,
};
pub use writer::NetlistWriter;
