//! Configuration types deserialized from `cim.toml`.

use cimgen_common::{Geometry, INPUT_CHANNELS, OUTPUT_CHANNELS};
use serde::Deserialize;
use std::ops::{Range, RangeInclusive};

/// The top-level configuration parsed from `cim.toml`.
///
/// Holds the array grid, input/output paths, device parameters for the
/// emitted netlist, remapping policy, and the layout descriptor table.
#[derive(Debug, Clone, Deserialize)]
pub struct CimConfig {
    /// Dimensions of the array grid.
    #[serde(default)]
    pub geometry: Geometry,
    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsConfig,
    /// Device models and primitive names used by the netlist synthesizer.
    #[serde(default)]
    pub devices: DeviceConfig,
    /// Remapping policy.
    #[serde(default)]
    pub remap: RemapConfig,
    /// Convolutional-layer regions, in table order.
    #[serde(default, rename = "region")]
    pub regions: Vec<LayoutRegion>,
    /// The reserved fully connected region, if the model has one.
    #[serde(default)]
    pub fc: Option<FcRegion>,
}

/// File locations, relative to the directory holding `cim.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// Directory containing `<source>.json` weight files.
    #[serde(default = "default_weights_dir")]
    pub weights_dir: String,
    /// Directory receiving all generated artifacts.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Text fragment written before every per-array netlist.
    #[serde(default)]
    pub front: Option<String>,
    /// Text fragment written after every per-array netlist.
    #[serde(default)]
    pub back: Option<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            weights_dir: default_weights_dir(),
            output_dir: default_output_dir(),
            front: None,
            back: None,
        }
    }
}

fn default_weights_dir() -> String {
    "weights".to_string()
}

fn default_output_dir() -> String {
    "build".to_string()
}

/// Device models, sizing, and standard-cell primitive names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Model name of the NMOS pass and select transistors.
    pub nmos_model: String,
    /// Model name of the PMOS precharge transistor.
    pub pmos_model: String,
    /// Device multiplier (`m=`).
    pub multiplier: u32,
    /// Channel length (`l=`).
    pub length: String,
    /// Channel width (`w=`).
    pub width: String,
    /// Adder tree used by columns 0..=6.
    pub adder_tree: String,
    /// Sign-aware adder tree used by the MSB column.
    pub adder_tree_signed: String,
    /// Shift-and-add primitive combining the eight column sums.
    pub bit_shifter: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            nmos_model: "nhvt09_ckt".to_string(),
            pmos_model: "plvt09_ckt".to_string(),
            multiplier: 1,
            length: "40n".to_string(),
            width: "100n".to_string(),
            adder_tree: "AdderTree_domino".to_string(),
            adder_tree_signed: "AdderTree_sign_domino".to_string(),
            bit_shifter: "Bit_shifter_full".to_string(),
        }
    }
}

impl DeviceConfig {
    /// Parameter list appended to every transistor statement, in emission order.
    pub fn params(&self) -> Vec<(String, String)> {
        vec![
            ("m".to_string(), self.multiplier.to_string()),
            ("l".to_string(), self.length.clone()),
            ("w".to_string(), self.width.clone()),
        ]
    }
}

/// Policy knobs for the weight address remapper.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemapConfig {
    /// Reject layouts that leave any `(array row, array col, line)` unwritten.
    pub require_full_coverage: bool,
}

impl Default for RemapConfig {
    fn default() -> Self {
        Self {
            require_full_coverage: true,
        }
    }
}

/// One row of the layout descriptor table.
///
/// Maps the leading `line_count` lines of a source tensor onto lines
/// `base_line..base_line + line_count` of every array in the inclusive block
/// `row_begin..=row_end` × `col_begin..=col_end`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LayoutRegion {
    /// First physical line written.
    pub base_line: usize,
    /// First array row of the block.
    pub row_begin: usize,
    /// Last array row of the block (inclusive).
    pub row_end: usize,
    /// First array column of the block.
    pub col_begin: usize,
    /// Last array column of the block (inclusive).
    pub col_end: usize,
    /// Number of consecutive lines written.
    pub line_count: usize,
    /// Stem of the weight file (`<weights_dir>/<source>.json`).
    #[serde(alias = "data_name")]
    pub source: String,
}

impl LayoutRegion {
    /// Array rows covered by the block.
    pub fn rows(&self) -> RangeInclusive<usize> {
        self.row_begin..=self.row_end
    }

    /// Array columns covered by the block.
    pub fn cols(&self) -> RangeInclusive<usize> {
        self.col_begin..=self.col_end
    }

    /// Physical lines written in every covered array.
    pub fn lines(&self) -> Range<usize> {
        self.base_line..self.base_line + self.line_count
    }

    /// Input channels the source tensor must provide (16 per array row).
    pub fn input_channels(&self) -> usize {
        (self.row_end + 1).saturating_sub(self.row_begin) * INPUT_CHANNELS
    }

    /// Output channels the source tensor must provide (16 per array column).
    pub fn output_channels(&self) -> usize {
        (self.col_end + 1).saturating_sub(self.col_begin) * OUTPUT_CHANNELS
    }
}

/// The fully connected layer, written into a reserved line range of every array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FcRegion {
    /// Stem of the weight file.
    #[serde(alias = "data_name")]
    pub source: String,
    /// First reserved line.
    #[serde(default = "default_fc_base_line")]
    pub base_line: usize,
    /// Number of reserved lines.
    #[serde(default = "default_fc_line_count")]
    pub line_count: usize,
}

impl FcRegion {
    /// Reserved physical lines.
    pub fn lines(&self) -> Range<usize> {
        self.base_line..self.base_line + self.line_count
    }
}

fn default_fc_base_line() -> usize {
    82
}

fn default_fc_line_count() -> usize {
    2
}
