//! Source weight tensors and their on-disk JSON form.
//!
//! A weight file holds a row-major tensor of 8-bit sign-magnitude codes,
//! either as raw bits or as integer values:
//!
//! ```json
//! { "shape": [16, 3, 1, 16], "weight_bits": [0, 1, 0, 0, 1, 1, 0, 1, ...] }
//! { "shape": [64, 32], "values": [12, -7, 0, ...] }
//! ```
//!
//! Raw bits are kept as written; values outside {0, 1} survive loading and are
//! rejected when the bit reaches the encoder.

use crate::error::WeightError;
use cimgen_common::{WeightCode, WEIGHT_BITS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An n-dimensional tensor of 8-bit weight codes.
///
/// `shape` excludes the trailing bit axis; every element is a run of
/// [`WEIGHT_BITS`] entries, sign first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceWeightTensor {
    shape: Vec<usize>,
    bits: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WeightFile {
    shape: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weight_bits: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    values: Option<Vec<i32>>,
}

impl SourceWeightTensor {
    /// Creates a tensor from raw bits (row-major, 8 entries per element).
    ///
    /// Returns `None` if `bits` does not match the shape.
    pub fn from_bits(shape: Vec<usize>, bits: Vec<u8>) -> Option<Self> {
        let elements: usize = shape.iter().product();
        (bits.len() == elements * WEIGHT_BITS).then_some(Self { shape, bits })
    }

    /// Creates a tensor by sign-magnitude encoding integer codes.
    pub fn from_values(shape: Vec<usize>, values: &[i32]) -> Result<Self, String> {
        let elements: usize = shape.iter().product();
        if values.len() != elements {
            return Err(format!(
                "shape {shape:?} needs {elements} values, got {}",
                values.len()
            ));
        }
        let mut bits = Vec::with_capacity(elements * WEIGHT_BITS);
        for &value in values {
            let code = WeightCode::from_value(value).map_err(|e| e.to_string())?;
            bits.extend_from_slice(code.bits());
        }
        Ok(Self { shape, bits })
    }

    /// Creates a tensor with every element set to `code`.
    pub fn filled(shape: Vec<usize>, code: WeightCode) -> Self {
        let elements: usize = shape.iter().product();
        let bits = code.bits().repeat(elements);
        Self { shape, bits }
    }

    /// Loads a tensor from a JSON weight file.
    pub fn load(path: &Path) -> Result<Self, WeightError> {
        let content = std::fs::read_to_string(path).map_err(|e| WeightError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content).map_err(|reason| WeightError::Parse {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parses a tensor from the JSON weight file format.
    pub fn parse(content: &str) -> Result<Self, String> {
        let file: WeightFile = serde_json::from_str(content).map_err(|e| e.to_string())?;
        match (file.weight_bits, file.values) {
            (Some(bits), None) => {
                let elements: usize = file.shape.iter().product();
                let got = bits.len();
                Self::from_bits(file.shape, bits).ok_or_else(|| {
                    format!(
                        "expected {} weight bits ({elements} elements), got {got}",
                        elements * WEIGHT_BITS
                    )
                })
            }
            (None, Some(values)) => Self::from_values(file.shape, &values),
            (Some(_), Some(_)) => Err("both `weight_bits` and `values` are present".to_string()),
            (None, None) => Err("missing `weight_bits` or `values`".to_string()),
        }
    }

    /// Serializes the tensor to the raw-bits JSON form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&WeightFile {
            shape: self.shape.clone(),
            weight_bits: Some(self.bits.clone()),
            values: None,
        })
    }

    /// Shape of the tensor, excluding the bit axis.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions, excluding the bit axis.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Returns the 8 bits of the element at `index`, or `None` when out of bounds.
    pub fn element(&self, index: &[usize]) -> Option<&[u8]> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut flat = 0usize;
        for (&i, &dim) in index.iter().zip(&self.shape) {
            if i >= dim {
                return None;
            }
            flat = flat * dim + i;
        }
        let start = flat * WEIGHT_BITS;
        self.bits.get(start..start + WEIGHT_BITS)
    }
}
