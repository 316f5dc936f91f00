//! Sign-magnitude 8-bit weight codes.
//!
//! A quantized weight is stored as one sign bit followed by seven magnitude
//! bits, most significant first. This is not two's complement: `-0` exists
//! and the representable range is `-127..=127`.

use crate::geometry::WEIGHT_BITS;
use serde::{Deserialize, Serialize};

/// Errors produced when building a [`WeightCode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WeightCodeError {
    /// The integer value cannot be represented with 7 magnitude bits.
    #[error("weight value {0} is outside the sign-magnitude range -127..=127")]
    OutOfRange(i32),

    /// A bit slice entry was neither 0 nor 1.
    #[error("weight bit {position} has value {value}, expected 0 or 1")]
    InvalidBit {
        /// Bit position (0 = sign).
        position: usize,
        /// The offending value.
        value: u8,
    },

    /// The bit slice did not contain exactly 8 entries.
    #[error("expected 8 weight bits, got {0}")]
    WrongWidth(usize),
}

/// An 8-bit sign-magnitude weight, bit 0 = sign, bit 7 = magnitude LSB.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct WeightCode([u8; WEIGHT_BITS]);

impl WeightCode {
    /// Encodes an integer code in `-127..=127`.
    pub fn from_value(value: i32) -> Result<Self, WeightCodeError> {
        if !(-127..=127).contains(&value) {
            return Err(WeightCodeError::OutOfRange(value));
        }
        let magnitude = value.unsigned_abs();
        let mut bits = [0u8; WEIGHT_BITS];
        bits[0] = u8::from(value < 0);
        for (position, bit) in bits.iter_mut().enumerate().skip(1) {
            *bit = ((magnitude >> (WEIGHT_BITS - 1 - position)) & 1) as u8;
        }
        Ok(Self(bits))
    }

    /// Builds a code from 8 bit values, each of which must be 0 or 1.
    pub fn from_bits(bits: &[u8]) -> Result<Self, WeightCodeError> {
        if bits.len() != WEIGHT_BITS {
            return Err(WeightCodeError::WrongWidth(bits.len()));
        }
        let mut out = [0u8; WEIGHT_BITS];
        for (position, (&value, slot)) in bits.iter().zip(out.iter_mut()).enumerate() {
            if value > 1 {
                return Err(WeightCodeError::InvalidBit { position, value });
            }
            *slot = value;
        }
        Ok(Self(out))
    }

    /// Returns the bits, sign first.
    pub fn bits(&self) -> &[u8; WEIGHT_BITS] {
        &self.0
    }

    /// Decodes back to an integer code. `-0` decodes to `0`.
    pub fn value(&self) -> i32 {
        let magnitude = self.0[1..]
            .iter()
            .fold(0i32, |acc, &bit| (acc << 1) | i32::from(bit));
        if self.0[0] == 1 {
            -magnitude
        } else {
            magnitude
        }
    }
}
