//! DECIMAL decoder.
//!
//! Decimals travel as 16-byte little-endian IEEE 754 decimal128 values in
//! binary integer (BID) encoding:
//! - bit 127: sign
//! - bits 113..=126: biased exponent
//! - bits 0..=112: coefficient

use std::fmt;

const EXPONENT_BIAS: i32 = 6176;
const COEFFICIENT_MASK: u128 = (1u128 << 113) - 1;

/// Whether the raw bytes carry the DECIMAL NULL marker.
pub fn is_null_decimal(bytes: &[u8; 16]) -> bool {
    bytes[15] & 0x70 == 0x70
}

/// A DECIMAL value kept in its wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal128([u8; 16]);

impl Decimal128 {
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    fn raw(&self) -> u128 {
        u128::from_le_bytes(self.0)
    }

    pub fn is_negative(&self) -> bool {
        self.raw() >> 127 == 1
    }

    /// Unbiased decimal exponent.
    pub fn exponent(&self) -> i32 {
        ((self.raw() >> 113) & 0x3fff) as i32 - EXPONENT_BIAS
    }

    pub fn coefficient(&self) -> u128 {
        self.raw() & COEFFICIENT_MASK
    }

    /// Parse into `f64` (lossy).
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }
}

impl fmt::Display for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coefficient = self.coefficient();
        if coefficient == 0 {
            return write!(f, "0");
        }
        if self.is_negative() {
            write!(f, "-")?;
        }

        let digits = coefficient.to_string();
        let exponent = self.exponent();
        if exponent >= 0 {
            write!(f, "{}{}", digits, "0".repeat(exponent as usize))
        } else {
            let scale = exponent.unsigned_abs() as usize;
            if digits.len() > scale {
                let (int, frac) = digits.split_at(digits.len() - scale);
                write!(f, "{}.{}", int, frac)
            } else {
                write!(f, "0.{}{}", "0".repeat(scale - digits.len()), digits)
            }
        }
    }
}
