//! Packed vectors of 4-state logic values and their bit-string form.
//!
//! A bit-string ("binstr") is the MSB-first text rendering of a vector, e.g.
//! `"10XZ"`. Signal handles expose their value as a binstr so that a
//! destination vector can take new bits without losing its own width.

use crate::logic::Logic;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A vector of 4-state [`Logic`] values packed for efficient storage.
///
/// Each logic value occupies 2 bits, with 32 values packed per `u64` word.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PackedWords")]
pub struct LogicVec {
    width: u32,
    /// Packed storage: 2 bits per logic value, 32 values per u64.
    data: Vec<u64>,
}

/// Number of logic values packed per u64 word.
const VALUES_PER_WORD: u32 = 32;

/// Unchecked serialized form of a [`LogicVec`].
#[derive(Deserialize)]
struct PackedWords {
    width: u32,
    data: Vec<u64>,
}

impl TryFrom<PackedWords> for LogicVec {
    type Error = String;

    fn try_from(raw: PackedWords) -> Result<Self, Self::Error> {
        let expected = word_count(raw.width);
        if raw.data.len() != expected {
            return Err(format!(
                "logic vector of width {} needs {expected} packed words, got {}",
                raw.width,
                raw.data.len()
            ));
        }
        Ok(Self {
            width: raw.width,
            data: raw.data,
        })
    }
}

/// A bit-string contained a character that is not a 4-state logic value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid character '{ch}' at position {position} in bit-string \"{binstr}\"")]
pub struct BinstrError {
    /// The offending bit-string.
    pub binstr: String,
    /// The rejected character.
    pub ch: char,
    /// Character position, counted from the left (MSB) end.
    pub position: usize,
}

impl LogicVec {
    /// Creates a new `LogicVec` of the given width, initialized to all `Zero`.
    pub fn new(width: u32) -> Self {
        Self {
            width,
            data: vec![0; word_count(width)],
        }
    }

    /// Creates a `LogicVec` with every bit set to `value`.
    pub fn filled(width: u32, value: Logic) -> Self {
        let mut v = Self::new(width);
        for i in 0..width {
            v.set(i, value);
        }
        v
    }

    /// Returns the number of logic values in this vector.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Gets the logic value at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn get(&self, index: u32) -> Logic {
        assert!(
            index < self.width,
            "index {index} out of bounds for width {}",
            self.width
        );
        let word_idx = (index / VALUES_PER_WORD) as usize;
        let bit_offset = (index % VALUES_PER_WORD) * 2;
        Logic::from_bits(self.data[word_idx] >> bit_offset)
    }

    /// Sets the logic value at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn set(&mut self, index: u32, value: Logic) {
        assert!(
            index < self.width,
            "index {index} out of bounds for width {}",
            self.width
        );
        let word_idx = (index / VALUES_PER_WORD) as usize;
        let bit_offset = (index % VALUES_PER_WORD) * 2;
        let mask = !(0b11u64 << bit_offset);
        self.data[word_idx] = (self.data[word_idx] & mask) | ((value as u64) << bit_offset);
    }

    /// Creates a `LogicVec` from a `u64` value with the given width.
    ///
    /// Bits beyond the given width are ignored.
    pub fn from_u64(value: u64, width: u32) -> Self {
        let mut v = Self::new(width);
        for i in 0..width.min(64) {
            if (value >> i) & 1 != 0 {
                v.set(i, Logic::One);
            }
        }
        v
    }

    /// Converts to a `u64` if every bit is definite and the width fits.
    pub fn to_u64(&self) -> Option<u64> {
        if self.width > 64 {
            return None;
        }
        let mut result = 0u64;
        for i in 0..self.width {
            match self.get(i) {
                Logic::Zero => {}
                Logic::One => result |= 1 << i,
                Logic::X | Logic::Z => return None,
            }
        }
        Some(result)
    }

    /// Returns true if no bit is `X` or `Z`.
    pub fn is_resolvable(&self) -> bool {
        (0..self.width).all(|i| self.get(i).is_definite())
    }

    /// Parses a bit-string like `"10XZ"` into a vector of the same width.
    ///
    /// The leftmost character is the most significant bit.
    pub fn from_binstr(s: &str) -> Result<Self, BinstrError> {
        let bits = parse_binstr(s)?;
        let mut v = Self::new(bits.len() as u32);
        for (i, bit) in bits.into_iter().enumerate() {
            v.set(i as u32, bit);
        }
        Ok(v)
    }

    /// Returns the MSB-first bit-string of this vector.
    pub fn binstr(&self) -> String {
        (0..self.width).rev().map(|i| self.get(i).to_char()).collect()
    }

    /// Assigns a bit-string into this vector while keeping its width.
    ///
    /// A shorter bit-string is zero-extended on the MSB side. A longer one
    /// keeps its least significant `width` characters. On error the vector
    /// is left unchanged.
    pub fn assign_binstr(&mut self, s: &str) -> Result<(), BinstrError> {
        let bits = parse_binstr(s)?;
        for i in 0..self.width {
            let bit = bits.get(i as usize).copied().unwrap_or(Logic::Zero);
            self.set(i, bit);
        }
        Ok(())
    }
}

/// Parses a bit-string into LSB-first logic values.
fn parse_binstr(s: &str) -> Result<Vec<Logic>, BinstrError> {
    let mut bits = Vec::with_capacity(s.len());
    for (position, ch) in s.chars().enumerate() {
        let bit = Logic::from_char(ch).ok_or_else(|| BinstrError {
            binstr: s.to_string(),
            ch,
            position,
        })?;
        bits.push(bit);
    }
    bits.reverse();
    Ok(bits)
}

impl fmt::Display for LogicVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.width).rev() {
            write!(f, "{}", self.get(i))?;
        }
        Ok(())
    }
}

impl fmt::Debug for LogicVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LogicVec({self})")
    }
}

/// Returns the number of u64 words needed to store `width` logic values.
fn word_count(width: u32) -> usize {
    width.div_ceil(VALUES_PER_WORD) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_initializes_to_zero() {
        let v = LogicVec::new(64);
        assert_eq!(v.width(), 64);
        for i in 0..64 {
            assert_eq!(v.get(i), Logic::Zero);
        }
    }

    #[test]
    fn set_get_across_words() {
        let mut v = LogicVec::new(100);
        v.set(0, Logic::One);
        v.set(50, Logic::X);
        v.set(99, Logic::Z);
        assert_eq!(v.get(0), Logic::One);
        assert_eq!(v.get(50), Logic::X);
        assert_eq!(v.get(99), Logic::Z);
        assert_eq!(v.get(1), Logic::Zero);
    }

    #[test]
    fn from_binstr_msb_first() {
        let v = LogicVec::from_binstr("10XZ").unwrap();
        assert_eq!(v.width(), 4);
        assert_eq!(v.get(3), Logic::One);
        assert_eq!(v.get(2), Logic::Zero);
        assert_eq!(v.get(1), Logic::X);
        assert_eq!(v.get(0), Logic::Z);
        assert_eq!(v.binstr(), "10XZ");
    }

    #[test]
    fn from_binstr_reports_bad_character() {
        let err = LogicVec::from_binstr("10A1").unwrap_err();
        assert_eq!(err.ch, 'A');
        assert_eq!(err.position, 2);
        assert_eq!(
            err.to_string(),
            "invalid character 'A' at position 2 in bit-string \"10A1\""
        );
    }

    #[test]
    fn assign_binstr_same_width() {
        let mut v = LogicVec::new(4);
        v.assign_binstr("1x01").unwrap();
        assert_eq!(v.binstr(), "1X01");
        assert_eq!(v.width(), 4);
    }

    #[test]
    fn assign_binstr_zero_extends_short_input() {
        let mut v = LogicVec::filled(8, Logic::One);
        v.assign_binstr("101").unwrap();
        assert_eq!(v.width(), 8);
        assert_eq!(v.binstr(), "00000101");
    }

    #[test]
    fn assign_binstr_truncates_long_input() {
        let mut v = LogicVec::new(4);
        v.assign_binstr("11110010").unwrap();
        assert_eq!(v.binstr(), "0010");
    }

    #[test]
    fn assign_binstr_error_leaves_value() {
        let mut v = LogicVec::from_u64(0b1010, 4);
        assert!(v.assign_binstr("1q00").is_err());
        assert_eq!(v.binstr(), "1010");
    }

    #[test]
    fn u64_conversion() {
        let v = LogicVec::from_u64(0xA5, 8);
        assert_eq!(format!("{v}"), "10100101");
        assert_eq!(v.to_u64(), Some(0xA5));
        assert!(v.is_resolvable());

        let x = LogicVec::filled(8, Logic::X);
        assert_eq!(x.to_u64(), None);
        assert!(!x.is_resolvable());
        assert_eq!(LogicVec::new(65).to_u64(), None);
    }

    #[test]
    fn debug_format() {
        let v = LogicVec::from_binstr("01").unwrap();
        assert_eq!(format!("{v:?}"), "LogicVec(01)");
    }

    #[test]
    fn serde_roundtrip() {
        let v = LogicVec::from_binstr("10XZ1010").unwrap();
        let json = serde_json::to_string(&v).unwrap();
        let back: LogicVec = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }

    #[test]
    fn deserialize_rejects_short_storage() {
        let err = serde_json::from_str::<LogicVec>(r#"{"width":100,"data":[]}"#).unwrap_err();
        assert!(err.to_string().contains("needs 4 packed words, got 0"));
        assert!(serde_json::from_str::<LogicVec>(r#"{"width":4,"data":[0,0]}"#).is_err());
    }
}
