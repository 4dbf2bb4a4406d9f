use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::CrcError;

/// Ordered bits, most significant first. Length is significant: leading
/// zeros are never trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitSequence {
    bits: Vec<bool>,
}

impl BitSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zeros(len: usize) -> Self {
        Self {
            bits: vec![false; len],
        }
    }

    /// Low `width` bits of `value`, MSB first. `width` is capped at 64.
    pub fn from_word(value: u64, width: usize) -> Self {
        let width = width.min(64);
        (0..width).rev().map(|i| (value >> i) & 1 == 1).collect()
    }

    /// Expands each byte MSB first, so the first bit is bit 7 of `data[0]`.
    pub fn from_bytes(data: &[u8]) -> Self {
        data.iter()
            .flat_map(|&b| (0..8).rev().map(move |i| (b >> i) & 1 == 1))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn is_zero(&self) -> bool {
        self.bits.iter().all(|&b| !b)
    }

    pub fn concat(&self, other: &BitSequence) -> Self {
        let mut bits = Vec::with_capacity(self.len() + other.len());
        bits.extend_from_slice(&self.bits);
        bits.extend_from_slice(&other.bits);
        Self { bits }
    }

    /// Copy with the bit at `index` inverted. Out of range leaves the copy unchanged.
    pub fn flipped(&self, index: usize) -> Self {
        let mut out = self.clone();
        if let Some(bit) = out.bits.get_mut(index) {
            *bit = !*bit;
        }
        out
    }

    /// Packs the sequence into the low bits of a word, or `None` past 64 bits.
    pub fn to_word(&self) -> Option<u64> {
        if self.len() > 64 {
            return None;
        }
        Some(self.iter().fold(0u64, |acc, b| (acc << 1) | u64::from(b)))
    }
}

/// GF(2) subtraction of `src` into `dst`, aligning `src[0]` with `dst[0]`.
/// Bits of `dst` past `src.len()` are untouched.
pub fn xor_aligned(dst: &mut [bool], src: &[bool]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

impl From<Vec<bool>> for BitSequence {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl FromIterator<bool> for BitSequence {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl FromStr for BitSequence {
    type Err = CrcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(position, symbol)| match symbol {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(CrcError::InvalidBitSymbol { symbol, position }),
            })
            .collect()
    }
}

impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl Serialize for BitSequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn parse_keeps_leading_zeros() -> Result<()> {
        let bits: BitSequence = "000101".parse()?;
        assert_eq!(bits.len(), 6);
        assert_eq!(bits.to_string(), "000101");
        assert_eq!(bits.to_word(), Some(0b101));
        Ok(())
    }

    #[test]
    fn parse_empty_string() -> Result<()> {
        let bits: BitSequence = "".parse()?;
        assert!(bits.is_empty());
        assert!(bits.is_zero());
        Ok(())
    }

    #[test]
    fn parse_rejects_foreign_symbol() {
        let err = "0110 1".parse::<BitSequence>().unwrap_err();
        assert_eq!(
            err,
            CrcError::InvalidBitSymbol {
                symbol: ' ',
                position: 4
            }
        );

        let err = "01201".parse::<BitSequence>().unwrap_err();
        assert_eq!(
            err,
            CrcError::InvalidBitSymbol {
                symbol: '2',
                position: 2
            }
        );
    }

    #[test]
    fn from_word_is_msb_first() {
        let bits = BitSequence::from_word(0x1_04C1_1DB7, 33);
        assert_eq!(bits.to_string(), "100000100110000010001110110110111");
        assert_eq!(BitSequence::from_word(0b11, 4).to_string(), "0011");
        assert!(BitSequence::from_word(u64::MAX, 0).is_empty());
    }

    #[test]
    fn from_bytes_expands_each_byte() {
        let bits = BitSequence::from_bytes(&[0xA5, 0x01]);
        assert_eq!(bits.to_string(), "1010010100000001");
    }

    #[test]
    fn to_word_refuses_wide_sequences() {
        assert_eq!(BitSequence::zeros(64).to_word(), Some(0));
        assert_eq!(BitSequence::zeros(65).to_word(), None);
    }

    #[test]
    fn concat_and_flip() -> Result<()> {
        let a: BitSequence = "10".parse()?;
        let b: BitSequence = "011".parse()?;
        let joined = a.concat(&b);
        assert_eq!(joined.to_string(), "10011");
        assert_eq!(joined.flipped(0).to_string(), "00011");
        assert_eq!(joined.flipped(4).to_string(), "10010");
        assert_eq!(joined.flipped(5), joined);
        Ok(())
    }

    #[test]
    fn xor_aligned_touches_only_the_prefix() {
        let mut dst = vec![true, false, true, true, false];
        xor_aligned(&mut dst, &[true, true, false]);
        assert_eq!(dst, vec![false, true, true, true, false]);
    }

    #[test]
    fn serializes_as_bit_string() -> Result<()> {
        let bits: BitSequence = "1101".parse()?;
        assert_eq!(serde_json::to_string(&bits)?, "\"1101\"");
        Ok(())
    }
}
