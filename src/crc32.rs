use std::str::FromStr;

use serde::Serialize;

use crate::bits::{xor_aligned, BitSequence};
use crate::error::CrcError;

/// x^32 + x^26 + x^23 + x^22 + x^16 + x^12 + x^11 + x^10 + x^8 + x^7 + x^5 + x^4 + x^2 + x + 1
pub const CRC32_NONREFLECTED_GENERATOR: u64 = 0x1_04C1_1DB7;
pub const CRC32_GENERATOR_BITS: usize = 33;
pub const CHECKSUM_WIDTH: usize = CRC32_GENERATOR_BITS - 1;

/// Divisor polynomial of degree `width()`, stored with its leading 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    bits: BitSequence,
}

impl Generator {
    pub fn new(bits: BitSequence) -> Result<Self, CrcError> {
        match bits.get(0) {
            None => Err(CrcError::InvalidGenerator {
                reason: "generator is empty",
            }),
            Some(false) => Err(CrcError::InvalidGenerator {
                reason: "leading coefficient must be 1",
            }),
            Some(true) => Ok(Self { bits }),
        }
    }

    pub fn crc32() -> Self {
        Self {
            bits: BitSequence::from_word(CRC32_NONREFLECTED_GENERATOR, CRC32_GENERATOR_BITS),
        }
    }

    /// Checksum width W; the generator itself is W+1 bits.
    pub fn width(&self) -> usize {
        self.bits.len() - 1
    }

    pub fn bits(&self) -> &BitSequence {
        &self.bits
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::crc32()
    }
}

impl FromStr for Generator {
    type Err = CrcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.parse()?)
    }
}

/// Result of running a stream through the shift register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub accepted: bool,
    /// Final W+1 bit register.
    pub remainder: BitSequence,
}

/// Remainder of `message * x^W` divided by `generator`, W bits long.
///
/// The message is padded with W zero bits and the generator is subtracted
/// wherever a pivot bit is set. Only the original message positions act as
/// pivots; the padding only receives the XOR spill-over.
pub fn compute_checksum(message: &BitSequence, generator: &Generator) -> BitSequence {
    let width = generator.width();
    let poly = generator.bits().as_slice();

    let mut buffer = message.as_slice().to_vec();
    buffer.resize(message.len() + width, false);

    for i in 0..message.len() {
        if buffer[i] {
            xor_aligned(&mut buffer[i..], poly);
        }
    }

    BitSequence::from(buffer.split_off(message.len()))
}

/// Serial division of `message ++ checksum` through a W+1 bit register.
///
/// Each bit is shifted in at the low end, dropping the high end. Whenever
/// the high end then holds a 1, the generator is XORed across the whole
/// register. The stream is accepted iff the register ends at zero.
///
/// Streams shorter than W bits cannot hold a checksum and are rejected with
/// [`CrcError::InputTooShort`]. Exactly W bits is the encoding of the empty
/// message.
pub fn check(bitstream: &BitSequence, generator: &Generator) -> Result<CheckOutcome, CrcError> {
    let width = generator.width();
    if bitstream.len() < width {
        return Err(CrcError::InputTooShort {
            len: bitstream.len(),
            required: width,
        });
    }

    let poly = generator.bits().as_slice();
    let mut register = vec![false; width + 1];

    for bit in bitstream.iter() {
        register.rotate_left(1);
        if let Some(low) = register.last_mut() {
            *low = bit;
        }
        if register[0] {
            xor_aligned(&mut register, poly);
        }
    }

    let remainder = BitSequence::from(register);
    Ok(CheckOutcome {
        accepted: remainder.is_zero(),
        remainder,
    })
}
