//! Non-reflected CRC-32 over arbitrary-length bit sequences.
//!
//! Checksums are produced by long division of the zero-padded message by the
//! generator 0x104C11DB7 ([`compute_checksum`]) and verified by clocking
//! `message ++ checksum` through a 33-bit shift register ([`check`]). Bits are
//! processed MSB first with no reflection, zero initial value and no final
//! XOR, so results differ from the zlib/Ethernet CRC-32.

pub mod bits;
pub mod crc32;
pub mod error;

pub use bits::BitSequence;
pub use crc32::{
    check, compute_checksum, CheckOutcome, Generator, CHECKSUM_WIDTH,
    CRC32_NONREFLECTED_GENERATOR,
};
pub use error::CrcError;
