use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrcError {
    #[error("invalid generator polynomial: {reason}")]
    InvalidGenerator { reason: &'static str },

    #[error("bitstream of {len} bits is shorter than the {required}-bit checksum")]
    InputTooShort { len: usize, required: usize },

    #[error("invalid bit symbol {symbol:?} at position {position}")]
    InvalidBitSymbol { symbol: char, position: usize },
}
