use std::io;
use thiserror::Error;

/// A range or codec that can never produce meaningful values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("invalid price range [{min}, {max}]: bounds must be finite with min < max")]
    InvalidRange { min: f64, max: f64 },

    #[error("unsupported container width {0} (must be 2-64 bits)")]
    UnsupportedWidth(u32),

    #[error("scale {scale} leaves no sign bit in a {width}-bit container (need scale < {})", .width.saturating_sub(1))]
    InsufficientHeadroom { scale: u32, width: u32 },
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{value} * 2^{scale} does not fit in a signed {width}-bit integer")]
pub struct OverflowError {
    pub value: f64,
    pub scale: u32,
    pub width: u32,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseBitsError {
    #[error("empty bit string")]
    Empty,

    #[error("invalid digit {digit:?} at position {position}")]
    InvalidDigit { digit: char, position: usize },

    #[error("bit string has {0} digits, at most 64 are supported")]
    TooLong(usize),

    #[error("bit string has {0} digits, a float needs 32 or 64")]
    NotAFloatWidth(usize),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Overflow(#[from] OverflowError),

    #[error(transparent)]
    ParseBits(#[from] ParseBitsError),

    #[error("could not write diagnostic output: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
