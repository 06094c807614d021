use thiserror::Error;

/// Errors produced while parsing the text form of a digest.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("missing algorithm separator in {0:?}")]
    MissingSeparator(String),

    #[error("unsupported hash algorithm: {0:?}")]
    UnsupportedAlgorithm(String),

    #[error("invalid digit count: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid hex digit {digit:?} at position {position}")]
    InvalidDigit { digit: char, position: usize },
}
