use keel_store::StoreError;
use keel_types::{Kind, TypeError};
use thiserror::Error;

/// Errors produced while decoding values, types, and sequences.
///
/// Every error aborts the whole decode call: no partially built value is
/// ever returned.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unexpected end of input at offset {offset}: needed {needed} byte(s), {remaining} left")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("unknown kind tag {tag} at offset {offset}")]
    UnknownKind { tag: u8, offset: usize },

    #[error("a value instance can never have type {0}")]
    NotAValueKind(Kind),

    #[error("meta sequence child must be a ref, got {0}")]
    MetaChildNotRef(Kind),

    #[error("meta sequence key of kind {0} is neither a ref nor ordered by value")]
    UnorderableKey(Kind),

    #[error("malformed meta sequence at tuple {index}: {reason}")]
    MalformedMeta { index: usize, reason: String },

    #[error("child chunk decoded to {found}, expected {expected}")]
    ChildKindMismatch { expected: Kind, found: Kind },

    #[error("nesting exceeds maximum depth {max}")]
    DepthExceeded { max: usize },

    #[error("type error: {0}")]
    Type(#[from] TypeError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl DecodeError {
    /// `true` when the input is corrupt or an upstream invariant is broken,
    /// as opposed to running out of input or a storage failure.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::UnknownKind { .. }
                | Self::NotAValueKind(_)
                | Self::MetaChildNotRef(_)
                | Self::UnorderableKey(_)
                | Self::MalformedMeta { .. }
                | Self::ChildKindMismatch { .. }
                | Self::Type(_)
        )
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors loading a [`DecoderConfig`](crate::DecoderConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid decoder config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid decoder config: {0}")]
    Invalid(String),
}
