use thiserror::Error;

use crate::kind::Kind;

/// Errors produced by type cache operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// A cycle placeholder points past the outermost struct being built.
    #[error("cycle placeholder escapes its enclosing structs by {escaped} level(s)")]
    UnresolvedCycle { escaped: u32 },

    /// The id does not belong to this cache.
    #[error("unknown type id: {0}")]
    UnknownTypeId(u32),

    #[error("{kind} type takes {expected} element type(s), got {actual}")]
    InvalidArity {
        kind: Kind,
        expected: usize,
        actual: usize,
    },
}

pub type TypeResult<T> = Result<T, TypeError>;
