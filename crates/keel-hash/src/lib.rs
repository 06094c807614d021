//! Content addresses for the Keel value store.
//!
//! Every chunk in Keel is identified by the SHA-1 digest of its encoded
//! bytes. Digests also travel inside encoded refs, so the 20-byte raw form
//! is part of the wire format and the text form (`sha1-<40 hex digits>`) is
//! what users see and type.

pub mod digest;
pub mod error;

pub use digest::{Digest, DIGEST_ALGORITHM, DIGEST_LEN};
pub use error::HashError;
