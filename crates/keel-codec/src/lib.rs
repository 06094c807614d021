//! Decode path of the Keel value store.
//!
//! A chunk holds one encoded value: a type, followed by a payload shaped by
//! that type. [`ValueDecoder`] turns such a buffer into a [`Value`] while
//! interning every type it meets into a shared [`TypeCache`], so structurally
//! equal types decode to the same [`TypeId`](keel_types::TypeId).
//!
//! Large collections are stored as trees of chunks. Their root decodes to a
//! [`MetaSequence`] that records child refs without fetching them; a
//! [`ChunkLoader`] follows those refs on demand.
//!
//! ```no_run
//! use keel_codec::{decode_value, Value};
//! use keel_types::TypeCache;
//!
//! let mut cache = TypeCache::new();
//! let value = decode_value(&[0x00, 0x01], &mut cache)?;
//! assert_eq!(value, Value::Bool(true));
//! # Ok::<(), keel_codec::DecodeError>(())
//! ```

pub mod config;
pub mod cursor;
pub mod decoder;
pub mod error;
pub mod loader;
pub mod sequence;
pub mod value;

#[cfg(test)]
mod fixture;

pub use config::DecoderConfig;
pub use cursor::ByteCursor;
pub use decoder::{decode_type, decode_value, ValueDecoder};
pub use error::{ConfigError, DecodeError, DecodeResult};
pub use loader::ChunkLoader;
pub use sequence::{Chunked, LeafLen, MetaSequence, MetaTuple, OrderedKey};
pub use value::{Blob, List, Map, MapEntry, Ref, Set, Struct, Value, ValueHasher};
