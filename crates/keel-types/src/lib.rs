//! Type descriptors for the Keel value store.
//!
//! Every encoded Keel value is prefixed by its full type. This crate owns
//! the in-memory side of those types:
//!
//! - [`Kind`]: the one-byte tag naming a value's or type's basic shape
//! - [`TypeCache`]: an arena of canonical type descriptors addressed by
//!   [`TypeId`]. Structurally equal compound, union and struct types share a
//!   single id, so id equality stands in for structural equality.
//! - the struct shape trie: maps the token sequence of a struct encoding
//!   (name, field names, field type ids) to its interned type, so a decoder
//!   can recognize a repeated shape straight off the wire.
//!
//! # Cycles
//!
//! Self-referential struct types are encoded with `Cycle(n)` placeholders
//! that point `n` enclosing structs up. The cache interns the *wire* form
//! (placeholders included) and [`TypeCache::resolve`] turns it into a
//! resolved graph in which every placeholder is replaced by the arena slot
//! of the struct it names.
//!
//! # Locking
//!
//! A `TypeCache` performs no internal synchronization. Callers sharing one
//! cache between threads must hold an external lock for the full duration
//! of a decode.

pub mod cache;
pub mod error;
pub mod kind;
pub mod trie;

pub use cache::{CacheStats, StructDesc, StructField, TypeCache, TypeDesc, TypeId};
pub use error::{TypeError, TypeResult};
pub use kind::Kind;
pub use trie::TrieNodeId;
