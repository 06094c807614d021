//! Chunk storage for the Keel value store.
//!
//! A chunk is an immutable run of bytes identified by the SHA-1
//! [`Digest`](keel_hash::Digest) of its contents. The decoder never touches
//! storage itself: large collections decode to meta sequences that only
//! record child digests, and traversal fetches those children through a
//! [`ChunkStore`] when it actually needs them.
//!
//! # Design Rules
//!
//! 1. Chunks are immutable once written (content-addressing guarantees this).
//! 2. `put` is idempotent: the same bytes always land under the same digest.
//! 3. Concurrent reads are always safe.
//! 4. The store never interprets chunk contents.
//! 5. Lock failures are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryChunkStore;
pub use traits::ChunkStore;
