use bytes::Bytes;
use keel_hash::Digest;

use crate::error::StoreResult;

/// Content-addressed chunk store.
///
/// Implementations must satisfy:
/// - Chunks are immutable once written; `put` of the same bytes is a no-op
///   returning the same digest.
/// - Concurrent reads are always safe.
/// - The store never interprets chunk contents.
pub trait ChunkStore: Send + Sync {
    /// Fetch a chunk by digest.
    ///
    /// Returns `Ok(None)` if the chunk does not exist.
    fn get(&self, digest: &Digest) -> StoreResult<Option<Bytes>>;

    /// Check whether a chunk exists.
    fn has(&self, digest: &Digest) -> StoreResult<bool>;

    /// Store a chunk and return its digest.
    fn put(&self, data: Bytes) -> StoreResult<Digest>;

    /// Fetch several chunks.
    ///
    /// Default implementation calls `get()` for each digest.
    fn get_many(&self, digests: &[Digest]) -> StoreResult<Vec<Option<Bytes>>> {
        digests.iter().map(|d| self.get(d)).collect()
    }
}
