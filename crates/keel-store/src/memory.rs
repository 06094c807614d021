use std::collections::HashMap;
use std::sync::RwLock;

use bytes::Bytes;
use keel_hash::Digest;
use tracing::trace;

use crate::error::{StoreError, StoreResult};
use crate::traits::ChunkStore;

/// In-memory, HashMap-based chunk store.
///
/// Intended for tests and embedding. Chunks sit behind a `RwLock`; `Bytes`
/// makes handing them out a reference-count bump rather than a copy.
#[derive(Debug, Default)]
pub struct MemoryChunkStore {
    chunks: RwLock<HashMap<Digest, Bytes>>,
}

impl MemoryChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chunks currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        let map = self.chunks.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Total bytes across all stored chunks.
    pub fn total_bytes(&self) -> StoreResult<u64> {
        let map = self.chunks.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.values().map(|c| c.len() as u64).sum())
    }

    /// All stored digests, sorted.
    pub fn digests(&self) -> StoreResult<Vec<Digest>> {
        let map = self.chunks.read().map_err(|_| StoreError::Poisoned)?;
        let mut digests: Vec<Digest> = map.keys().copied().collect();
        digests.sort();
        Ok(digests)
    }
}

impl ChunkStore for MemoryChunkStore {
    fn get(&self, digest: &Digest) -> StoreResult<Option<Bytes>> {
        let map = self.chunks.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(digest).cloned())
    }

    fn has(&self, digest: &Digest) -> StoreResult<bool> {
        let map = self.chunks.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.contains_key(digest))
    }

    fn put(&self, data: Bytes) -> StoreResult<Digest> {
        let digest = Digest::of(&data);
        let mut map = self.chunks.write().map_err(|_| StoreError::Poisoned)?;
        map.entry(digest).or_insert(data);
        trace!(chunk = %digest.short_hex(), "stored chunk");
        Ok(digest)
    }
}
