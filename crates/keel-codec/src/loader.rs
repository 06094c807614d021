//! Lazy traversal of chunked collections.
//!
//! Decoding a collection never fetches anything: a meta sequence keeps only
//! the refs of its children. The methods here walk those refs on demand,
//! loading each child chunk from a [`ChunkStore`] and decoding it with the
//! same type cache as the parent.

use bytes::{Bytes, BytesMut};
use keel_hash::Digest;
use keel_store::{ChunkStore, StoreError};
use keel_types::{Kind, TypeCache};
use tracing::debug;

use crate::config::DecoderConfig;
use crate::decoder::ValueDecoder;
use crate::error::{DecodeError, DecodeResult};
use crate::sequence::{Chunked, OrderedKey};
use crate::value::{Blob, List, Map, Ref, Set, Value};

/// Fetches and decodes the chunk behind a ref.
pub struct ChunkLoader<'a> {
    store: &'a dyn ChunkStore,
    cache: &'a mut TypeCache,
    config: DecoderConfig,
}

impl<'a> ChunkLoader<'a> {
    pub fn new(store: &'a dyn ChunkStore, cache: &'a mut TypeCache) -> Self {
        Self::with_config(store, cache, DecoderConfig::default())
    }

    pub fn with_config(
        store: &'a dyn ChunkStore,
        cache: &'a mut TypeCache,
        config: DecoderConfig,
    ) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    pub fn cache(&self) -> &TypeCache {
        &*self.cache
    }

    /// Load and decode the value `r` points at.
    pub fn load(&mut self, r: &Ref) -> DecodeResult<Value> {
        let target = r.target();
        let data = self
            .store
            .get(&target)?
            .ok_or(StoreError::NotFound(target))?;
        if self.config.verify_chunk_digests {
            let computed = Digest::of(&data);
            if computed != target {
                return Err(StoreError::DigestMismatch {
                    expected: target,
                    computed,
                }
                .into());
            }
        }
        debug!(chunk = %target.short_hex(), bytes = data.len(), height = r.height(), "loading chunk");
        ValueDecoder::with_config(&data, self.cache, self.config.clone()).read_value()
    }

    fn load_blob(&mut self, r: &Ref) -> DecodeResult<Blob> {
        match self.load(r)? {
            Value::Blob(b) => Ok(b),
            other => Err(mismatch(Kind::Blob, &other)),
        }
    }

    fn load_list(&mut self, r: &Ref) -> DecodeResult<List> {
        match self.load(r)? {
            Value::List(l) => Ok(l),
            other => Err(mismatch(Kind::List, &other)),
        }
    }

    fn load_set(&mut self, r: &Ref) -> DecodeResult<Set> {
        match self.load(r)? {
            Value::Set(s) => Ok(s),
            other => Err(mismatch(Kind::Set, &other)),
        }
    }

    fn load_map(&mut self, r: &Ref) -> DecodeResult<Map> {
        match self.load(r)? {
            Value::Map(m) => Ok(m),
            other => Err(mismatch(Kind::Map, &other)),
        }
    }
}

fn mismatch(expected: Kind, found: &Value) -> DecodeError {
    DecodeError::ChildKindMismatch {
        expected,
        found: found.kind(),
    }
}

/// Key used to pick a child by binary search, when the value has one that
/// can be derived without hashing it.
fn search_key(value: &Value) -> Option<OrderedKey> {
    value
        .kind()
        .is_ordered_by_value()
        .then(|| OrderedKey::ByValue(value.clone()))
}

impl Blob {
    /// Concatenate every leaf chunk.
    pub fn read_all(&self, loader: &mut ChunkLoader<'_>) -> DecodeResult<Bytes> {
        match self.sequence() {
            Chunked::Leaf(bytes) => Ok(bytes.clone()),
            Chunked::Meta(meta) => {
                let mut out = BytesMut::new();
                for tuple in meta.tuples() {
                    let child = loader.load_blob(&tuple.child)?;
                    out.extend_from_slice(&child.read_all(loader)?);
                }
                Ok(out.freeze())
            }
        }
    }
}

impl List {
    /// Element at `index`, loading only the chunks on the path to it.
    pub fn get(&self, index: u64, loader: &mut ChunkLoader<'_>) -> DecodeResult<Option<Value>> {
        let mut node = self.clone();
        let mut index = index;
        loop {
            let next = match node.sequence() {
                Chunked::Leaf(values) => {
                    return Ok(usize::try_from(index)
                        .ok()
                        .and_then(|i| values.get(i))
                        .cloned());
                }
                Chunked::Meta(meta) => {
                    let Some((child, offset)) = meta.locate_index(index) else {
                        return Ok(None);
                    };
                    index -= offset;
                    loader.load_list(&meta.tuples()[child].child)?
                }
            };
            node = next;
        }
    }

    /// Every element in order.
    pub fn to_vec(&self, loader: &mut ChunkLoader<'_>) -> DecodeResult<Vec<Value>> {
        let mut out = Vec::new();
        self.collect_into(loader, &mut out)?;
        Ok(out)
    }

    fn collect_into(&self, loader: &mut ChunkLoader<'_>, out: &mut Vec<Value>) -> DecodeResult<()> {
        match self.sequence() {
            Chunked::Leaf(values) => out.extend(values.iter().cloned()),
            Chunked::Meta(meta) => {
                for tuple in meta.tuples() {
                    loader.load_list(&tuple.child)?.collect_into(loader, out)?;
                }
            }
        }
        Ok(())
    }
}

impl Set {
    /// Membership test.
    ///
    /// Scalar elements descend a single path. Other elements are ordered by
    /// digest in the tree, so every child is searched.
    pub fn contains(&self, value: &Value, loader: &mut ChunkLoader<'_>) -> DecodeResult<bool> {
        match self.sequence() {
            Chunked::Leaf(values) => Ok(values.contains(value)),
            Chunked::Meta(meta) => match search_key(value) {
                Some(key) => match meta.locate_key(&key) {
                    Some(child) => loader
                        .load_set(&meta.tuples()[child].child)?
                        .contains(value, loader),
                    None => Ok(false),
                },
                None => {
                    for tuple in meta.tuples() {
                        if loader.load_set(&tuple.child)?.contains(value, loader)? {
                            return Ok(true);
                        }
                    }
                    Ok(false)
                }
            },
        }
    }
}

impl Map {
    /// Value stored under `key`.
    pub fn get(&self, key: &Value, loader: &mut ChunkLoader<'_>) -> DecodeResult<Option<Value>> {
        match self.sequence() {
            Chunked::Leaf(entries) => Ok(entries
                .iter()
                .find(|e| e.key == *key)
                .map(|e| e.value.clone())),
            Chunked::Meta(meta) => match search_key(key) {
                Some(ordered) => match meta.locate_key(&ordered) {
                    Some(child) => loader.load_map(&meta.tuples()[child].child)?.get(key, loader),
                    None => Ok(None),
                },
                None => {
                    for tuple in meta.tuples() {
                        if let Some(v) = loader.load_map(&tuple.child)?.get(key, loader)? {
                            return Ok(Some(v));
                        }
                    }
                    Ok(None)
                }
            },
        }
    }
}
