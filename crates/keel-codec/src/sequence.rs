//! Chunked sequence representation shared by blobs, lists, sets and maps.
//!
//! A collection is either a leaf, holding its elements inline, or a meta
//! sequence: a search-tree node whose tuples point at child chunks. Each
//! tuple records the child's ref, an [`OrderedKey`] bounding the keys
//! reachable through it, and the running count of leaf elements up to and
//! including that child. Both columns are monotonic, so a lookup can pick
//! the right child by binary search without loading any of them.

use std::cmp::Ordering;

use bytes::Bytes;
use keel_hash::Digest;

use crate::error::{DecodeError, DecodeResult};
use crate::value::{MapEntry, Ref, Value};

/// Inline elements or a node over child chunks.
#[derive(Clone, Debug, PartialEq)]
pub enum Chunked<L> {
    Leaf(L),
    Meta(MetaSequence),
}

impl<L: LeafLen> Chunked<L> {
    /// Number of leaf-level elements, without loading any child.
    pub fn len(&self) -> u64 {
        match self {
            Self::Leaf(leaf) => leaf.leaf_len() as u64,
            Self::Meta(meta) => meta.leaf_count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<L> Chunked<L> {
    pub fn is_meta(&self) -> bool {
        matches!(self, Self::Meta(_))
    }

    pub fn leaf(&self) -> Option<&L> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Meta(_) => None,
        }
    }

    pub fn meta(&self) -> Option<&MetaSequence> {
        match self {
            Self::Leaf(_) => None,
            Self::Meta(meta) => Some(meta),
        }
    }
}

/// Element count of an inline leaf.
pub trait LeafLen {
    fn leaf_len(&self) -> usize;
}

impl LeafLen for Bytes {
    fn leaf_len(&self) -> usize {
        self.len()
    }
}

impl LeafLen for Vec<Value> {
    fn leaf_len(&self) -> usize {
        self.len()
    }
}

impl LeafLen for Vec<MapEntry> {
    fn leaf_len(&self) -> usize {
        self.len()
    }
}

/// Comparable summary of the largest key under a meta sequence child.
///
/// Keys of kinds with a natural order (bool, number, string) are kept by
/// value. Anything else is encoded as a ref to the key and ordered by that
/// ref's target digest, so siblings can be ordered without loading it.
/// Value-ordered keys sort before digest-ordered ones.
#[derive(Clone, Debug)]
pub enum OrderedKey {
    ByValue(Value),
    ByDigest(Digest),
}

impl OrderedKey {
    /// Derive the key for a decoded value, or `None` if its kind has no
    /// natural order and it is not a ref.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Ref(r) => Some(Self::ByDigest(r.target())),
            v if v.kind().is_ordered_by_value() => Some(Self::ByValue(v.clone())),
            _ => None,
        }
    }

    pub fn is_ordered_by_value(&self) -> bool {
        matches!(self, Self::ByValue(_))
    }
}

fn scalar_cmp(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x.total_cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => a.kind().cmp(&b.kind()),
    }
}

impl Ord for OrderedKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::ByValue(a), Self::ByValue(b)) => scalar_cmp(a, b),
            (Self::ByValue(_), Self::ByDigest(_)) => Ordering::Less,
            (Self::ByDigest(_), Self::ByValue(_)) => Ordering::Greater,
            (Self::ByDigest(a), Self::ByDigest(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for OrderedKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OrderedKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderedKey {}

/// One child pointer of a meta sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct MetaTuple {
    pub child: Ref,
    pub key: OrderedKey,
    /// Leaf elements reachable through this child and every earlier one.
    pub cumulative_leaves: u64,
}

/// A search-tree node over child chunks. Children are never loaded here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetaSequence {
    tuples: Vec<MetaTuple>,
}

impl MetaSequence {
    pub fn new(tuples: Vec<MetaTuple>) -> Self {
        Self { tuples }
    }

    pub fn tuples(&self) -> &[MetaTuple] {
        &self.tuples
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Total leaf elements under this node.
    pub fn leaf_count(&self) -> u64 {
        self.tuples.last().map_or(0, |t| t.cumulative_leaves)
    }

    /// Check that leaf counts strictly increase and keys never decrease.
    pub fn validate(&self) -> DecodeResult<()> {
        for (i, pair) in self.tuples.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.cumulative_leaves <= prev.cumulative_leaves {
                return Err(DecodeError::MalformedMeta {
                    index: i + 1,
                    reason: format!(
                        "cumulative leaf count {} does not exceed {}",
                        next.cumulative_leaves, prev.cumulative_leaves
                    ),
                });
            }
            if next.key < prev.key {
                return Err(DecodeError::MalformedMeta {
                    index: i + 1,
                    reason: "ordered key decreases".into(),
                });
            }
        }
        Ok(())
    }

    /// The child holding leaf element `index`, with the number of leaf
    /// elements that precede that child.
    pub fn locate_index(&self, index: u64) -> Option<(usize, u64)> {
        let child = self.tuples.partition_point(|t| t.cumulative_leaves <= index);
        if child == self.tuples.len() {
            return None;
        }
        let offset = match child {
            0 => 0,
            n => self.tuples[n - 1].cumulative_leaves,
        };
        Some((child, offset))
    }

    /// The first child whose key bound is not below `key`.
    pub fn locate_key(&self, key: &OrderedKey) -> Option<usize> {
        let child = self.tuples.partition_point(|t| t.key < *key);
        (child < self.tuples.len()).then_some(child)
    }
}
