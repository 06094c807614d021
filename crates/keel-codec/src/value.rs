//! Decoded, immutable values.
//!
//! Collections and structs are cheap-clone handles over shared, immutable
//! data, so a decoded graph can be passed around and partially shared
//! without copying.

use std::sync::{Arc, OnceLock};

use bytes::Bytes;
use keel_hash::Digest;
use keel_types::{Kind, TypeCache, TypeId};

use crate::sequence::Chunked;

/// A decoded value.
///
/// The kind of a value is never `Union`, `Cycle` or `Value`: those describe
/// types only.
///
/// Numbers compare by bit pattern, so equal encodings always give equal
/// values: `NaN` equals itself and `0.0` differs from `-0.0`.
#[derive(Clone, Debug)]
pub enum Value {
    Bool(bool),
    Number(f64),
    String(String),
    Blob(Blob),
    List(List),
    Map(Map),
    Set(Set),
    Ref(Ref),
    Struct(Struct),
    /// A type used as a first-class value.
    Type(TypeId),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Bool(_) => Kind::Bool,
            Self::Number(_) => Kind::Number,
            Self::String(_) => Kind::String,
            Self::Blob(_) => Kind::Blob,
            Self::List(_) => Kind::List,
            Self::Map(_) => Kind::Map,
            Self::Set(_) => Kind::Set,
            Self::Ref(_) => Kind::Ref,
            Self::Struct(_) => Kind::Struct,
            Self::Type(_) => Kind::Type,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Blob(a), Self::Blob(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => a == b,
            (Self::Ref(a), Self::Ref(b)) => a == b,
            (Self::Struct(a), Self::Struct(b)) => a == b,
            (Self::Type(a), Self::Type(b)) => a == b,
            _ => false,
        }
    }
}

/// Computes the content digest of a value from its canonical encoding.
pub trait ValueHasher {
    fn digest(&self, value: &Value) -> Digest;
}

/// A typed pointer to a chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ref {
    ty: TypeId,
    target: Digest,
    height: u64,
}

impl Ref {
    pub fn new(ty: TypeId, target: Digest, height: u64) -> Self {
        Self { ty, target, height }
    }

    /// The `Ref<T>` type of this ref.
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn target(&self) -> Digest {
        self.target
    }

    /// Position in a balanced chunk tree: 0 at the leaves.
    pub fn height(&self) -> u64 {
        self.height
    }
}

/// A struct value. Fields are stored in the declared order of its type.
#[derive(Clone, Debug)]
pub struct Struct {
    inner: Arc<StructData>,
}

#[derive(Debug)]
struct StructData {
    ty: TypeId,
    fields: Vec<Value>,
    digest: OnceLock<Digest>,
}

impl Struct {
    pub fn new(ty: TypeId, fields: Vec<Value>) -> Self {
        Self {
            inner: Arc::new(StructData {
                ty,
                fields,
                digest: OnceLock::new(),
            }),
        }
    }

    pub fn ty(&self) -> TypeId {
        self.inner.ty
    }

    pub fn fields(&self) -> &[Value] {
        &self.inner.fields
    }

    /// Field value by name, using the struct's type for the position.
    pub fn get(&self, name: &str, cache: &TypeCache) -> Option<&Value> {
        let desc = cache.struct_desc(self.ty()).ok().flatten()?;
        let (index, _) = desc.field(name)?;
        self.inner.fields.get(index)
    }

    /// Content digest, computed on first use and cached.
    pub fn digest(&self, hasher: &dyn ValueHasher) -> Digest {
        *self
            .inner
            .digest
            .get_or_init(|| hasher.digest(&Value::Struct(self.clone())))
    }

    /// The digest if it has already been computed.
    pub fn cached_digest(&self) -> Option<Digest> {
        self.inner.digest.get().copied()
    }
}

impl PartialEq for Struct {
    fn eq(&self, other: &Self) -> bool {
        self.inner.ty == other.inner.ty && self.inner.fields == other.inner.fields
    }
}

/// A key/value pair of a map leaf.
#[derive(Clone, Debug, PartialEq)]
pub struct MapEntry {
    pub key: Value,
    pub value: Value,
}

/// Raw bytes, possibly chunked.
#[derive(Clone, Debug, PartialEq)]
pub struct Blob {
    pub(crate) ty: TypeId,
    pub(crate) seq: Arc<Chunked<Bytes>>,
}

impl Blob {
    pub fn new(ty: TypeId, seq: Chunked<Bytes>) -> Self {
        Self {
            ty,
            seq: Arc::new(seq),
        }
    }

    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn sequence(&self) -> &Chunked<Bytes> {
        &self.seq
    }

    /// Length in bytes.
    pub fn len(&self) -> u64 {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

/// An ordered list, possibly chunked.
#[derive(Clone, Debug, PartialEq)]
pub struct List {
    pub(crate) ty: TypeId,
    pub(crate) seq: Arc<Chunked<Vec<Value>>>,
}

impl List {
    pub fn new(ty: TypeId, seq: Chunked<Vec<Value>>) -> Self {
        Self {
            ty,
            seq: Arc::new(seq),
        }
    }

    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn sequence(&self) -> &Chunked<Vec<Value>> {
        &self.seq
    }

    pub fn len(&self) -> u64 {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

/// A set, possibly chunked. Elements keep their encoded order.
#[derive(Clone, Debug, PartialEq)]
pub struct Set {
    pub(crate) ty: TypeId,
    pub(crate) seq: Arc<Chunked<Vec<Value>>>,
}

impl Set {
    pub fn new(ty: TypeId, seq: Chunked<Vec<Value>>) -> Self {
        Self {
            ty,
            seq: Arc::new(seq),
        }
    }

    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn sequence(&self) -> &Chunked<Vec<Value>> {
        &self.seq
    }

    pub fn len(&self) -> u64 {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

/// A map, possibly chunked. Entries keep their encoded order.
#[derive(Clone, Debug, PartialEq)]
pub struct Map {
    pub(crate) ty: TypeId,
    pub(crate) seq: Arc<Chunked<Vec<MapEntry>>>,
}

impl Map {
    pub fn new(ty: TypeId, seq: Chunked<Vec<MapEntry>>) -> Self {
        Self {
            ty,
            seq: Arc::new(seq),
        }
    }

    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn sequence(&self) -> &Chunked<Vec<MapEntry>> {
        &self.seq
    }

    pub fn len(&self) -> u64 {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}
