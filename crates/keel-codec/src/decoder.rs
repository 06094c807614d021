//! Recursive-descent decoder for types and values.
//!
//! Grammar:
//! ```text
//! Type     ::= Kind ( Type                      -- List, Set, Ref
//!                   | Type Type                 -- Map
//!                   | Name Count (Name Type)*   -- Struct
//!                   | Count Type*               -- Union
//!                   | Level                     -- Cycle
//!                   | )                         -- primitives
//! Value    ::= Type Payload
//! MetaSeq  ::= Count (Value(Ref) Value(Key) U64)*
//! ```
//! Collections carry a one-byte meta flag before their payload.

use bytes::Bytes;
use keel_types::{Kind, StructField, TypeCache, TypeDesc, TypeId};
use tracing::trace;

use crate::config::DecoderConfig;
use crate::cursor::ByteCursor;
use crate::error::{DecodeError, DecodeResult};
use crate::sequence::{Chunked, MetaSequence, MetaTuple, OrderedKey};
use crate::value::{Blob, List, Map, MapEntry, Ref, Set, Struct, Value};

/// Decode one value from `data`.
///
/// `cache` must not be used by anyone else until this returns.
pub fn decode_value(data: &[u8], cache: &mut TypeCache) -> DecodeResult<Value> {
    ValueDecoder::new(data, cache).read_value()
}

/// Decode one type from `data`.
pub fn decode_type(data: &[u8], cache: &mut TypeCache) -> DecodeResult<TypeId> {
    ValueDecoder::new(data, cache).read_type()
}

/// Decodes types and values from one linear buffer against a type cache.
///
/// The decoder holds the cache exclusively for its whole lifetime. Any error
/// aborts the decode in flight; types interned before the failure stay in
/// the cache, which is harmless since they are canonical.
pub struct ValueDecoder<'a, 'c> {
    cursor: ByteCursor<'a>,
    cache: &'c mut TypeCache,
    config: DecoderConfig,
    depth: usize,
}

impl<'a, 'c> ValueDecoder<'a, 'c> {
    pub fn new(data: &'a [u8], cache: &'c mut TypeCache) -> Self {
        Self::with_config(data, cache, DecoderConfig::default())
    }

    pub fn with_config(data: &'a [u8], cache: &'c mut TypeCache, config: DecoderConfig) -> Self {
        Self {
            cursor: ByteCursor::new(data),
            cache,
            config,
            depth: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// `true` once every input byte has been consumed.
    pub fn is_finished(&self) -> bool {
        self.cursor.is_empty()
    }

    pub fn cache(&self) -> &TypeCache {
        &*self.cache
    }

    fn enter(&mut self) -> DecodeResult<()> {
        if self.depth >= self.config.max_depth {
            return Err(DecodeError::DepthExceeded {
                max: self.config.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn read_kind(&mut self) -> DecodeResult<Kind> {
        let offset = self.cursor.position();
        let tag = self.cursor.read_u8()?;
        Kind::from_tag(tag).ok_or(DecodeError::UnknownKind { tag, offset })
    }

    // ---------------------------------------------------------------
    // Types
    // ---------------------------------------------------------------

    /// Read one type and return its resolved, canonical id.
    pub fn read_type(&mut self) -> DecodeResult<TypeId> {
        let wire = self.read_wire_type()?;
        Ok(self.cache.resolve(wire)?)
    }

    /// Read one type as encoded, cycle placeholders included.
    fn read_wire_type(&mut self) -> DecodeResult<TypeId> {
        self.enter()?;
        let result = self.read_wire_type_body();
        self.leave();
        result
    }

    fn read_wire_type_body(&mut self) -> DecodeResult<TypeId> {
        let kind = self.read_kind()?;
        match kind {
            Kind::List | Kind::Set | Kind::Ref => {
                let elem = self.read_wire_type()?;
                Ok(self.cache.compound(kind, &[elem])?)
            }
            Kind::Map => {
                let key = self.read_wire_type()?;
                let value = self.read_wire_type()?;
                Ok(self.cache.compound(kind, &[key, value])?)
            }
            Kind::Struct => self.read_struct_type(),
            Kind::Union => self.read_union_type(),
            Kind::Cycle => {
                let level = self.cursor.read_u32()?;
                Ok(self.cache.cycle(level))
            }
            Kind::Bool => Ok(TypeId::BOOL),
            Kind::Number => Ok(TypeId::NUMBER),
            Kind::String => Ok(TypeId::STRING),
            Kind::Blob => Ok(TypeId::BLOB),
            Kind::Value => Ok(TypeId::VALUE),
            Kind::Type => Ok(TypeId::TYPE),
        }
    }

    /// Id of a length-prefixed identifier, if the cache has seen it.
    fn read_ident(&mut self) -> DecodeResult<Option<u32>> {
        let bytes = self.cursor.read_bytes()?;
        Ok(self.cache.ident(bytes))
    }

    /// Walk the struct shape trie straight off the wire. Returns `None` on
    /// the first token without a matching edge.
    fn read_cached_struct_type(&mut self) -> DecodeResult<Option<TypeId>> {
        let Some(name) = self.read_ident()? else {
            return Ok(None);
        };
        let Some(mut node) = self.cache.trie_child(self.cache.trie_root(), name) else {
            return Ok(None);
        };
        let count = self.cursor.read_u32()?;
        for _ in 0..count {
            let Some(field) = self.read_ident()? else {
                return Ok(None);
            };
            let Some(next) = self.cache.trie_child(node, field) else {
                return Ok(None);
            };
            let ty = self.read_wire_type()?;
            let Some(next) = self.cache.trie_child(next, ty.raw()) else {
                return Ok(None);
            };
            node = next;
        }
        Ok(self.cache.trie_type(node))
    }

    fn read_struct_type(&mut self) -> DecodeResult<TypeId> {
        // Try to recognize a known shape without allocating.
        let start = self.cursor.position();
        if let Some(ty) = self.read_cached_struct_type()? {
            self.cache.record_trie_hit();
            trace!(offset = start, id = ty.raw(), "struct type trie hit");
            return Ok(ty);
        }

        // Miss: drop everything the fast path read and start over.
        self.cache.record_trie_miss();
        trace!(offset = start, "struct type trie miss");
        self.cursor.seek(start);

        let name = self.cursor.read_string()?.to_owned();
        let count = self.cursor.read_u32()?;
        let mut fields = Vec::with_capacity(self.config.capacity(count));
        for _ in 0..count {
            let field_name = self.cursor.read_string()?.to_owned();
            let ty = self.read_wire_type()?;
            fields.push(StructField::new(field_name, ty));
        }
        Ok(self.cache.make_struct(name, fields)?)
    }

    fn read_union_type(&mut self) -> DecodeResult<TypeId> {
        let count = self.cursor.read_u32()?;
        let mut members = Vec::with_capacity(self.config.capacity(count));
        for _ in 0..count {
            members.push(self.read_wire_type()?);
        }
        Ok(self.cache.union(members)?)
    }

    // ---------------------------------------------------------------
    // Values
    // ---------------------------------------------------------------

    /// Read one value: its type, then the payload for that type's kind.
    pub fn read_value(&mut self) -> DecodeResult<Value> {
        self.enter()?;
        let result = self.read_value_body();
        self.leave();
        result
    }

    fn read_value_body(&mut self) -> DecodeResult<Value> {
        let ty = self.read_type()?;
        let kind = self.cache.kind(ty)?;
        match kind {
            Kind::Bool => Ok(Value::Bool(self.cursor.read_bool()?)),
            Kind::Number => Ok(Value::Number(self.cursor.read_number()?)),
            Kind::String => Ok(Value::String(self.cursor.read_string()?.to_owned())),
            Kind::Blob => {
                let seq = if self.cursor.read_bool()? {
                    Chunked::Meta(self.read_meta_sequence()?)
                } else {
                    Chunked::Leaf(Bytes::copy_from_slice(self.cursor.read_bytes()?))
                };
                Ok(Value::Blob(Blob::new(ty, seq)))
            }
            Kind::List => {
                let seq = if self.cursor.read_bool()? {
                    Chunked::Meta(self.read_meta_sequence()?)
                } else {
                    Chunked::Leaf(self.read_value_sequence()?)
                };
                Ok(Value::List(List::new(ty, seq)))
            }
            Kind::Set => {
                let seq = if self.cursor.read_bool()? {
                    Chunked::Meta(self.read_meta_sequence()?)
                } else {
                    Chunked::Leaf(self.read_value_sequence()?)
                };
                Ok(Value::Set(Set::new(ty, seq)))
            }
            Kind::Map => {
                let seq = if self.cursor.read_bool()? {
                    Chunked::Meta(self.read_meta_sequence()?)
                } else {
                    Chunked::Leaf(self.read_map_entries()?)
                };
                Ok(Value::Map(Map::new(ty, seq)))
            }
            Kind::Ref => Ok(Value::Ref(self.read_ref(ty)?)),
            Kind::Struct => self.read_struct(ty),
            Kind::Type => Ok(Value::Type(self.read_type()?)),
            Kind::Union | Kind::Cycle | Kind::Value => Err(DecodeError::NotAValueKind(kind)),
        }
    }

    fn read_ref(&mut self, ty: TypeId) -> DecodeResult<Ref> {
        let target = self.cursor.read_digest()?;
        let height = self.cursor.read_u64()?;
        Ok(Ref::new(ty, target, height))
    }

    /// Field values in declared order. Names and count come from the type.
    fn read_struct(&mut self, ty: TypeId) -> DecodeResult<Value> {
        let count = match self.cache.desc(ty)? {
            TypeDesc::Struct(desc) => desc.len(),
            other => return Err(DecodeError::NotAValueKind(other.kind())),
        };
        let mut fields = Vec::with_capacity(count);
        for _ in 0..count {
            fields.push(self.read_value()?);
        }
        Ok(Value::Struct(Struct::new(ty, fields)))
    }

    fn read_value_sequence(&mut self) -> DecodeResult<Vec<Value>> {
        let count = self.cursor.read_u32()?;
        let mut values = Vec::with_capacity(self.config.capacity(count));
        for _ in 0..count {
            values.push(self.read_value()?);
        }
        Ok(values)
    }

    fn read_map_entries(&mut self) -> DecodeResult<Vec<MapEntry>> {
        let count = self.cursor.read_u32()?;
        let mut entries = Vec::with_capacity(self.config.capacity(count));
        for _ in 0..count {
            let key = self.read_value()?;
            let value = self.read_value()?;
            entries.push(MapEntry { key, value });
        }
        Ok(entries)
    }

    /// Child tuples only; no child chunk is fetched here.
    fn read_meta_sequence(&mut self) -> DecodeResult<MetaSequence> {
        let count = self.cursor.read_u32()?;
        let mut tuples = Vec::with_capacity(self.config.capacity(count));
        for _ in 0..count {
            let child = match self.read_value()? {
                Value::Ref(r) => r,
                other => return Err(DecodeError::MetaChildNotRef(other.kind())),
            };
            let key_value = self.read_value()?;
            let key = OrderedKey::from_value(&key_value)
                .ok_or_else(|| DecodeError::UnorderableKey(key_value.kind()))?;
            let cumulative_leaves = self.cursor.read_u64()?;
            tuples.push(MetaTuple {
                child,
                key,
                cumulative_leaves,
            });
        }
        let meta = MetaSequence::new(tuples);
        if self.config.verify_meta_sequences {
            meta.validate()?;
        }
        trace!(children = meta.len(), leaves = meta.leaf_count(), "decoded meta sequence");
        Ok(meta)
    }
}
