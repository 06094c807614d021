//! The canonical type arena.
//!
//! [`TypeCache`] stores every type descriptor it has seen in a flat arena of
//! slots and hands out [`TypeId`] indices. Interning tables guarantee that a
//! structurally equal compound, union or struct type is only ever stored
//! once, so two ids compare equal exactly when their types do.
//!
//! Struct types with `Cycle` placeholders exist in two forms. The *wire*
//! form mirrors the encoding and is what the struct shape trie and the
//! decoder's fast path key on. The *resolved* form, produced by
//! [`TypeCache::resolve`], replaces each placeholder with the id of the
//! struct it refers to and is what callers get back from a decode.

use std::collections::HashMap;
use std::fmt::Write as _;

use tracing::debug;

use crate::error::{TypeError, TypeResult};
use crate::kind::Kind;
use crate::trie::{StructTrie, TrieNodeId};

/// Handle to a type stored in a [`TypeCache`].
///
/// Ids are only meaningful for the cache that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub const BOOL: TypeId = TypeId(0);
    pub const NUMBER: TypeId = TypeId(1);
    pub const STRING: TypeId = TypeId(2);
    pub const BLOB: TypeId = TypeId(3);
    pub const VALUE: TypeId = TypeId(4);
    pub const TYPE: TypeId = TypeId(5);

    const PRIMITIVES: [(Kind, TypeId); 6] = [
        (Kind::Bool, Self::BOOL),
        (Kind::Number, Self::NUMBER),
        (Kind::String, Self::STRING),
        (Kind::Blob, Self::BLOB),
        (Kind::Value, Self::VALUE),
        (Kind::Type, Self::TYPE),
    ];

    /// The pre-built id of a primitive kind. Every cache agrees on these.
    pub fn primitive(kind: Kind) -> Option<TypeId> {
        Self::PRIMITIVES
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, id)| *id)
    }

    /// Raw index, used as a trie token.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A named, typed struct field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StructField {
    pub name: String,
    pub ty: TypeId,
}

impl StructField {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Description of a struct type. Field order is part of its identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StructDesc {
    pub name: String,
    pub fields: Vec<StructField>,
}

impl StructDesc {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<(usize, &StructField)> {
        self.fields.iter().enumerate().find(|(_, f)| f.name == name)
    }
}

/// A type descriptor stored in the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeDesc {
    Primitive(Kind),
    /// List, Set and Ref hold one element type; Map holds key then value.
    Compound { kind: Kind, elems: Vec<TypeId> },
    /// Members sorted by id, no duplicates.
    Union(Vec<TypeId>),
    Struct(StructDesc),
    /// Placeholder for the struct `level` enclosing structs up.
    Cycle(u32),
}

impl TypeDesc {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Primitive(kind) => *kind,
            Self::Compound { kind, .. } => *kind,
            Self::Union(_) => Kind::Union,
            Self::Struct(_) => Kind::Struct,
            Self::Cycle(_) => Kind::Cycle,
        }
    }
}

#[derive(Debug)]
struct Slot {
    desc: TypeDesc,
    /// Any `Cycle` placeholder reachable without crossing into a resolved struct.
    has_placeholder: bool,
    /// How many enclosing structs the deepest placeholder reaches past this
    /// type. Zero means every placeholder is bound inside it.
    escape: u32,
}

/// Trie hit/miss counters, recorded by the decoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub trie_hits: u64,
    pub trie_misses: u64,
}

/// State of one `resolve` call.
#[derive(Default)]
struct Resolution {
    /// Reserved slots of the structs being resolved, innermost last.
    stack: Vec<TypeId>,
    /// Open structs already resolved in this call, keyed by wire id and the
    /// enclosing slots their placeholders bind to.
    bound: HashMap<(TypeId, Vec<TypeId>), TypeId>,
}

/// Arena of canonical type descriptors.
///
/// Not internally synchronized: wrap it in a lock (or give each thread its
/// own cache) when decoding from several threads.
#[derive(Debug)]
pub struct TypeCache {
    slots: Vec<Slot>,
    compounds: HashMap<(Kind, Vec<TypeId>), TypeId>,
    unions: HashMap<Vec<TypeId>, TypeId>,
    cycles: HashMap<u32, TypeId>,
    idents: HashMap<Vec<u8>, u32>,
    trie: StructTrie,
    /// Wire id of a closed cyclic struct -> its resolved id.
    resolved: HashMap<TypeId, TypeId>,
    stats: CacheStats,
}

impl TypeCache {
    /// Create a cache holding only the primitive types.
    pub fn new() -> Self {
        let slots = TypeId::PRIMITIVES
            .iter()
            .map(|(kind, _)| Slot {
                desc: TypeDesc::Primitive(*kind),
                has_placeholder: false,
                escape: 0,
            })
            .collect();
        Self {
            slots,
            compounds: HashMap::new(),
            unions: HashMap::new(),
            cycles: HashMap::new(),
            idents: HashMap::new(),
            trie: StructTrie::new(),
            resolved: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Number of types in the arena, primitives included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false`: the primitives are pre-built.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn record_trie_hit(&mut self) {
        self.stats.trie_hits += 1;
    }

    pub fn record_trie_miss(&mut self) {
        self.stats.trie_misses += 1;
    }

    // ---------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------

    pub fn desc(&self, id: TypeId) -> TypeResult<&TypeDesc> {
        self.slot(id).map(|s| &s.desc)
    }

    pub fn kind(&self, id: TypeId) -> TypeResult<Kind> {
        self.desc(id).map(TypeDesc::kind)
    }

    /// The struct description behind `id`, if it is a struct type.
    pub fn struct_desc(&self, id: TypeId) -> TypeResult<Option<&StructDesc>> {
        Ok(match self.desc(id)? {
            TypeDesc::Struct(desc) => Some(desc),
            _ => None,
        })
    }

    fn slot(&self, id: TypeId) -> TypeResult<&Slot> {
        self.slots
            .get(id.0 as usize)
            .ok_or(TypeError::UnknownTypeId(id.0))
    }

    fn push(&mut self, desc: TypeDesc, has_placeholder: bool, escape: u32) -> TypeId {
        let id = TypeId(self.slots.len() as u32);
        self.slots.push(Slot {
            desc,
            has_placeholder,
            escape,
        });
        id
    }

    fn summarize(&self, elems: &[TypeId]) -> TypeResult<(bool, u32)> {
        let mut has_placeholder = false;
        let mut escape = 0;
        for elem in elems {
            let slot = self.slot(*elem)?;
            has_placeholder |= slot.has_placeholder;
            escape = escape.max(slot.escape);
        }
        Ok((has_placeholder, escape))
    }

    // ---------------------------------------------------------------
    // Interning
    // ---------------------------------------------------------------

    /// Canonical `List<T>`, `Set<T>`, `Ref<T>` or `Map<K, V>`.
    pub fn compound(&mut self, kind: Kind, elems: &[TypeId]) -> TypeResult<TypeId> {
        let expected = match kind {
            Kind::List | Kind::Set | Kind::Ref => 1,
            Kind::Map => 2,
            _ => 0,
        };
        if expected == 0 || elems.len() != expected {
            return Err(TypeError::InvalidArity {
                kind,
                expected,
                actual: elems.len(),
            });
        }
        let key = (kind, elems.to_vec());
        if let Some(id) = self.compounds.get(&key) {
            return Ok(*id);
        }
        let (has_placeholder, escape) = self.summarize(elems)?;
        let id = self.push(
            TypeDesc::Compound {
                kind,
                elems: key.1.clone(),
            },
            has_placeholder,
            escape,
        );
        self.compounds.insert(key, id);
        Ok(id)
    }

    /// Canonical union of `members`. Order and duplicates are ignored.
    pub fn union(&mut self, mut members: Vec<TypeId>) -> TypeResult<TypeId> {
        members.sort_unstable();
        members.dedup();
        if let Some(id) = self.unions.get(&members) {
            return Ok(*id);
        }
        let (has_placeholder, escape) = self.summarize(&members)?;
        let id = self.push(TypeDesc::Union(members.clone()), has_placeholder, escape);
        self.unions.insert(members, id);
        Ok(id)
    }

    /// The placeholder for the struct `level` enclosing structs up.
    pub fn cycle(&mut self, level: u32) -> TypeId {
        if let Some(id) = self.cycles.get(&level) {
            return *id;
        }
        let id = self.push(TypeDesc::Cycle(level), true, level.saturating_add(1));
        self.cycles.insert(level, id);
        id
    }

    /// Intern the wire form of a struct type and record its trie path.
    ///
    /// Field types are wire-level ids (they may contain placeholders). If
    /// the same shape was interned before, its existing id is returned.
    pub fn make_struct(&mut self, name: String, fields: Vec<StructField>) -> TypeResult<TypeId> {
        let mut node = StructTrie::ROOT;
        let token = self.intern_ident(&name);
        node = self.trie.child_or_insert(node, token);
        for field in &fields {
            let token = self.intern_ident(&field.name);
            node = self.trie.child_or_insert(node, token);
            node = self.trie.child_or_insert(node, field.ty.raw());
        }
        if let Some(existing) = self.trie.get(node) {
            return Ok(existing);
        }

        let field_types: Vec<TypeId> = fields.iter().map(|f| f.ty).collect();
        let (has_placeholder, escape) = self.summarize(&field_types)?;
        let field_count = fields.len();
        let id = self.push(
            TypeDesc::Struct(StructDesc { name, fields }),
            has_placeholder,
            escape.saturating_sub(1),
        );
        self.trie.set(node, id);
        debug!(id = id.0, fields = field_count, cyclic = has_placeholder, "interned struct type");
        Ok(id)
    }

    // ---------------------------------------------------------------
    // Idents and trie
    // ---------------------------------------------------------------

    /// Id of an already-interned identifier. Never allocates.
    pub fn ident(&self, bytes: &[u8]) -> Option<u32> {
        self.idents.get(bytes).copied()
    }

    pub fn intern_ident(&mut self, name: &str) -> u32 {
        if let Some(id) = self.idents.get(name.as_bytes()) {
            return *id;
        }
        let id = self.idents.len() as u32;
        self.idents.insert(name.as_bytes().to_vec(), id);
        id
    }

    pub fn trie_root(&self) -> TrieNodeId {
        StructTrie::ROOT
    }

    pub fn trie_child(&self, node: TrieNodeId, token: u32) -> Option<TrieNodeId> {
        self.trie.child(node, token)
    }

    /// The wire-level struct type stored at `node`, if the node ends a
    /// complete shape.
    pub fn trie_type(&self, node: TrieNodeId) -> Option<TypeId> {
        self.trie.get(node)
    }

    // ---------------------------------------------------------------
    // Cycle resolution
    // ---------------------------------------------------------------

    /// Replace every cycle placeholder in `id` with the struct it names.
    ///
    /// Types without placeholders are returned unchanged. Fails if a
    /// placeholder points past the outermost struct of `id`.
    pub fn resolve(&mut self, id: TypeId) -> TypeResult<TypeId> {
        let slot = self.slot(id)?;
        if !slot.has_placeholder {
            return Ok(id);
        }
        if slot.escape > 0 {
            return Err(TypeError::UnresolvedCycle {
                escaped: slot.escape,
            });
        }
        let mut pass = Resolution::default();
        self.resolve_in(id, &mut pass)
    }

    fn resolve_in(&mut self, id: TypeId, pass: &mut Resolution) -> TypeResult<TypeId> {
        let slot = self.slot(id)?;
        if !slot.has_placeholder {
            return Ok(id);
        }
        let escape = slot.escape as usize;
        match slot.desc.clone() {
            TypeDesc::Primitive(_) => Ok(id),
            TypeDesc::Cycle(level) => pass
                .stack
                .len()
                .checked_sub(level as usize + 1)
                .map(|i| pass.stack[i])
                .ok_or_else(|| TypeError::UnresolvedCycle {
                    escaped: level.saturating_add(1) - pass.stack.len() as u32,
                }),
            TypeDesc::Compound { kind, elems } => {
                let elems = elems
                    .into_iter()
                    .map(|e| self.resolve_in(e, pass))
                    .collect::<TypeResult<Vec<_>>>()?;
                self.compound(kind, &elems)
            }
            TypeDesc::Union(members) => {
                let members = members
                    .into_iter()
                    .map(|m| self.resolve_in(m, pass))
                    .collect::<TypeResult<Vec<_>>>()?;
                self.union(members)
            }
            TypeDesc::Struct(desc) => {
                // A struct's resolution depends only on its wire id and the
                // enclosing slots its placeholders reach.
                let bound = match escape {
                    0 => {
                        if let Some(done) = self.resolved.get(&id) {
                            return Ok(*done);
                        }
                        None
                    }
                    n => pass.stack.len().checked_sub(n).map(|from| {
                        let key = (id, pass.stack[from..].to_vec());
                        (pass.bound.get(&key).copied(), key)
                    }),
                };
                if let Some((Some(done), _)) = bound {
                    return Ok(done);
                }

                // Reserve the slot first so placeholders below can bind to it.
                let target = self.push(
                    TypeDesc::Struct(StructDesc {
                        name: desc.name.clone(),
                        fields: Vec::new(),
                    }),
                    false,
                    0,
                );
                pass.stack.push(target);
                let fields = desc
                    .fields
                    .into_iter()
                    .map(|f| Ok(StructField::new(f.name, self.resolve_in(f.ty, pass)?)))
                    .collect::<TypeResult<Vec<_>>>();
                pass.stack.pop();
                self.slots[target.0 as usize].desc = TypeDesc::Struct(StructDesc {
                    name: desc.name,
                    fields: fields?,
                });
                match bound {
                    None if escape == 0 => {
                        self.resolved.insert(id, target);
                    }
                    Some((_, key)) => {
                        pass.bound.insert(key, target);
                    }
                    None => {}
                }
                Ok(target)
            }
        }
    }

    // ---------------------------------------------------------------
    // Rendering
    // ---------------------------------------------------------------

    /// Human-readable rendering of a type.
    ///
    /// Back-references to an enclosing struct print as `Cycle<n>`, and union
    /// members print in sorted order, so two caches render structurally
    /// equal types identically.
    pub fn describe(&self, id: TypeId) -> TypeResult<String> {
        let mut out = String::new();
        self.describe_into(id, &mut Vec::new(), &mut out)?;
        Ok(out)
    }

    fn describe_into(&self, id: TypeId, stack: &mut Vec<TypeId>, out: &mut String) -> TypeResult<()> {
        match self.desc(id)? {
            TypeDesc::Primitive(kind) => out.push_str(kind.name()),
            TypeDesc::Cycle(level) => {
                let _ = write!(out, "Cycle<{level}>");
            }
            TypeDesc::Compound { kind, elems } => {
                out.push_str(kind.name());
                out.push('<');
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.describe_into(*elem, stack, out)?;
                }
                out.push('>');
            }
            TypeDesc::Union(members) => {
                let mut rendered = members
                    .iter()
                    .map(|m| {
                        let mut s = String::new();
                        self.describe_into(*m, stack, &mut s).map(|_| s)
                    })
                    .collect::<TypeResult<Vec<_>>>()?;
                rendered.sort();
                if rendered.is_empty() {
                    out.push_str("Union<>");
                } else {
                    out.push_str(&rendered.join(" | "));
                }
            }
            TypeDesc::Struct(desc) => {
                if let Some(pos) = stack.iter().rposition(|s| *s == id) {
                    let _ = write!(out, "Cycle<{}>", stack.len() - 1 - pos);
                    return Ok(());
                }
                stack.push(id);
                let _ = write!(out, "struct {} {{", desc.name);
                for (i, field) in desc.fields.iter().enumerate() {
                    out.push_str(if i == 0 { " " } else { ", " });
                    let _ = write!(out, "{}: ", field.name);
                    self.describe_into(field.ty, stack, out)?;
                }
                out.push_str(if desc.fields.is_empty() { "}" } else { " }" });
                stack.pop();
            }
        }
        Ok(())
    }
}

impl Default for TypeCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(cache: &mut TypeCache) -> TypeId {
        cache
            .make_struct(
                "Point".into(),
                vec![
                    StructField::new("x", TypeId::NUMBER),
                    StructField::new("y", TypeId::NUMBER),
                ],
            )
            .unwrap()
    }

    #[test]
    fn primitives_are_prebuilt() {
        let cache = TypeCache::new();
        for kind in Kind::ALL.into_iter().filter(|k| k.is_primitive()) {
            let id = TypeId::primitive(kind).unwrap();
            assert_eq!(cache.kind(id).unwrap(), kind);
        }
        assert_eq!(cache.len(), 6);
        assert!(TypeId::primitive(Kind::List).is_none());
    }

    #[test]
    fn compound_is_canonical() {
        let mut cache = TypeCache::new();
        let a = cache.compound(Kind::List, &[TypeId::NUMBER]).unwrap();
        let b = cache.compound(Kind::List, &[TypeId::NUMBER]).unwrap();
        let c = cache.compound(Kind::Set, &[TypeId::NUMBER]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(cache.kind(a).unwrap(), Kind::List);
    }

    #[test]
    fn compound_rejects_wrong_arity() {
        let mut cache = TypeCache::new();
        let err = cache.compound(Kind::Map, &[TypeId::STRING]).unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidArity { kind: Kind::Map, expected: 2, actual: 1 }
        );
        assert!(cache.compound(Kind::Bool, &[]).is_err());
    }

    #[test]
    fn union_ignores_order_and_duplicates() {
        let mut cache = TypeCache::new();
        let a = cache
            .union(vec![TypeId::STRING, TypeId::NUMBER, TypeId::STRING])
            .unwrap();
        let b = cache.union(vec![TypeId::NUMBER, TypeId::STRING]).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            cache.desc(a).unwrap(),
            &TypeDesc::Union(vec![TypeId::NUMBER, TypeId::STRING])
        );
    }

    #[test]
    fn struct_is_canonical_and_ordered() {
        let mut cache = TypeCache::new();
        let a = point(&mut cache);
        let b = point(&mut cache);
        assert_eq!(a, b);

        let swapped = cache
            .make_struct(
                "Point".into(),
                vec![
                    StructField::new("y", TypeId::NUMBER),
                    StructField::new("x", TypeId::NUMBER),
                ],
            )
            .unwrap();
        assert_ne!(a, swapped);
    }

    #[test]
    fn struct_trie_path_is_walkable() {
        let mut cache = TypeCache::new();
        let p = point(&mut cache);
        let name = cache.ident(b"Point").unwrap();
        let x = cache.ident(b"x").unwrap();
        let y = cache.ident(b"y").unwrap();
        let node = [name, x, TypeId::NUMBER.raw(), y, TypeId::NUMBER.raw()]
            .iter()
            .try_fold(cache.trie_root(), |node, token| cache.trie_child(node, *token))
            .unwrap();
        assert_eq!(cache.trie_type(node), Some(p));
        assert!(cache.ident(b"z").is_none());
    }

    #[test]
    fn empty_struct_differs_from_prefix() {
        let mut cache = TypeCache::new();
        let empty = cache.make_struct("Point".into(), vec![]).unwrap();
        let full = point(&mut cache);
        assert_ne!(empty, full);
        assert!(cache.struct_desc(empty).unwrap().unwrap().is_empty());
    }

    #[test]
    fn resolve_without_placeholders_is_identity() {
        let mut cache = TypeCache::new();
        let p = point(&mut cache);
        let list = cache.compound(Kind::List, &[p]).unwrap();
        assert_eq!(cache.resolve(p).unwrap(), p);
        assert_eq!(cache.resolve(list).unwrap(), list);
    }

    #[test]
    fn resolve_self_reference() {
        // struct Node { children: List<Cycle<0>> }
        let mut cache = TypeCache::new();
        let cycle = cache.cycle(0);
        let children = cache.compound(Kind::List, &[cycle]).unwrap();
        let wire = cache
            .make_struct("Node".into(), vec![StructField::new("children", children)])
            .unwrap();

        let node = cache.resolve(wire).unwrap();
        assert_ne!(node, wire);
        let desc = cache.struct_desc(node).unwrap().unwrap().clone();
        let list_of_node = cache.compound(Kind::List, &[node]).unwrap();
        assert_eq!(desc.fields[0].ty, list_of_node);

        // Resolution of a closed struct is memoized.
        assert_eq!(cache.resolve(wire).unwrap(), node);
    }

    #[test]
    fn resolve_nested_back_reference() {
        // struct Outer { inner: struct Inner { up: Cycle<1> } }
        let mut cache = TypeCache::new();
        let up = cache.cycle(1);
        let inner = cache
            .make_struct("Inner".into(), vec![StructField::new("up", up)])
            .unwrap();
        assert!(matches!(
            cache.resolve(inner),
            Err(TypeError::UnresolvedCycle { escaped: 1 })
        ));

        let outer_wire = cache
            .make_struct("Outer".into(), vec![StructField::new("inner", inner)])
            .unwrap();
        let outer = cache.resolve(outer_wire).unwrap();
        let inner_resolved = cache.struct_desc(outer).unwrap().unwrap().fields[0].ty;
        let inner_desc = cache.struct_desc(inner_resolved).unwrap().unwrap();
        assert_eq!(inner_desc.fields[0].ty, outer);
    }

    #[test]
    fn repeated_open_struct_resolves_to_one_id() {
        // struct A { b1: B, b2: B, bs: List<B> } with struct B { a: Cycle<1> }
        let mut cache = TypeCache::new();
        let up = cache.cycle(1);
        let b = cache
            .make_struct("B".into(), vec![StructField::new("a", up)])
            .unwrap();
        let list_b = cache.compound(Kind::List, &[b]).unwrap();
        let a_wire = cache
            .make_struct(
                "A".into(),
                vec![
                    StructField::new("b1", b),
                    StructField::new("b2", b),
                    StructField::new("bs", list_b),
                ],
            )
            .unwrap();

        let a = cache.resolve(a_wire).unwrap();
        let fields = cache.struct_desc(a).unwrap().unwrap().fields.clone();
        assert_eq!(fields[0].ty, fields[1].ty);
        let list_of_b = cache.compound(Kind::List, &[fields[0].ty]).unwrap();
        assert_eq!(fields[2].ty, list_of_b);
        let b_desc = cache.struct_desc(fields[0].ty).unwrap().unwrap();
        assert_eq!(b_desc.fields[0].ty, a);

        // Bound to a different enclosing struct, B is a different type.
        let c_wire = cache
            .make_struct("C".into(), vec![StructField::new("b", b)])
            .unwrap();
        let c = cache.resolve(c_wire).unwrap();
        let c_b = cache.struct_desc(c).unwrap().unwrap().fields[0].ty;
        assert_ne!(c_b, fields[0].ty);
        assert_eq!(cache.resolve(a_wire).unwrap(), a);
    }

    #[test]
    fn resolve_rejects_bare_cycle() {
        let mut cache = TypeCache::new();
        let cycle = cache.cycle(0);
        assert_eq!(
            cache.resolve(cycle).unwrap_err(),
            TypeError::UnresolvedCycle { escaped: 1 }
        );
    }

    #[test]
    fn describe_renders_cycles() {
        let mut cache = TypeCache::new();
        let cycle = cache.cycle(0);
        let children = cache.compound(Kind::List, &[cycle]).unwrap();
        let wire = cache
            .make_struct(
                "Node".into(),
                vec![
                    StructField::new("value", TypeId::STRING),
                    StructField::new("children", children),
                ],
            )
            .unwrap();
        let resolved = cache.resolve(wire).unwrap();
        let expected = "struct Node { value: String, children: List<Cycle<0>> }";
        assert_eq!(cache.describe(wire).unwrap(), expected);
        assert_eq!(cache.describe(resolved).unwrap(), expected);
    }

    #[test]
    fn describe_compound_and_union() {
        let mut cache = TypeCache::new();
        let u = cache.union(vec![TypeId::STRING, TypeId::BOOL]).unwrap();
        let map = cache.compound(Kind::Map, &[TypeId::STRING, u]).unwrap();
        assert_eq!(cache.describe(map).unwrap(), "Map<String, Bool | String>");
        let empty = cache.make_struct("Empty".into(), vec![]).unwrap();
        assert_eq!(cache.describe(empty).unwrap(), "struct Empty {}");
    }

    #[test]
    fn unknown_id_is_an_error() {
        let cache = TypeCache::new();
        assert_eq!(
            cache.kind(TypeId(999)).unwrap_err(),
            TypeError::UnknownTypeId(999)
        );
    }

    #[test]
    fn stats_start_at_zero() {
        let mut cache = TypeCache::new();
        assert_eq!(cache.stats(), CacheStats::default());
        cache.record_trie_hit();
        cache.record_trie_miss();
        cache.record_trie_miss();
        assert_eq!(cache.stats(), CacheStats { trie_hits: 1, trie_misses: 2 });
    }
}
