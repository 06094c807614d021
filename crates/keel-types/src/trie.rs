//! Prefix tree over struct encodings.
//!
//! A struct type is encoded as `name, count, (field name, field type)*`.
//! The trie is keyed by the tokens of that encoding with the count left
//! out: the ident id of the name, then for each field the ident id of the
//! field name followed by the raw id of the (wire-level) field type.
//! Nodes are stored in a flat arena and never removed.

use std::collections::HashMap;

use crate::cache::TypeId;

/// Index of a node in the struct shape trie.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TrieNodeId(u32);

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<u32, TrieNodeId>,
    ty: Option<TypeId>,
}

#[derive(Debug)]
pub(crate) struct StructTrie {
    nodes: Vec<TrieNode>,
}

impl StructTrie {
    pub(crate) const ROOT: TrieNodeId = TrieNodeId(0);

    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
        }
    }

    pub(crate) fn child(&self, node: TrieNodeId, token: u32) -> Option<TrieNodeId> {
        self.nodes
            .get(node.0 as usize)
            .and_then(|n| n.children.get(&token).copied())
    }

    pub(crate) fn child_or_insert(&mut self, node: TrieNodeId, token: u32) -> TrieNodeId {
        if let Some(existing) = self.child(node, token) {
            return existing;
        }
        let id = TrieNodeId(self.nodes.len() as u32);
        self.nodes.push(TrieNode::default());
        self.nodes[node.0 as usize].children.insert(token, id);
        id
    }

    pub(crate) fn get(&self, node: TrieNodeId) -> Option<TypeId> {
        self.nodes.get(node.0 as usize).and_then(|n| n.ty)
    }

    pub(crate) fn set(&mut self, node: TrieNodeId, ty: TypeId) {
        self.nodes[node.0 as usize].ty = Some(ty);
    }

    #[cfg(test)]
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
