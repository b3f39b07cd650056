//! Point lookup by recursive descent.

use super::node::{Key, NodeId, Pair, Probe};
use super::tree::Tree;

/// A position in a node: a stored key, or the gap where a key belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub node: NodeId,
    pub index: usize,
}

/// Outcome of locating a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// The key is stored at the cursor.
    Found(Cursor),
    /// The key is absent; inserting it at the cursor keeps the leaf ordered.
    Vacant(Cursor),
}

impl Lookup {
    #[must_use]
    pub const fn cursor(self) -> Cursor {
        match self {
            Self::Found(cursor) | Self::Vacant(cursor) => cursor,
        }
    }

    #[must_use]
    pub const fn is_found(self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl Tree {
    /// Find the pair stored under `key`.
    #[must_use]
    pub fn search(&self, key: Key) -> Option<&Pair> {
        match self.locate(key) {
            Lookup::Found(cursor) => self.node_at(cursor.node).pair(cursor.index),
            Lookup::Vacant(_) => None,
        }
    }

    /// Find the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: Key) -> Option<&[u8]> {
        self.search(key).map(|pair| pair.value.as_slice())
    }

    #[must_use]
    pub fn contains_key(&self, key: Key) -> bool {
        self.locate(key).is_found()
    }

    /// Locate `key`, starting at the root.
    #[must_use]
    pub fn locate(&self, key: Key) -> Lookup {
        self.descend(self.root(), key)
    }

    fn descend(&self, id: NodeId, key: Key) -> Lookup {
        let node = self.node_at(id);
        match node.probe(key) {
            Probe::Found(index) => Lookup::Found(Cursor { node: id, index }),
            Probe::Gap(index) => match node.child(index) {
                Some(child) => {
                    tracing::trace!(key, node = %id, %child, "descending");
                    self.descend(child, key)
                }
                None => Lookup::Vacant(Cursor { node: id, index }),
            },
        }
    }
}
