//! Insertion: locate, shift, place, and split when the node fills up.

use crate::config::DuplicatePolicy;

use super::node::{Key, Pair};
use super::search::{Cursor, Lookup};
use super::tree::Tree;
use super::violation::{InvariantViolation, fatal};

/// Result of an insert. Every variant is a success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The key was new and a cell was added.
    Inserted,
    /// The key existed and its value was overwritten.
    Replaced { previous: Vec<u8> },
    /// The key existed and the tree was left untouched.
    Rejected,
}

impl InsertOutcome {
    /// Whether the key was new to the tree.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self, Self::Inserted)
    }
}

impl Tree {
    /// Insert `value` under `key`.
    ///
    /// An existing key is handled by the tree's [`DuplicatePolicy`] without any
    /// structural change. A new key may split its leaf and any number of
    /// ancestors; the tree grows by at most one level per call.
    pub fn insert(&mut self, key: Key, value: impl Into<Vec<u8>>) -> InsertOutcome {
        self.insert_pair(Pair::new(key, value))
    }

    /// Insert a prepared pair.
    pub fn insert_pair(&mut self, pair: Pair) -> InsertOutcome {
        match self.locate(pair.key) {
            Lookup::Found(cursor) => self.resolve_duplicate(cursor, pair),
            Lookup::Vacant(cursor) => {
                self.insert_at_cursor(cursor, pair);
                self.record_insert();
                InsertOutcome::Inserted
            }
        }
    }

    fn resolve_duplicate(&mut self, cursor: Cursor, pair: Pair) -> InsertOutcome {
        tracing::debug!(key = pair.key, node = %cursor.node, index = cursor.index, "found duplicate key");

        match self.duplicate_policy() {
            DuplicatePolicy::Reject => InsertOutcome::Rejected,
            DuplicatePolicy::Overwrite => {
                let node = self.node_at_mut(cursor.node);
                let used = node.used();
                let Some(stored) = node.pair_mut(cursor.index) else {
                    fatal(InvariantViolation::CursorOutOfRange {
                        node: cursor.node,
                        index: cursor.index,
                        used,
                    });
                };
                let previous = std::mem::replace(&mut stored.value, pair.value);
                InsertOutcome::Replaced { previous }
            }
        }
    }

    /// Place a new pair at a vacant cursor and split the node if it filled up.
    fn insert_at_cursor(&mut self, cursor: Cursor, pair: Pair) {
        let node = self.node_at_mut(cursor.node);
        if let Err(violation) = node.insert_at(cursor.node, cursor.index, pair) {
            fatal(violation);
        }
        if node.is_full() {
            self.split(cursor.node);
        }
    }
}
