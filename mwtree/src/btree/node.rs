//! Node layout for the multiway tree.
//!
//! Every node owns `order + 1` cells, allocated once and never resized:
//! - Cells `0..used` carry key/value pairs in strictly ascending key order
//! - `Cell[i].child` owns keys below `Cell[i].key` (and above `Cell[i-1].key`)
//! - The cell at index `used` carries only the rightmost child
//!
//! The extra slot lets an insert land in a node holding `order - 1` pairs,
//! making it exactly full; the caller then splits it.

use super::violation::InvariantViolation;

/// Key type stored in the tree.
pub type Key = i64;

/// Handle of a node in the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Create a handle from an arena index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the node in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A key and its opaque value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pair {
    pub key: Key,
    pub value: Vec<u8>,
}

impl Pair {
    /// Create a pair.
    #[must_use]
    pub fn new(key: Key, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// One slot of a node: an optional child subtree and a pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub child: Option<NodeId>,
    pub pair: Pair,
}

/// Result of a binary search within a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// The key is stored at this index.
    Found(usize),
    /// The key is absent; this is both the insertion index and the child slot
    /// to descend into.
    Gap(usize),
}

/// A tree node.
#[derive(Debug)]
pub struct Node {
    cells: Box<[Cell]>,
    used: usize,
    parent: Option<NodeId>,
}

impl Node {
    /// Create an empty node with room for `order` pairs plus the overflow slot.
    #[must_use]
    pub fn new(order: usize, parent: Option<NodeId>) -> Self {
        Self {
            cells: vec![Cell::default(); order + 1].into_boxed_slice(),
            used: 0,
            parent,
        }
    }

    /// Maximum number of pairs before the node must split.
    #[must_use]
    pub fn order(&self) -> usize {
        self.cells.len() - 1
    }

    /// Number of pairs held.
    #[must_use]
    pub const fn used(&self) -> usize {
        self.used
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// A node is full once the overflow slot is in use.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.used == self.order()
    }

    /// Leaves have no child in their first slot (and hence none at all).
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.cells[0].child.is_none()
    }

    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub const fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    /// Occupied cells, excluding the trailing child-only slot.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells[..self.used]
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.cells().iter().map(|cell| cell.pair.key)
    }

    #[must_use]
    pub fn pair(&self, index: usize) -> Option<&Pair> {
        self.cells().get(index).map(|cell| &cell.pair)
    }

    pub fn pair_mut(&mut self, index: usize) -> Option<&mut Pair> {
        self.cells[..self.used].get_mut(index).map(|cell| &mut cell.pair)
    }

    /// Child owned by slot `index`, for `index` in `0..=used`.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<NodeId> {
        if index > self.used {
            return None;
        }
        self.cells[index].child
    }

    /// Child slots `0..=used`, including absent ones.
    pub fn child_slots(&self) -> impl Iterator<Item = Option<NodeId>> + '_ {
        self.cells[..=self.used].iter().map(|cell| cell.child)
    }

    /// Present children in slot order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.child_slots().flatten()
    }

    /// Binary search for `key` among the occupied cells.
    ///
    /// Keys below the smallest map to gap 0 and keys above the largest to gap
    /// `used`, so ascending workloads skip the bisection entirely.
    #[must_use]
    pub fn probe(&self, key: Key) -> Probe {
        let cells = self.cells();
        let (Some(first), Some(last)) = (cells.first(), cells.last()) else {
            return Probe::Gap(0);
        };
        if key < first.pair.key {
            return Probe::Gap(0);
        }
        if key > last.pair.key {
            return Probe::Gap(self.used);
        }
        match cells.binary_search_by(|cell| cell.pair.key.cmp(&key)) {
            Ok(index) => Probe::Found(index),
            Err(index) => Probe::Gap(index),
        }
    }

    /// Shift cells at `index..=used` one slot right and place `pair` at `index`.
    ///
    /// The placed cell has no child. Requires `used < order`; the node may be
    /// full afterwards.
    pub fn insert_at(
        &mut self,
        id: NodeId,
        index: usize,
        pair: Pair,
    ) -> Result<(), InvariantViolation> {
        if self.is_full() {
            return Err(InvariantViolation::InsertIntoFullNode {
                node: id,
                used: self.used,
                order: self.order(),
            });
        }
        if index > self.used {
            return Err(InvariantViolation::CursorOutOfRange {
                node: id,
                index,
                used: self.used,
            });
        }

        self.cells[index..=self.used + 1].rotate_right(1);
        self.cells[index] = Cell { child: None, pair };
        self.used += 1;
        Ok(())
    }

    /// Place a promoted separator between the two halves of a split child.
    ///
    /// `index` must be the slot that owned `left` before the split. After the
    /// shift `left` stays below the separator and `right` takes the slot above.
    pub fn insert_separator(
        &mut self,
        id: NodeId,
        index: usize,
        pair: Pair,
        left: NodeId,
        right: NodeId,
    ) -> Result<(), InvariantViolation> {
        self.insert_at(id, index, pair)?;
        self.set_child(index, Some(left));
        self.set_child(index + 1, Some(right));
        Ok(())
    }

    /// Point slot `index` (in `0..=used`) at `child`.
    pub(super) fn set_child(&mut self, index: usize, child: Option<NodeId>) {
        self.cells[index].child = child;
    }

    /// Split the node around its median pair.
    ///
    /// Returns the promoted median and the new right sibling, which inherits
    /// this node's parent. Cells above the median (including the trailing
    /// child slot) move to the sibling. The median's own child stays here as
    /// the new trailing child.
    pub fn split(&mut self, id: NodeId) -> Result<(Pair, Self), InvariantViolation> {
        if self.used < 3 {
            return Err(InvariantViolation::SplitTooSmall {
                node: id,
                used: self.used,
            });
        }

        let mid = self.used / 2;
        let median = std::mem::take(&mut self.cells[mid].pair);

        let mut right = Self::new(self.order(), self.parent);
        for (slot, cell) in right
            .cells
            .iter_mut()
            .zip(self.cells[mid + 1..=self.used].iter_mut())
        {
            *slot = std::mem::take(cell);
        }
        right.used = self.used - mid - 1;
        self.used = mid;

        Ok((median, right))
    }
}
