//! Structural invariant violations.
//!
//! A violation means the tree is already inconsistent. The engines never
//! return one as an ordinary error: they hand it to [`fatal`], which logs it
//! and aborts the operation. [`Tree::validate`](super::Tree::validate) returns
//! violations as values so tests and the simulator can report them.

use super::node::{Key, NodeId};

/// A broken structural invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// An insert targeted a node that already holds `order` pairs.
    InsertIntoFullNode { node: NodeId, used: usize, order: usize },
    /// A cursor pointed past the end of the occupied cells.
    CursorOutOfRange { node: NodeId, index: usize, used: usize },
    /// A split was attempted on a node with fewer than three pairs.
    SplitTooSmall { node: NodeId, used: usize },
    /// A child handle does not resolve to a node in the arena.
    DanglingChild { node: NodeId },
    /// The parent of a split node does not own it at the promotion cursor.
    OrphanedSplit { node: NodeId, parent: NodeId, key: Key },
    /// Keys within a node are not strictly ascending.
    KeysOutOfOrder { node: NodeId, index: usize },
    /// A key lies outside the bounds implied by its ancestors.
    KeyOutOfBounds { node: NodeId, key: Key },
    /// A node holds `order` or more pairs after an insert returned.
    Overfull { node: NodeId, used: usize, order: usize },
    /// A non-root node holds no pairs.
    EmptyNode { node: NodeId },
    /// A node has children in some slots but not others.
    MixedNode { node: NodeId },
    /// A node's parent handle does not match the cell that owns it.
    ParentMismatch {
        node: NodeId,
        expected: Option<NodeId>,
        actual: Option<NodeId>,
    },
    /// A node is reachable through more than one cell.
    SharedChild { node: NodeId },
    /// Leaves sit at different depths.
    UnevenLeaves { node: NodeId, depth: usize, expected: usize },
    /// The stored pair count disagrees with the tree's length.
    LengthMismatch { counted: usize, recorded: usize },
    /// Some allocated nodes are unreachable from the root.
    UnreachableNodes { reachable: usize, allocated: usize },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsertIntoFullNode { node, used, order } => {
                write!(f, "insert into full node {node} ({used}/{order} cells used)")
            }
            Self::CursorOutOfRange { node, index, used } => {
                write!(f, "cursor index {index} out of range for node {node} with {used} cells")
            }
            Self::SplitTooSmall { node, used } => {
                write!(f, "split of node {node} with only {used} pairs (need at least 3)")
            }
            Self::DanglingChild { node } => write!(f, "dangling node handle {node}"),
            Self::OrphanedSplit { node, parent, key } => {
                write!(
                    f,
                    "parent {parent} does not own split node {node} at the cursor for key {key}"
                )
            }
            Self::KeysOutOfOrder { node, index } => {
                write!(f, "keys of node {node} not ascending at index {index}")
            }
            Self::KeyOutOfBounds { node, key } => {
                write!(f, "key {key} in node {node} lies outside its subtree bounds")
            }
            Self::Overfull { node, used, order } => {
                write!(f, "node {node} is overfull ({used} pairs, order {order})")
            }
            Self::EmptyNode { node } => write!(f, "non-root node {node} is empty"),
            Self::MixedNode { node } => {
                write!(f, "node {node} mixes present and absent children")
            }
            Self::ParentMismatch {
                node,
                expected,
                actual,
            } => write!(
                f,
                "node {node} has parent {actual:?}, expected {expected:?}"
            ),
            Self::SharedChild { node } => {
                write!(f, "node {node} is owned by more than one cell")
            }
            Self::UnevenLeaves {
                node,
                depth,
                expected,
            } => write!(f, "leaf {node} at depth {depth}, expected {expected}"),
            Self::LengthMismatch { counted, recorded } => {
                write!(f, "counted {counted} pairs but tree records {recorded}")
            }
            Self::UnreachableNodes {
                reachable,
                allocated,
            } => write!(
                f,
                "only {reachable} of {allocated} allocated nodes are reachable"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Abort the current operation on a broken invariant.
///
/// The tree must be treated as corrupted once this fires.
#[cold]
#[track_caller]
pub(crate) fn fatal(violation: InvariantViolation) -> ! {
    tracing::error!(%violation, "tree invariant violated");
    panic!("tree invariant violated: {violation}");
}
