//! The tree object: arena, root handle, and fixed configuration.
//!
//! Nodes live in a single arena owned by the tree. Child and parent links are
//! [`NodeId`] handles into that arena, so the parent association never owns
//! anything. Nodes are only ever appended; nothing in this crate removes keys.

use crate::config::{DuplicatePolicy, MIN_ORDER, TreeConfig};

use super::node::{Node, NodeId};
use super::violation::{InvariantViolation, fatal};

/// An in-memory multiway search tree from integer keys to byte values.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
    config: TreeConfig,
    len: usize,
    height: usize,
}

impl Tree {
    /// Create an empty tree with the given order and the default duplicate policy.
    ///
    /// # Errors
    ///
    /// Returns an error if `order` is below [`MIN_ORDER`].
    pub fn new(order: usize) -> Result<Self, TreeError> {
        Self::with_config(TreeConfig::new(order))
    }

    /// Create an empty tree from a full configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `config.order` is below [`MIN_ORDER`]: splitting a
    /// smaller node cannot yield two non-empty halves plus a promoted key.
    pub fn with_config(config: TreeConfig) -> Result<Self, TreeError> {
        if config.order < MIN_ORDER {
            return Err(TreeError::OrderTooSmall {
                order: config.order,
                minimum: MIN_ORDER,
            });
        }

        let root = NodeId::new(0);
        Ok(Self {
            nodes: vec![Node::new(config.order, None)],
            root,
            config,
            len: 0,
            height: 1,
        })
    }

    /// Maximum number of keys a node holds.
    #[must_use]
    pub const fn order(&self) -> usize {
        self.config.order
    }

    #[must_use]
    pub const fn duplicate_policy(&self) -> DuplicatePolicy {
        self.config.duplicate_policy
    }

    #[must_use]
    pub const fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Number of stored pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels, counting the root. An empty tree has height 1.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of allocated nodes.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len() is not const-stable
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Handle of the current root node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node by handle.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Resolve a handle that the tree itself produced.
    pub(super) fn node_at(&self, id: NodeId) -> &Node {
        self.nodes
            .get(id.index())
            .unwrap_or_else(|| fatal(InvariantViolation::DanglingChild { node: id }))
    }

    pub(super) fn node_at_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes
            .get_mut(id.index())
            .unwrap_or_else(|| fatal(InvariantViolation::DanglingChild { node: id }))
    }

    /// Move a node into the arena and return its handle.
    pub(super) fn allocate(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(super) const fn set_root(&mut self, root: NodeId) {
        self.root = root;
        self.height += 1;
    }

    pub(super) const fn record_insert(&mut self) {
        self.len += 1;
    }
}

/// Errors that can occur when constructing a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The requested order cannot support splitting.
    OrderTooSmall { order: usize, minimum: usize },
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrderTooSmall { order, minimum } => {
                write!(f, "order {order} is too small (minimum {minimum})")
            }
        }
    }
}

impl std::error::Error for TreeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree_is_empty() {
        let tree = Tree::new(4).expect("create tree");

        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.order(), 4);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.duplicate_policy(), DuplicatePolicy::Overwrite);

        let root = tree.node(tree.root()).expect("root exists");
        assert!(root.is_empty());
        assert!(root.is_leaf());
        assert_eq!(root.order(), 4);
        assert_eq!(root.parent(), None);
    }

    #[test]
    fn test_order_too_small() {
        for order in 0..MIN_ORDER {
            let err = Tree::new(order).expect_err("order below minimum");
            assert_eq!(err, TreeError::OrderTooSmall { order, minimum: 3 });
        }
        assert!(Tree::new(MIN_ORDER).is_ok());
    }

    #[test]
    fn test_tree_error_display() {
        let err = TreeError::OrderTooSmall {
            order: 2,
            minimum: 3,
        };
        assert_eq!(err.to_string(), "order 2 is too small (minimum 3)");
    }

    #[test]
    fn test_with_config_keeps_policy() {
        let config = TreeConfig::new(8).with_duplicate_policy(DuplicatePolicy::Reject);
        let tree = Tree::with_config(config).expect("create tree");
        assert_eq!(tree.duplicate_policy(), DuplicatePolicy::Reject);
        assert_eq!(tree.config().order, 8);
    }

    #[test]
    fn test_unknown_handle() {
        let tree = Tree::new(4).expect("create tree");
        assert!(tree.node(NodeId::new(7)).is_none());
    }

    #[test]
    #[should_panic(expected = "dangling node handle #7")]
    fn test_dangling_handle_is_fatal() {
        let tree = Tree::new(4).expect("create tree");
        let _ = tree.node_at(NodeId::new(7));
    }
}
