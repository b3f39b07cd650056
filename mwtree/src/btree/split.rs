//! Node splitting and median promotion.
//!
//! A split runs only on a node that an insert just made full. The median pair
//! moves up into the parent (or into a new root), which may fill the parent in
//! turn; the cascade walks one level per step and stops at the root.

use super::node::{Node, NodeId, Pair, Probe};
use super::tree::Tree;
use super::violation::{InvariantViolation, fatal};

impl Tree {
    /// Split a full node and promote its median.
    pub(super) fn split(&mut self, id: NodeId) {
        let (median, right) = match self.node_at_mut(id).split(id) {
            Ok(halves) => halves,
            Err(violation) => fatal(violation),
        };
        let parent = right.parent();
        let right_id = self.allocate(right);
        self.adopt_children(right_id);

        tracing::debug!(node = %id, sibling = %right_id, median = median.key, "split node");

        match parent {
            None => self.grow_root(id, median, right_id),
            Some(parent_id) => self.promote(parent_id, id, median, right_id),
        }
    }

    /// Point every child of `id` back at it.
    fn adopt_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.node_at(id).children().collect();
        for child in children {
            self.node_at_mut(child).set_parent(Some(id));
        }
    }

    /// Replace the root with a node holding only the promoted median.
    fn grow_root(&mut self, left: NodeId, median: Pair, right: NodeId) {
        let mut root = Node::new(self.order(), None);
        let root_id = NodeId::new(self.node_count());
        if let Err(violation) = root.insert_separator(root_id, 0, median, left, right) {
            fatal(violation);
        }
        let allocated = self.allocate(root);
        debug_assert_eq!(allocated, root_id);

        self.node_at_mut(left).set_parent(Some(root_id));
        self.node_at_mut(right).set_parent(Some(root_id));
        self.set_root(root_id);

        tracing::debug!(root = %root_id, height = self.height(), "grew new root");
    }

    /// Insert the median into the parent next to the node it came from.
    ///
    /// The cursor comes from a binary search within the parent alone; the
    /// slot it lands on must be the one that owns `left`.
    fn promote(&mut self, parent_id: NodeId, left: NodeId, median: Pair, right: NodeId) {
        let parent = self.node_at_mut(parent_id);
        let index = match parent.probe(median.key) {
            Probe::Gap(index) if parent.child(index) == Some(left) => index,
            _ => fatal(InvariantViolation::OrphanedSplit {
                node: left,
                parent: parent_id,
                key: median.key,
            }),
        };

        if let Err(violation) = parent.insert_separator(parent_id, index, median, left, right) {
            fatal(violation);
        }
        if parent.is_full() {
            self.split(parent_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::btree::node::Key;

    fn keys_of(tree: &Tree, id: NodeId) -> Vec<Key> {
        tree.node(id).expect("node").keys().collect()
    }

    fn children_of(tree: &Tree, id: NodeId) -> Vec<NodeId> {
        tree.node(id).expect("node").children().collect()
    }

    #[test]
    fn test_root_split_creates_new_root() {
        let mut tree = Tree::new(3).expect("create tree");
        let original_root = tree.root();
        for key in [2, 1, 5] {
            tree.insert(key, Vec::new());
        }

        let root = tree.root();
        assert_ne!(root, original_root);
        assert_eq!(tree.height(), 2);
        assert_eq!(keys_of(&tree, root), vec![2]);

        let children = children_of(&tree, root);
        assert_eq!(children.len(), 2);
        assert_eq!(children[0], original_root);
        assert_eq!(keys_of(&tree, children[0]), vec![1]);
        assert_eq!(keys_of(&tree, children[1]), vec![5]);
        for child in children {
            assert_eq!(tree.node(child).expect("child").parent(), Some(root));
        }
    }

    #[test]
    fn test_cascading_split_shape() {
        let mut tree = Tree::new(3).expect("create tree");
        for key in 1..=7 {
            tree.insert(key, Vec::new());
        }

        assert_eq!(tree.height(), 3);
        let root = tree.root();
        assert_eq!(keys_of(&tree, root), vec![4]);

        let interior = children_of(&tree, root);
        assert_eq!(interior.len(), 2);
        assert_eq!(keys_of(&tree, interior[0]), vec![2]);
        assert_eq!(keys_of(&tree, interior[1]), vec![6]);

        // The child that sat under the promoted median (keys 3) stays as the
        // left interior node's trailing child.
        let left_leaves: Vec<Vec<Key>> = children_of(&tree, interior[0])
            .into_iter()
            .map(|id| keys_of(&tree, id))
            .collect();
        assert_eq!(left_leaves, vec![vec![1], vec![3]]);

        let right_leaves: Vec<Vec<Key>> = children_of(&tree, interior[1])
            .into_iter()
            .map(|id| keys_of(&tree, id))
            .collect();
        assert_eq!(right_leaves, vec![vec![5], vec![7]]);

        for &node in &interior {
            assert_eq!(tree.node(node).expect("node").parent(), Some(root));
            for leaf in children_of(&tree, node) {
                assert_eq!(tree.node(leaf).expect("leaf").parent(), Some(node));
            }
        }
    }

    #[test]
    fn test_promotion_into_middle_of_parent() {
        let mut tree = Tree::new(4).expect("create tree");
        for key in [10, 20, 30, 40, 50, 60, 70] {
            tree.insert(key, Vec::new());
        }
        // Root [30, 60] over leaves [10 20] [40 50] [70].
        assert_eq!(keys_of(&tree, tree.root()), vec![30, 60]);

        for key in [41, 42] {
            tree.insert(key, Vec::new());
        }
        // Middle leaf [40 41 42 50] split and pushed 42 between 30 and 60.
        let root = tree.root();
        assert_eq!(keys_of(&tree, root), vec![30, 42, 60]);
        let leaves: Vec<Vec<Key>> = children_of(&tree, root)
            .into_iter()
            .map(|id| keys_of(&tree, id))
            .collect();
        assert_eq!(
            leaves,
            vec![vec![10, 20], vec![40, 41], vec![50], vec![70]]
        );
    }

    #[test]
    fn test_height_grows_by_at_most_one_per_insert() {
        let mut tree = Tree::new(3).expect("create tree");
        let mut height = tree.height();
        for key in 0..500 {
            tree.insert(key, Vec::new());
            assert!(tree.height() <= height + 1);
            height = tree.height();
        }
    }

    #[test]
    fn test_no_node_left_full() {
        let mut tree = Tree::new(5).expect("create tree");
        for key in (0..300).rev() {
            tree.insert(key, Vec::new());
            for index in 0..tree.node_count() {
                let node = tree.node(NodeId::new(index)).expect("node");
                assert!(node.used() < tree.order());
            }
        }
    }

    #[test]
    #[should_panic(expected = "tree invariant violated: parent #1 does not own split node #0")]
    fn test_promotion_into_non_owning_parent_is_fatal() {
        // Root [2] over leaves #0 [1] and #1 [3].
        let mut tree = Tree::new(3).expect("create tree");
        for key in 1..=3 {
            tree.insert(key, Vec::new());
        }
        let left = NodeId::new(0);
        let right = NodeId::new(1);
        assert_eq!(children_of(&tree, tree.root()), vec![left, right]);

        // Point the left leaf at its sibling, then fill it until it splits.
        tree.node_at_mut(left).set_parent(Some(right));
        tree.insert(0, Vec::new());
        tree.insert(-1, Vec::new());
    }
}
