//! Full-tree structural validation.
//!
//! Walks every node reachable from the root and checks:
//! - keys strictly ascending within each node
//! - every key inside the bounds set by its ancestors
//! - no node holding `order` or more pairs
//! - leaves childless, interior nodes with a child in every slot
//! - parent handles matching the owning cell, no node owned twice
//! - all leaves at the same depth, matching the recorded height
//! - pair and node counts matching the tree's bookkeeping

use super::node::{Key, NodeId};
use super::tree::Tree;
use super::violation::InvariantViolation;

/// Shape summary produced by a successful validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub height: usize,
    pub nodes: usize,
    pub leaves: usize,
    pub pairs: usize,
}

/// A node waiting to be checked, with the open interval its keys must fall in.
struct Pending {
    id: NodeId,
    parent: Option<NodeId>,
    lower: Option<Key>,
    upper: Option<Key>,
    depth: usize,
}

impl Tree {
    /// Check every structural invariant.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<TreeStats, InvariantViolation> {
        let mut visited = vec![false; self.node_count()];
        let mut stats = TreeStats {
            height: self.height(),
            nodes: 0,
            leaves: 0,
            pairs: 0,
        };
        let mut stack = vec![Pending {
            id: self.root(),
            parent: None,
            lower: None,
            upper: None,
            depth: 0,
        }];

        while let Some(pending) = stack.pop() {
            let id = pending.id;
            let Some(node) = self.node(id) else {
                return Err(InvariantViolation::DanglingChild { node: id });
            };
            let Some(seen) = visited.get_mut(id.index()) else {
                return Err(InvariantViolation::DanglingChild { node: id });
            };
            if std::mem::replace(seen, true) {
                return Err(InvariantViolation::SharedChild { node: id });
            }
            stats.nodes += 1;
            stats.pairs += node.used();

            if node.parent() != pending.parent {
                return Err(InvariantViolation::ParentMismatch {
                    node: id,
                    expected: pending.parent,
                    actual: node.parent(),
                });
            }
            if node.used() >= self.order() {
                return Err(InvariantViolation::Overfull {
                    node: id,
                    used: node.used(),
                    order: self.order(),
                });
            }
            if node.is_empty() && pending.parent.is_some() {
                return Err(InvariantViolation::EmptyNode { node: id });
            }

            let keys: Vec<Key> = node.keys().collect();
            if let Some(index) = keys.windows(2).position(|w| w[0] >= w[1]) {
                return Err(InvariantViolation::KeysOutOfOrder {
                    node: id,
                    index: index + 1,
                });
            }
            for &key in &keys {
                let above = pending.lower.is_none_or(|lower| key > lower);
                let below = pending.upper.is_none_or(|upper| key < upper);
                if !(above && below) {
                    return Err(InvariantViolation::KeyOutOfBounds { node: id, key });
                }
            }

            let slots: Vec<Option<NodeId>> = node.child_slots().collect();
            if node.is_leaf() {
                if slots.iter().any(Option::is_some) {
                    return Err(InvariantViolation::MixedNode { node: id });
                }
                // Height counts the root level, so it is never zero.
                let expected = self.height().saturating_sub(1);
                if pending.depth != expected {
                    return Err(InvariantViolation::UnevenLeaves {
                        node: id,
                        depth: pending.depth,
                        expected,
                    });
                }
                stats.leaves += 1;
                continue;
            }

            for (index, slot) in slots.into_iter().enumerate() {
                let Some(child) = slot else {
                    return Err(InvariantViolation::MixedNode { node: id });
                };
                stack.push(Pending {
                    id: child,
                    parent: Some(id),
                    lower: if index == 0 {
                        pending.lower
                    } else {
                        keys.get(index - 1).copied()
                    },
                    upper: keys.get(index).copied().or(pending.upper),
                    depth: pending.depth + 1,
                });
            }
        }

        if stats.pairs != self.len() {
            return Err(InvariantViolation::LengthMismatch {
                counted: stats.pairs,
                recorded: self.len(),
            });
        }
        if stats.nodes != self.node_count() {
            return Err(InvariantViolation::UnreachableNodes {
                reachable: stats.nodes,
                allocated: self.node_count(),
            });
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::btree::Node;

    /// Tree of order 3 holding `1..=count`, so shapes are fixed by the split rules.
    fn tree_of(count: Key) -> Tree {
        let mut tree = Tree::new(3).expect("create tree");
        for key in 1..=count {
            tree.insert(key, Vec::new());
        }
        tree
    }

    fn children_of(tree: &Tree, id: NodeId) -> Vec<NodeId> {
        tree.node(id).expect("node").children().collect()
    }

    #[test]
    fn test_validate_empty_tree() {
        let tree = Tree::new(3).expect("create tree");
        let stats = tree.validate().expect("valid");
        assert_eq!(
            stats,
            TreeStats {
                height: 1,
                nodes: 1,
                leaves: 1,
                pairs: 0
            }
        );
    }

    #[test]
    fn test_validate_after_each_insert() {
        let mut tree = Tree::new(3).expect("create tree");
        let keys = [50, 10, 90, 30, 70, 20, 80, 40, 60, 0, 100, 55, 65, 75, 85];
        for (count, &key) in keys.iter().enumerate() {
            tree.insert(key, key.to_string());
            let stats = tree
                .validate()
                .unwrap_or_else(|violation| panic!("after inserting {key}: {violation}"));
            assert_eq!(stats.pairs, count + 1);
        }
    }

    #[test]
    fn test_validate_counts() {
        let mut tree = Tree::new(4).expect("create tree");
        for key in 0..100 {
            tree.insert(key, Vec::new());
        }
        let stats = tree.validate().expect("valid");
        assert_eq!(stats.pairs, 100);
        assert_eq!(stats.nodes, tree.node_count());
        assert_eq!(stats.height, tree.height());
        assert!(stats.leaves < stats.nodes);
    }

    #[test]
    fn test_validate_detects_overfull_root() {
        // Bypass the insert path so the root is left holding `order` pairs.
        let mut tree = Tree::new(3).expect("create tree");
        let root = tree.root();
        for (index, key) in [1, 2, 3].into_iter().enumerate() {
            tree.node_at_mut(root)
                .insert_at(root, index, crate::btree::Pair::new(key, Vec::new()))
                .expect("raw insert");
            tree.record_insert();
        }

        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::Overfull {
                node: root,
                used: 3,
                order: 3
            })
        );
    }

    #[test]
    fn test_validate_detects_length_mismatch() {
        let mut tree = Tree::new(3).expect("create tree");
        tree.insert(1, Vec::new());
        tree.record_insert();

        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::LengthMismatch {
                counted: 1,
                recorded: 2
            })
        );
    }

    #[test]
    fn test_validate_detects_bad_parent() {
        let mut tree = Tree::new(3).expect("create tree");
        for key in 1..=3 {
            tree.insert(key, Vec::new());
        }
        let root = tree.root();
        let leaf = tree.node(root).expect("root").child(0).expect("leaf");
        tree.node_at_mut(leaf).set_parent(None);

        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::ParentMismatch {
                node: leaf,
                expected: Some(root),
                actual: None
            })
        );
    }

    #[test]
    fn test_validate_detects_keys_out_of_order() {
        let mut tree = Tree::new(8).expect("create tree");
        for key in [10, 20, 30] {
            tree.insert(key, Vec::new());
        }
        let root = tree.root();
        tree.node_at_mut(root).pair_mut(0).expect("first pair").key = 25;

        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::KeysOutOfOrder {
                node: root,
                index: 1
            })
        );
    }

    #[test]
    fn test_validate_detects_key_out_of_bounds() {
        // Root [2] over leaves [1] and [3].
        let mut tree = tree_of(3);
        let right = children_of(&tree, tree.root())[1];
        tree.node_at_mut(right).pair_mut(0).expect("pair").key = 0;

        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::KeyOutOfBounds {
                node: right,
                key: 0
            })
        );
    }

    #[test]
    fn test_validate_detects_missing_child() {
        let mut tree = tree_of(3);
        let root = tree.root();
        tree.node_at_mut(root).set_child(1, None);

        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::MixedNode { node: root })
        );
    }

    #[test]
    fn test_validate_detects_dangling_child() {
        let mut tree = tree_of(3);
        let root = tree.root();
        let stray = NodeId::new(99);
        tree.node_at_mut(root).set_child(0, Some(stray));

        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::DanglingChild { node: stray })
        );
    }

    #[test]
    fn test_validate_detects_shared_child() {
        let mut tree = tree_of(3);
        let root = tree.root();
        let right = children_of(&tree, root)[1];
        tree.node_at_mut(root).set_child(0, Some(right));

        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::SharedChild { node: right })
        );
    }

    #[test]
    fn test_validate_detects_uneven_leaves() {
        // Root [4] over interiors [2] and [6], each over two leaves.
        let mut tree = tree_of(7);
        let root = tree.root();
        let right_interior = children_of(&tree, root)[1];
        let leaf = children_of(&tree, right_interior)[1];

        // Hoist the leaf [7] one level up in place of its parent.
        tree.node_at_mut(root).set_child(1, Some(leaf));
        tree.node_at_mut(leaf).set_parent(Some(root));

        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::UnevenLeaves {
                node: leaf,
                depth: 1,
                expected: 2
            })
        );
    }

    #[test]
    fn test_validate_detects_unreachable_node() {
        let mut tree = tree_of(1);
        tree.allocate(Node::new(3, None));

        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::UnreachableNodes {
                reachable: 1,
                allocated: 2
            })
        );
    }
}
