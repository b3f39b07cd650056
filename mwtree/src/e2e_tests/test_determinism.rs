//! Test that the same workload always produces the same tree shape.

use crate::btree::{Key, NodeId, Tree};
use crate::e2e_tests::helpers::{assert_valid, insert_all, tree};
use crate::testing::shuffled_keys;

fn build(seed: u64) -> Tree {
    let mut tree = tree(5);
    insert_all(&mut tree, &shuffled_keys(1_000, seed));
    tree
}

fn layout(tree: &Tree) -> Vec<(Option<NodeId>, Vec<Key>)> {
    (0..tree.node_count())
        .map(|index| {
            let node = tree.node(NodeId::new(index)).expect("node");
            (node.parent(), node.keys().collect())
        })
        .collect()
}

#[test]
fn test_deterministic_shape() {
    let first = build(2024);
    let second = build(2024);

    assert_eq!(first.root(), second.root());
    assert_eq!(first.height(), second.height());
    assert_eq!(layout(&first), layout(&second));
    assert_eq!(assert_valid(&first), assert_valid(&second));
}
