//! Test a handful of keys that fit in a single root leaf.

use crate::e2e_tests::helpers::{assert_all_found, assert_valid, insert_all, tree};

#[test]
fn test_three_keys() {
    let mut tree = tree(4);

    insert_all(&mut tree, &[10, 20, 30]);

    assert_all_found(&tree, &[10, 20, 30]);
    assert_eq!(tree.search(15), None);
    assert_eq!(tree.height(), 1);
    assert_eq!(tree.node_count(), 1);
    assert_valid(&tree);
}

#[test]
fn test_repeated_search_is_stable() {
    let mut tree = tree(4);
    insert_all(&mut tree, &[10, 20, 30]);

    let first = tree.search(20).cloned();
    for _ in 0..5 {
        assert_eq!(tree.search(20).cloned(), first);
        assert_eq!(tree.search(15), None);
    }
}
