//! Test a minimum-order tree splitting its root while keys arrive out of order.

use crate::e2e_tests::helpers::{assert_all_found, assert_valid, insert_all, tree};
use crate::testing::value_for;

#[test]
fn test_small_order_split() {
    let mut tree = tree(3);
    let original_root = tree.root();

    insert_all(&mut tree, &[2, 1, 5, 3, 4]);

    assert_eq!(tree.search(3).map(|p| p.value.clone()), Some(value_for(3)));
    assert_ne!(tree.root(), original_root, "root should have split");
    assert!(tree.height() >= 2);
    assert_all_found(&tree, &[1, 2, 3, 4, 5]);
    assert_eq!(tree.get(0), None);
    assert_eq!(tree.get(6), None);

    let stats = assert_valid(&tree);
    assert_eq!(stats.pairs, 5);
}

#[test]
fn test_small_order_validates_after_each_insert() {
    let mut tree = tree(3);
    for key in [2, 1, 5, 3, 4] {
        insert_all(&mut tree, &[key]);
        assert_valid(&tree);
    }
}
