//! Test a seeded shuffled workload at several orders.

use crate::e2e_tests::helpers::{assert_all_found, assert_valid, insert_all, tree};
use crate::testing::shuffled_keys;

#[test]
fn test_shuffled_bulk_across_orders() {
    let keys = shuffled_keys(3_000, 42);

    for order in [3, 4, 5, 16, 128] {
        let mut tree = tree(order);
        insert_all(&mut tree, &keys);

        assert_all_found(&tree, &keys);
        assert_eq!(tree.get(3_001), None);
        let stats = assert_valid(&tree);
        assert_eq!(stats.pairs, keys.len(), "order {order}");
    }
}

#[test]
fn test_descending_keys() {
    let mut tree = tree(4);
    let keys: Vec<_> = (1..=1_000).rev().collect();

    insert_all(&mut tree, &keys);

    assert_all_found(&tree, &keys);
    assert_valid(&tree);
}

#[test]
fn test_negative_and_extreme_keys() {
    let mut tree = tree(3);
    let keys = [i64::MIN, -1, 0, 1, i64::MAX, -500, 500];

    insert_all(&mut tree, &keys);

    assert_all_found(&tree, &keys);
    assert_eq!(tree.get(2), None);
    assert_valid(&tree);
}
