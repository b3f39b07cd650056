//! Test the harness workload: ten thousand ascending keys at the default order.

use crate::config::DEFAULT_ORDER;
use crate::e2e_tests::helpers::{assert_all_found, assert_valid, insert_all, tree};
use crate::testing::ascending_keys;

#[test]
fn test_ascending_bulk() {
    let mut tree = tree(DEFAULT_ORDER);
    let keys = ascending_keys(10_000);

    insert_all(&mut tree, &keys);

    assert_eq!(tree.len(), 10_000);
    assert_all_found(&tree, &keys);
    assert_eq!(tree.search(10_001), None);
    assert_eq!(tree.search(0), None);

    let stats = assert_valid(&tree);
    assert_eq!(stats.height, 2);
    assert_eq!(stats.pairs, 10_000);
}
