//! Test both duplicate policies against keys spread over several levels.

use crate::btree::InsertOutcome;
use crate::config::DuplicatePolicy;
use crate::e2e_tests::helpers::{assert_all_found, assert_valid, insert_all, tree_with_policy};
use crate::testing::{ascending_keys, value_for};

#[test]
fn test_overwrite_every_key() {
    let mut tree = tree_with_policy(3, DuplicatePolicy::Overwrite);
    let keys = ascending_keys(200);
    insert_all(&mut tree, &keys);
    let nodes = tree.node_count();

    for &key in &keys {
        let outcome = tree.insert(key, b"second".to_vec());
        assert_eq!(
            outcome,
            InsertOutcome::Replaced {
                previous: value_for(key)
            }
        );
    }

    assert_eq!(tree.len(), 200);
    assert_eq!(tree.node_count(), nodes, "overwrite must not split");
    for &key in &keys {
        assert_eq!(tree.get(key), Some(b"second".as_slice()));
    }
    assert_valid(&tree);
}

#[test]
fn test_reject_every_key() {
    let mut tree = tree_with_policy(3, DuplicatePolicy::Reject);
    let keys = ascending_keys(200);
    insert_all(&mut tree, &keys);

    for &key in &keys {
        assert_eq!(tree.insert(key, b"second".to_vec()), InsertOutcome::Rejected);
    }

    assert_eq!(tree.len(), 200);
    assert_all_found(&tree, &keys);
    assert_valid(&tree);
}

#[test]
fn test_reinsert_is_idempotent() {
    for policy in [DuplicatePolicy::Overwrite, DuplicatePolicy::Reject] {
        let mut tree = tree_with_policy(4, policy);
        insert_all(&mut tree, &ascending_keys(50));
        let before = assert_valid(&tree);

        tree.insert(25, value_for(25));
        tree.insert(25, value_for(25));

        assert_eq!(assert_valid(&tree), before);
        assert_eq!(tree.get(25), Some(value_for(25).as_slice()));
    }
}
