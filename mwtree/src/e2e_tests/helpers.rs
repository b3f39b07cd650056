//! Common helpers for end-to-end tests.

use crate::btree::{InsertOutcome, Key, Tree, TreeStats};
use crate::config::{DuplicatePolicy, TreeConfig};
use crate::testing::value_for;

/// Create an empty tree with the default duplicate policy.
pub fn tree(order: usize) -> Tree {
    Tree::new(order).expect("Failed to create tree")
}

/// Create an empty tree with an explicit duplicate policy.
pub fn tree_with_policy(order: usize, policy: DuplicatePolicy) -> Tree {
    Tree::with_config(TreeConfig::new(order).with_duplicate_policy(policy))
        .expect("Failed to create tree")
}

/// Insert every key with its harness value, asserting each one is new.
pub fn insert_all(tree: &mut Tree, keys: &[Key]) {
    for &key in keys {
        assert_eq!(
            tree.insert(key, value_for(key)),
            InsertOutcome::Inserted,
            "key {key} should be new"
        );
    }
}

/// Assert every key is found with its harness value.
pub fn assert_all_found(tree: &Tree, keys: &[Key]) {
    for &key in keys {
        assert_eq!(
            tree.get(key),
            Some(value_for(key).as_slice()),
            "key {key} missing or wrong"
        );
    }
}

/// Validate the whole tree, panicking with the violation on failure.
pub fn assert_valid(tree: &Tree) -> TreeStats {
    tree.validate()
        .unwrap_or_else(|violation| panic!("tree invalid: {violation}"))
}
