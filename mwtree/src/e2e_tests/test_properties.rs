//! Property tests over arbitrary key sequences, orders and policies.

use std::collections::HashMap;

use proptest::prelude::*;

use crate::btree::{InsertOutcome, Key};
use crate::config::DuplicatePolicy;
use crate::e2e_tests::helpers::{tree, tree_with_policy};

fn arb_policy() -> impl Strategy<Value = DuplicatePolicy> {
    prop_oneof![Just(DuplicatePolicy::Overwrite), Just(DuplicatePolicy::Reject)]
}

/// Pairs drawn from a narrow key range so duplicates are common.
fn arb_pairs(max_count: usize) -> impl Strategy<Value = Vec<(Key, Vec<u8>)>> {
    proptest::collection::vec(
        (-300..300_i64, proptest::collection::vec(any::<u8>(), 0..8)),
        0..max_count,
    )
}

proptest! {
    /// Every search agrees with a hash-map model and the tree validates after every insert.
    #[test]
    fn prop_matches_model(
        order in 3..12_usize,
        policy in arb_policy(),
        pairs in arb_pairs(400),
    ) {
        let mut tree = tree_with_policy(order, policy);
        let mut model: HashMap<Key, Vec<u8>> = HashMap::new();

        for (key, value) in pairs {
            let outcome = tree.insert(key, value.clone());
            match model.get(&key) {
                None => {
                    prop_assert_eq!(outcome, InsertOutcome::Inserted);
                    model.insert(key, value);
                }
                Some(previous) if policy == DuplicatePolicy::Overwrite => {
                    prop_assert_eq!(outcome, InsertOutcome::Replaced { previous: previous.clone() });
                    model.insert(key, value);
                }
                Some(_) => prop_assert_eq!(outcome, InsertOutcome::Rejected),
            }

            let validated = tree.validate();
            prop_assert!(validated.is_ok(), "invalid after inserting {}: {:?}", key, validated);
        }

        prop_assert_eq!(tree.len(), model.len());
        for key in -310..310 {
            prop_assert_eq!(tree.get(key), model.get(&key).map(Vec::as_slice), "key {}", key);
        }
    }

    /// Height never grows by more than one level per insert.
    #[test]
    fn prop_height_grows_slowly(
        order in 3..8_usize,
        keys in proptest::collection::vec(any::<i64>(), 1..300),
    ) {
        let mut tree = tree(order);
        let mut height = tree.height();
        for key in keys {
            tree.insert(key, Vec::new());
            prop_assert!(tree.height() <= height + 1);
            height = tree.height();
        }
    }
}
