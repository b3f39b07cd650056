#![cfg_attr(test, allow(clippy::disallowed_methods))]
// Life of an insert:
// 1. Descend from the root, binary searching each node
// 2. Key found: apply the duplicate policy, no structural change
// 3. Key absent: shift the leaf's cells right and place the pair
// 4. Leaf now full: split around the median and promote it
//     - Parent fills up in turn: split again, one level per step
//     - Root splits: grow a new root above it
//
// System components:
//  - B-tree core (arena of nodes, search, insert, split, validation)
//  - Configuration (tree shape, harness environment)
//  - Deterministic simulation against a hash-map model

pub mod btree;
pub mod config;
pub mod simulation;
pub mod testing;

mod e2e_tests;

pub use btree::{InsertOutcome, Pair, Tree, TreeError};
pub use config::{DuplicatePolicy, HarnessConfig, TreeConfig};
