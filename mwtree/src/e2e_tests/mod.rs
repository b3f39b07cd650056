//! End-to-end tests at the public tree API level.
//!
//! Each test file covers a specific scenario, using deterministic inputs
//! to exercise whole insert/search workloads.

#![cfg(test)]

mod helpers;

mod test_ascending_bulk;
mod test_determinism;
mod test_duplicate_policy;
mod test_properties;
mod test_shuffled_bulk;
mod test_small_order_split;
mod test_three_keys;
