//! Workload helpers shared by tests, the simulator and the harness binary.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::btree::Key;

/// Value the harness stores under `key`.
#[must_use]
pub fn value_for(key: Key) -> Vec<u8> {
    format!("foo_{key}").into_bytes()
}

/// Keys `1..=count` in ascending order.
#[must_use]
pub fn ascending_keys(count: usize) -> Vec<Key> {
    (1..=count).filter_map(|k| Key::try_from(k).ok()).collect()
}

/// Keys `1..=count` in an order fixed by `seed`.
#[must_use]
pub fn shuffled_keys(count: usize, seed: u64) -> Vec<Key> {
    let mut keys = ascending_keys(count);
    keys.shuffle(&mut StdRng::seed_from_u64(seed));
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_for() {
        assert_eq!(value_for(42), b"foo_42".to_vec());
        assert_eq!(value_for(-1), b"foo_-1".to_vec());
    }

    #[test]
    fn test_ascending_keys() {
        assert_eq!(ascending_keys(0), Vec::<Key>::new());
        assert_eq!(ascending_keys(4), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_shuffled_keys_are_a_permutation() {
        let mut keys = shuffled_keys(500, 7);
        assert_ne!(keys, ascending_keys(500));
        keys.sort_unstable();
        assert_eq!(keys, ascending_keys(500));
    }

    #[test]
    fn test_shuffled_keys_deterministic() {
        assert_eq!(shuffled_keys(100, 99), shuffled_keys(100, 99));
        assert_ne!(shuffled_keys(100, 1), shuffled_keys(100, 2));
    }
}
