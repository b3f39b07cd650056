//! Operation generator for deterministic simulation testing.
//!
//! Produces random but reproducible sequences of inserts and searches.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::btree::Key;

/// Configuration for operation generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpGenConfig {
    /// Probability of generating a search vs an insert (0.0 = always insert, 1.0 = always search).
    pub search_rate: f64,
    /// Keys are drawn from `0..key_range`. Small ranges force duplicates.
    pub key_range: Key,
    /// Maximum value length in bytes.
    pub max_value_length: usize,
}

impl Default for OpGenConfig {
    fn default() -> Self {
        Self {
            search_rate: 0.3,
            key_range: 10_000,
            max_value_length: 16,
        }
    }
}

/// A single simulated operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Insert { key: Key, value: Vec<u8> },
    Search { key: Key },
}

impl Op {
    #[must_use]
    pub const fn key(&self) -> Key {
        match self {
            Self::Insert { key, .. } | Self::Search { key } => *key,
        }
    }
}

/// Generator for random [`Op`] instances.
///
/// The same seed and configuration always produce the same sequence.
pub struct OpGenerator {
    rng: StdRng,
    config: OpGenConfig,
}

impl OpGenerator {
    /// Create a new generator with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, OpGenConfig::default())
    }

    /// Create a new generator with custom configuration.
    #[must_use]
    pub fn with_config(seed: u64, config: OpGenConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &OpGenConfig {
        &self.config
    }

    /// Generate the next operation.
    pub fn next_op(&mut self) -> Op {
        let key = self.random_key();
        if self.rng.random::<f64>() < self.config.search_rate {
            Op::Search { key }
        } else {
            Op::Insert {
                key,
                value: self.random_value(),
            }
        }
    }

    fn random_key(&mut self) -> Key {
        self.rng.random_range(0..self.config.key_range.max(1))
    }

    fn random_value(&mut self) -> Vec<u8> {
        let len = self.rng.random_range(0..=self.config.max_value_length);
        (0..len).map(|_| self.rng.random::<u8>()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_deterministic() {
        let mut gen1 = OpGenerator::new(12345);
        let mut gen2 = OpGenerator::new(12345);

        for _ in 0..100 {
            assert_eq!(gen1.next_op(), gen2.next_op());
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut gen1 = OpGenerator::new(1);
        let mut gen2 = OpGenerator::new(2);

        let ops1: Vec<Op> = (0..20).map(|_| gen1.next_op()).collect();
        let ops2: Vec<Op> = (0..20).map(|_| gen2.next_op()).collect();
        assert_ne!(ops1, ops2);
    }

    #[test]
    fn test_keys_stay_in_range() {
        let config = OpGenConfig {
            key_range: 10,
            ..OpGenConfig::default()
        };
        let mut generator = OpGenerator::with_config(7, config);
        assert_eq!(generator.config().key_range, 10);

        for _ in 0..500 {
            let key = generator.next_op().key();
            assert!((0..10).contains(&key), "key {key} out of range");
        }
    }

    #[test]
    fn test_search_rate_extremes() {
        let all_inserts = OpGenConfig {
            search_rate: 0.0,
            ..OpGenConfig::default()
        };
        let mut generator = OpGenerator::with_config(3, all_inserts);
        assert!((0..100).all(|_| matches!(generator.next_op(), Op::Insert { .. })));

        let all_searches = OpGenConfig {
            search_rate: 1.0,
            ..OpGenConfig::default()
        };
        let mut generator = OpGenerator::with_config(3, all_searches);
        assert!((0..100).all(|_| matches!(generator.next_op(), Op::Search { .. })));
    }

    #[test]
    fn test_value_length_bounded() {
        let config = OpGenConfig {
            search_rate: 0.0,
            max_value_length: 4,
            ..OpGenConfig::default()
        };
        let mut generator = OpGenerator::with_config(11, config);

        for _ in 0..200 {
            if let Op::Insert { value, .. } = generator.next_op() {
                assert!(value.len() <= 4);
            }
        }
    }
}
