// Forbid unwrap() in production code; a failed check exits with a logged error.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use std::collections::HashMap;
use std::time::{Duration, Instant};

use mwtree::btree::{Key, Tree};
use mwtree::config::HarnessConfig;
use mwtree::testing::{ascending_keys, shuffled_keys, value_for};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mwtree=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match HarnessConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: order={}, key_count={}, seed={:?}, duplicates={}",
        config.tree.order,
        config.key_count,
        config.seed,
        config.tree.duplicate_policy.name(),
    );

    let keys = match config.seed {
        Some(seed) => shuffled_keys(config.key_count, seed),
        None => ascending_keys(config.key_count),
    };

    let mut tree = match Tree::with_config(config.tree) {
        Ok(tree) => tree,
        Err(e) => {
            tracing::error!("Failed to create tree: {e}");
            std::process::exit(1);
        }
    };

    let tree_elapsed = time(|| {
        for &key in &keys {
            tree.insert(key, value_for(key));
        }
    });

    if let Err(message) = verify_tree(&tree, &keys) {
        tracing::error!("Tree verification failed: {message}");
        std::process::exit(1);
    }

    let stats = match tree.validate() {
        Ok(stats) => stats,
        Err(violation) => {
            tracing::error!("Tree structure invalid: {violation}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        height = stats.height,
        nodes = stats.nodes,
        leaves = stats.leaves,
        pairs = stats.pairs,
        "tree verified"
    );

    let mut baseline: HashMap<Key, Vec<u8>> = HashMap::with_capacity(keys.len());
    let baseline_elapsed = time(|| {
        for &key in &keys {
            baseline.insert(key, value_for(key));
        }
    });

    let mismatch = keys
        .iter()
        .find(|&&key| baseline.get(&key).map(Vec::as_slice) != tree.get(key));
    if let Some(key) = mismatch {
        tracing::error!("Tree and baseline disagree on key {key}");
        std::process::exit(1);
    }

    tracing::info!(
        "Inserted {} keys: tree {:?}, hash map {:?}",
        keys.len(),
        tree_elapsed,
        baseline_elapsed
    );
}

/// Check every inserted key and one key past the end.
fn verify_tree(tree: &Tree, keys: &[Key]) -> Result<(), String> {
    for &key in keys {
        let expected = value_for(key);
        match tree.get(key) {
            Some(value) if value == expected.as_slice() => {}
            Some(value) => {
                return Err(format!(
                    "key {key} holds {:?}, expected {:?}",
                    String::from_utf8_lossy(value),
                    String::from_utf8_lossy(&expected)
                ));
            }
            None => return Err(format!("key {key} not found")),
        }
    }

    let absent = keys.iter().copied().max().map_or(Some(1), |max| max.checked_add(1));
    match absent {
        Some(key) if tree.contains_key(key) => Err(format!("key {key} found but never inserted")),
        _ => Ok(()),
    }
}

fn time(f: impl FnOnce()) -> Duration {
    let start = Instant::now();
    f();
    start.elapsed()
}
