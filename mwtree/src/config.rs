//! Tree and harness configuration.
//!
//! [`TreeConfig`] fixes a tree's shape at construction. [`HarnessConfig`]
//! drives the `mwtree` binary and is loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `MWTREE_ORDER`: Keys per node before a split (default: `1024`, minimum `3`)
//! - `MWTREE_KEY_COUNT`: Number of pairs the harness inserts (default: `10000`)
//! - `MWTREE_SEED`: Shuffle seed; keys are inserted in ascending order when unset
//! - `MWTREE_DUPLICATES`: `overwrite` or `reject` (default: `overwrite`)
//!
//! # Invariants
//!
//! - `order` is always at least [`MIN_ORDER`] once a config has been loaded

/// Smallest order that can split into two non-empty halves plus a median.
pub const MIN_ORDER: usize = 3;

/// Default keys per node.
pub const DEFAULT_ORDER: usize = 1024;

/// What an insert does when its key is already stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Replace the stored value in place.
    #[default]
    Overwrite,
    /// Keep the stored value and report the insert as rejected.
    Reject,
}

impl DuplicatePolicy {
    /// Parse a policy name as used in `MWTREE_DUPLICATES`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Some(Self::Overwrite),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Overwrite => "overwrite",
            Self::Reject => "reject",
        }
    }
}

/// Fixed parameters of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// Maximum keys per node.
    pub order: usize,
    /// Handling of repeated keys.
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER)
    }
}

impl TreeConfig {
    /// Create a config with the given order and the default duplicate policy.
    #[must_use]
    pub const fn new(order: usize) -> Self {
        Self {
            order,
            duplicate_policy: DuplicatePolicy::Overwrite,
        }
    }

    /// Set the duplicate policy.
    #[must_use]
    pub const fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}

/// Configuration for the `mwtree` harness binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Shape of the tree under test.
    pub tree: TreeConfig,
    /// Number of pairs to insert.
    pub key_count: usize,
    /// Insert keys in a seeded shuffled order instead of ascending.
    pub seed: Option<u64>,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl HarnessConfig {
    /// Default number of pairs the harness inserts.
    pub const DEFAULT_KEY_COUNT: usize = 10_000;

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is set to a value that does not parse,
    /// or if `MWTREE_ORDER` is below [`MIN_ORDER`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|name: &str| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let order = Self::load_order(lookup)?;
        let duplicate_policy = Self::load_duplicate_policy(lookup)?;
        let key_count =
            parse_var(lookup, "MWTREE_KEY_COUNT")?.unwrap_or(Self::DEFAULT_KEY_COUNT);
        let seed = parse_var(lookup, "MWTREE_SEED")?;

        Ok(Self {
            tree: TreeConfig::new(order).with_duplicate_policy(duplicate_policy),
            key_count,
            seed,
        })
    }

    fn load_order(lookup: &impl Fn(&str) -> Option<String>) -> Result<usize, ConfigError> {
        let order = parse_var(lookup, "MWTREE_ORDER")?.unwrap_or(DEFAULT_ORDER);
        if order < MIN_ORDER {
            return Err(ConfigError::InvalidValue {
                name: "MWTREE_ORDER".to_string(),
                message: format!("{order} is below the minimum order of {MIN_ORDER}"),
            });
        }
        Ok(order)
    }

    fn load_duplicate_policy(
        lookup: &impl Fn(&str) -> Option<String>,
    ) -> Result<DuplicatePolicy, ConfigError> {
        match lookup("MWTREE_DUPLICATES") {
            Some(value) => DuplicatePolicy::from_name(&value).ok_or_else(|| {
                ConfigError::InvalidValue {
                    name: "MWTREE_DUPLICATES".to_string(),
                    message: format!("'{value}' is not one of 'overwrite', 'reject'"),
                }
            }),
            None => Ok(DuplicatePolicy::default()),
        }
    }
}

/// Parse an optional variable, treating an unset variable as `None`.
fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>, ConfigError> {
    lookup(name)
        .map(|value| {
            value.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                message: format!("'{value}' is not a valid number"),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = HarnessConfig::from_lookup(&lookup_from(&[])).expect("defaults");
        assert_eq!(config.tree.order, 1024);
        assert_eq!(config.tree.duplicate_policy, DuplicatePolicy::Overwrite);
        assert_eq!(config.key_count, 10_000);
        assert_eq!(config.seed, None);
        assert_eq!(TreeConfig::default(), TreeConfig::new(DEFAULT_ORDER));
    }

    #[test]
    fn test_all_values_set() {
        let config = HarnessConfig::from_lookup(&lookup_from(&[
            ("MWTREE_ORDER", "16"),
            ("MWTREE_KEY_COUNT", "500"),
            ("MWTREE_SEED", "42"),
            ("MWTREE_DUPLICATES", "Reject"),
        ]))
        .expect("valid config");

        assert_eq!(config.tree.order, 16);
        assert_eq!(config.tree.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(config.key_count, 500);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_order_below_minimum() {
        let err = HarnessConfig::from_lookup(&lookup_from(&[("MWTREE_ORDER", "2")]))
            .expect_err("order too small");
        assert_eq!(
            err.to_string(),
            "invalid value for MWTREE_ORDER: 2 is below the minimum order of 3"
        );
    }

    #[test]
    fn test_unparseable_number() {
        let err = HarnessConfig::from_lookup(&lookup_from(&[("MWTREE_KEY_COUNT", "lots")]))
            .expect_err("not a number");
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "MWTREE_KEY_COUNT".to_string(),
                message: "'lots' is not a valid number".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_policy() {
        let err = HarnessConfig::from_lookup(&lookup_from(&[("MWTREE_DUPLICATES", "merge")]))
            .expect_err("unknown policy");
        assert!(matches!(err, ConfigError::InvalidValue { ref name, .. } if name == "MWTREE_DUPLICATES"));
    }

    #[test]
    fn test_policy_names_round_trip() {
        for policy in [DuplicatePolicy::Overwrite, DuplicatePolicy::Reject] {
            assert_eq!(DuplicatePolicy::from_name(policy.name()), Some(policy));
        }
    }
}
