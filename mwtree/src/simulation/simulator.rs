//! Main simulator harness for deterministic simulation testing.
//!
//! Ties the operation generator, the tree, the model history and the
//! invariant checker together.

use std::panic::{self, AssertUnwindSafe};

use crate::btree::{Key, Tree, TreeError, TreeStats};
use crate::config::{DuplicatePolicy, TreeConfig};

use super::invariants::{InvariantChecker, OperationHistory, SimulationViolation};
use super::op_gen::{Op, OpGenConfig, OpGenerator};

/// Configuration for the simulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Shape of the tree under test.
    pub tree: TreeConfig,
    /// Operation generation configuration.
    pub op_config: OpGenConfig,
    /// Run the structural validator after every this many inserts. Zero
    /// validates only once, after the last operation.
    pub validate_every: u64,
}

impl SimulatorConfig {
    /// Create a new simulator config with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            tree: TreeConfig::new(8),
            op_config: OpGenConfig::default(),
            validate_every: 1,
        }
    }

    #[must_use]
    pub const fn with_order(mut self, order: usize) -> Self {
        self.tree.order = order;
        self
    }

    #[must_use]
    pub const fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.tree.duplicate_policy = policy;
        self
    }

    /// Set the operation configuration.
    #[must_use]
    pub const fn with_op_config(mut self, config: OpGenConfig) -> Self {
        self.op_config = config;
        self
    }

    /// Draw keys from `0..range`.
    #[must_use]
    pub const fn with_key_range(mut self, range: Key) -> Self {
        self.op_config.key_range = range;
        self
    }

    #[must_use]
    pub const fn with_search_rate(mut self, rate: f64) -> Self {
        self.op_config.search_rate = rate;
        self
    }

    #[must_use]
    pub const fn with_validate_every(mut self, inserts: u64) -> Self {
        self.validate_every = inserts;
        self
    }
}

/// Results from a simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The seed used for this simulation.
    pub seed: u64,
    /// Number of operations processed.
    pub operations_processed: u64,
    pub inserts: u64,
    pub searches: u64,
    /// Invariant violations detected.
    pub violations: Vec<SimulationViolation>,
    /// Shape of the tree after the run, if it still validated.
    pub tree_stats: Option<TreeStats>,
    /// Whether the simulation completed without panics.
    pub completed_successfully: bool,
    /// Panic message if the simulation aborted.
    pub error: Option<String>,
}

impl SimulationResult {
    /// Check if the simulation passed (no invariant violations).
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.completed_successfully && self.violations.is_empty()
    }
}

/// The main simulator harness.
pub struct Simulator {
    config: SimulatorConfig,
    generator: OpGenerator,
    tree: Tree,
    history: OperationHistory,
    checker: InvariantChecker,
    operations_processed: u64,
    inserts: u64,
    searches: u64,
    inserts_since_validation: u64,
}

impl Simulator {
    /// Create a new simulator with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured tree order is too small.
    pub fn new(config: SimulatorConfig) -> Result<Self, TreeError> {
        Ok(Self {
            config,
            generator: OpGenerator::with_config(config.seed, config.op_config),
            tree: Tree::with_config(config.tree)?,
            history: OperationHistory::new(config.tree.duplicate_policy),
            checker: InvariantChecker::new(),
            operations_processed: 0,
            inserts: 0,
            searches: 0,
            inserts_since_validation: 0,
        })
    }

    /// Run the simulation for a given number of operations.
    ///
    /// A fatal tree invariant stops the run; it is reported through
    /// [`SimulationResult::error`] rather than unwinding into the caller.
    pub fn run(&mut self, op_count: usize) -> SimulationResult {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_ops(op_count)));
        let error = outcome.err().map(|payload| panic_message(payload.as_ref()));

        let tree_stats = if error.is_none() {
            let index = self.history.len();
            self.checker.check_structure(&self.tree, index);
            self.checker.check_contents(&self.tree, &self.history, index);
            self.tree.validate().ok()
        } else {
            None
        };

        tracing::info!(
            seed = self.config.seed,
            operations = self.operations_processed,
            violations = self.checker.violations().len(),
            "simulation finished"
        );

        SimulationResult {
            seed: self.config.seed,
            operations_processed: self.operations_processed,
            inserts: self.inserts,
            searches: self.searches,
            violations: self.checker.violations().to_vec(),
            tree_stats,
            completed_successfully: error.is_none(),
            error,
        }
    }

    fn run_ops(&mut self, op_count: usize) {
        for _ in 0..op_count {
            let op = self.generator.next_op();
            let index = self.history.len();
            self.operations_processed += 1;

            match op {
                Op::Insert { key, value } => {
                    #[allow(clippy::disallowed_methods)] // The model keeps its own copy
                    let outcome = self.tree.insert(key, value.clone());
                    self.checker.check_insert(&self.history, key, &outcome, index);
                    self.history.record_insert(key, value, outcome);
                    self.inserts += 1;
                    self.maybe_validate(index);
                }
                Op::Search { key } => {
                    let actual = self.tree.get(key);
                    self.checker.check_search(&self.history, key, actual, index);
                    self.history.record_search(key, actual.is_some());
                    self.searches += 1;
                }
            }
        }
    }

    fn maybe_validate(&mut self, index: usize) {
        if self.config.validate_every == 0 {
            return;
        }
        self.inserts_since_validation += 1;
        if self.inserts_since_validation >= self.config.validate_every {
            self.inserts_since_validation = 0;
            self.checker.check_structure(&self.tree, index);
        }
    }

    /// Get the tree under test.
    #[must_use]
    pub const fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Get the operation history.
    #[must_use]
    pub const fn history(&self) -> &OperationHistory {
        &self.history
    }

    /// Get the invariant checker.
    #[must_use]
    pub const fn checker(&self) -> &InvariantChecker {
        &self.checker
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| (*s).to_string()))
        .unwrap_or_else(|| "unknown panic".to_string())
}
