//! Invariant checking for deterministic simulation testing.
//!
//! The history keeps a hash-map model of what the tree should contain; the
//! checker compares every tree response against it and runs the structural
//! validator.

use std::collections::HashMap;

use crate::btree::{InsertOutcome, Key, Tree};
use crate::config::DuplicatePolicy;

/// A recorded operation in the simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Insert { key: Key, outcome: InsertOutcome },
    Search { key: Key, found: bool },
}

/// Tracks the history of operations and the contents the tree should have.
#[derive(Debug, Default)]
pub struct OperationHistory {
    /// All operations in order.
    operations: Vec<Operation>,
    /// Key -> value the tree is expected to hold.
    expected_state: HashMap<Key, Vec<u8>>,
    policy: DuplicatePolicy,
    inserted: u64,
    replaced: u64,
    rejected: u64,
    search_hits: u64,
    search_misses: u64,
}

impl OperationHistory {
    /// Create an empty history modelling a tree with the given policy.
    #[must_use]
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Value the model holds for `key`.
    #[must_use]
    pub fn expected(&self, key: Key) -> Option<&[u8]> {
        self.expected_state.get(&key).map(Vec::as_slice)
    }

    /// Outcome the tree should report when `value` is inserted under `key`.
    #[must_use]
    #[allow(clippy::disallowed_methods)] // Replaced carries its own copy of the old value
    pub fn expected_outcome(&self, key: Key) -> InsertOutcome {
        match (self.expected_state.get(&key), self.policy) {
            (None, _) => InsertOutcome::Inserted,
            (Some(previous), DuplicatePolicy::Overwrite) => InsertOutcome::Replaced {
                previous: previous.clone(),
            },
            (Some(_), DuplicatePolicy::Reject) => InsertOutcome::Rejected,
        }
    }

    /// Record an insert and apply it to the model.
    pub fn record_insert(&mut self, key: Key, value: Vec<u8>, outcome: InsertOutcome) {
        match outcome {
            InsertOutcome::Inserted => self.inserted += 1,
            InsertOutcome::Replaced { .. } => self.replaced += 1,
            InsertOutcome::Rejected => self.rejected += 1,
        }

        let keep_existing =
            self.policy == DuplicatePolicy::Reject && self.expected_state.contains_key(&key);
        if !keep_existing {
            self.expected_state.insert(key, value);
        }

        self.operations.push(Operation::Insert { key, outcome });
    }

    /// Record a search.
    pub fn record_search(&mut self, key: Key, found: bool) {
        if found {
            self.search_hits += 1;
        } else {
            self.search_misses += 1;
        }
        self.operations.push(Operation::Search { key, found });
    }

    /// Get the number of operations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if history is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Get statistics.
    #[must_use]
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            total_operations: self.operations.len(),
            inserted: self.inserted,
            replaced: self.replaced,
            rejected: self.rejected,
            search_hits: self.search_hits,
            search_misses: self.search_misses,
            unique_keys: self.expected_state.len(),
        }
    }

    /// Get the expected state (for verification).
    #[must_use]
    pub const fn expected_state(&self) -> &HashMap<Key, Vec<u8>> {
        &self.expected_state
    }
}

/// Statistics about the operation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStats {
    pub total_operations: usize,
    /// Inserts that added a new key.
    pub inserted: u64,
    /// Inserts that overwrote an existing value.
    pub replaced: u64,
    /// Inserts that left an existing value untouched.
    pub rejected: u64,
    pub search_hits: u64,
    pub search_misses: u64,
    /// Number of keys in the model.
    pub unique_keys: usize,
}

/// An invariant violation detected during simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationViolation {
    /// Description of the violation.
    pub description: String,
    /// Operation index where it was detected.
    pub operation_index: usize,
    /// Additional context.
    pub context: String,
}

impl std::fmt::Display for SimulationViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "op {}: {}", self.operation_index, self.description)?;
        if !self.context.is_empty() {
            write!(f, " ({})", self.context)?;
        }
        Ok(())
    }
}

/// Checker for tree invariants.
#[derive(Debug, Default)]
pub struct InvariantChecker {
    /// Detected violations.
    violations: Vec<SimulationViolation>,
}

impl InvariantChecker {
    /// Create a new invariant checker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    /// Get all violations.
    #[must_use]
    pub fn violations(&self) -> &[SimulationViolation] {
        &self.violations
    }

    /// Check if any violations were detected.
    #[must_use]
    pub const fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Clear all recorded violations.
    pub fn clear(&mut self) {
        self.violations.clear();
    }

    /// Add a violation.
    pub fn add_violation(&mut self, violation: SimulationViolation) {
        self.violations.push(violation);
    }

    fn report(&mut self, description: &str, operation_index: usize, context: String) {
        tracing::warn!(operation_index, %context, "{description}");
        self.add_violation(SimulationViolation {
            description: description.to_string(),
            operation_index,
            context,
        });
    }

    /// Check an insert's outcome against the model, before the model is updated.
    pub fn check_insert(
        &mut self,
        history: &OperationHistory,
        key: Key,
        outcome: &InsertOutcome,
        operation_index: usize,
    ) {
        let expected = history.expected_outcome(key);
        if *outcome != expected {
            self.report(
                "Insert outcome disagrees with model",
                operation_index,
                format!("key {key}: expected {expected:?}, got {outcome:?}"),
            );
        }
    }

    /// Check a search result against the model.
    pub fn check_search(
        &mut self,
        history: &OperationHistory,
        key: Key,
        actual: Option<&[u8]>,
        operation_index: usize,
    ) {
        let expected = history.expected(key);
        if actual != expected {
            self.report(
                "Search result disagrees with model",
                operation_index,
                format!("key {key}: expected {expected:?}, got {actual:?}"),
            );
        }
    }

    /// Run the full structural validator.
    pub fn check_structure(&mut self, tree: &Tree, operation_index: usize) {
        if let Err(violation) = tree.validate() {
            self.report(
                "Tree structure invalid",
                operation_index,
                violation.to_string(),
            );
        }
    }

    /// Check that the tree holds exactly the model's contents.
    pub fn check_contents(&mut self, tree: &Tree, history: &OperationHistory, operation_index: usize) {
        let expected = history.expected_state();
        if tree.len() != expected.len() {
            self.report(
                "Tree length disagrees with model",
                operation_index,
                format!("expected {}, got {}", expected.len(), tree.len()),
            );
        }

        let mut keys: Vec<Key> = expected.keys().copied().collect();
        keys.sort_unstable();
        for key in keys {
            let actual = tree.get(key);
            let wanted = history.expected(key);
            if actual != wanted {
                self.report(
                    "Stored value disagrees with model",
                    operation_index,
                    format!("key {key}: expected {wanted:?}, got {actual:?}"),
                );
            }
        }
    }
}
