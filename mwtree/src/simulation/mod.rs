//! Deterministic simulation testing for the tree.
//!
//! This module drives a tree with:
//! - Reproducible random insert/search workloads
//! - A hash-map model of the expected contents
//! - Structural validation after inserts
//!
//! # Design Principles
//!
//! 1. All randomness is seeded for reproducibility
//! 2. Every search result is compared against the model
//! 3. Given the same seed, execution is identical
//!
//! # Usage
//!
//! ```
//! use mwtree::simulation::{Simulator, SimulatorConfig};
//!
//! let config = SimulatorConfig::new(12345) // seed
//!     .with_order(4)
//!     .with_key_range(200);
//!
//! let mut sim = Simulator::new(config)?;
//! let result = sim.run(1000);
//!
//! assert!(result.passed(), "{:?}", result.violations);
//! # Ok::<(), mwtree::TreeError>(())
//! ```

mod invariants;
mod op_gen;
mod simulator;

pub use invariants::{
    HistoryStats, InvariantChecker, Operation, OperationHistory, SimulationViolation,
};
pub use op_gen::{Op, OpGenConfig, OpGenerator};
pub use simulator::{SimulationResult, Simulator, SimulatorConfig};
