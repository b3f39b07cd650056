//! In-memory multiway search tree.
//!
//! # Structure
//!
//! The tree consists of:
//! - Nodes: fixed arrays of `order + 1` cells, each pairing an optional child
//!   with a key/value pair; the last occupied slot carries only a child
//! - An arena owning every node, addressed by [`NodeId`] handles
//! - A root handle that moves up whenever the root splits
//!
//! # Operations
//!
//! - Search descends from the root, binary searching each node
//! - Insert places the pair at the cursor search returned; a node that becomes
//!   full is split around its median, which is promoted into the parent
//!
//! # Usage
//!
//! ```
//! use mwtree::btree::{InsertOutcome, Tree};
//!
//! let mut tree = Tree::new(3)?;
//! for key in [2, 1, 5, 3, 4] {
//!     assert_eq!(tree.insert(key, format!("v{key}")), InsertOutcome::Inserted);
//! }
//!
//! assert_eq!(tree.get(3), Some(b"v3".as_slice()));
//! assert_eq!(tree.get(6), None);
//! assert!(tree.height() > 1);
//! # Ok::<(), mwtree::btree::TreeError>(())
//! ```

mod insert;
mod node;
mod search;
mod split;
mod tree;
mod validate;
mod violation;

pub use insert::InsertOutcome;
pub use node::{Cell, Key, Node, NodeId, Pair, Probe};
pub use search::{Cursor, Lookup};
pub use tree::{Tree, TreeError};
pub use validate::TreeStats;
pub use violation::InvariantViolation;
