//! B-tree index implementation.
//!
//! A classic CLRS-style B-tree of minimum degree `t`: every node holds
//! `t-1..=2t-1` keys (the root may hold fewer) and all leaves sit at the
//! same depth.
//!
//! # Components
//! - [`BTree`] - The tree handle: lifecycle, insert, search, delete
//! - [`Node`] - One ordered key bucket plus child ids
//! - [`Iter`] - Lazy ascending traversal
//! - [`TreeStats`] - Allocation and rebalancing counters
//! - [`TreeShape`] - Result of a structural audit
//!
//! # Algorithms
//! - Insert splits any full node *before* descending through it, so a split
//!   never has to propagate upwards.
//! - Delete fills any minimal node (borrow or merge) *before* descending
//!   through it, so a removal never leaves an under-full node behind.

mod arena;
mod delete;
mod insert;
mod iter;
mod node;
mod search;
mod stats;
mod tree;
mod validate;

use std::fmt;

pub use iter::Iter;
pub use node::Node;
pub use search::KeyLocation;
pub use stats::{StatsSnapshot, TreeStats};
pub use tree::BTree;
pub use validate::TreeShape;

/// Keys stored in the tree: totally ordered scalars.
///
/// Implemented for every `Ord + Copy + Debug` type.
pub trait Key: Ord + Copy + fmt::Debug {}

impl<T: Ord + Copy + fmt::Debug> Key for T {}
