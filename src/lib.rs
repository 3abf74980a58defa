//! btree-index - an in-memory B-tree over ordered scalar keys.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          BTree<K>                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                Operations (index/btree/)                 │   │
//! │  │   insert (split down)   search/traverse   delete (fill)  │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                   NodeArena (arena.rs)                   │   │
//! │  │     slots: Vec<Option<Node>>  +  free_list: Vec<NodeId>  │   │
//! │  │        node budget (max_nodes)  +  TreeStats counters    │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                 Common (common/)                         │   │
//! │  │          NodeId + Error/Result + TreeConfig              │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeId, Error, config)
//! - [`index`] - Index structures (B-tree)
//!
//! # Quick Start
//! ```
//! use btree_index::BTree;
//!
//! let mut tree = BTree::new(2).unwrap();
//! for key in [10, 20, 5, 6, 12, 30, 7, 17, 1, 3, 8, 25, 35, 40] {
//!     tree.insert(key).unwrap();
//! }
//!
//! assert!(tree.contains(&25));
//! assert!(!tree.contains(&15));
//!
//! tree.delete(&10);
//! assert_eq!(tree.traverse().next(), Some(1));
//!
//! let released = tree.destroy();
//! assert!(released > 0);
//! ```

pub mod common;
pub mod index;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_MIN_DEGREE, MIN_DEGREE_LOWER_BOUND, MIN_DEGREE_UPPER_BOUND};
pub use common::{Error, NodeId, Result, TreeConfig};

pub use index::btree::{BTree, Iter, Key, KeyLocation, Node, StatsSnapshot, TreeShape, TreeStats};
