//! Index structures.
//!
//! - [`btree`] - In-memory B-tree over ordered scalar keys

pub mod btree;
