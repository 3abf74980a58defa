//! B-tree node - an ordered bucket of keys plus child links.

use crate::common::config::{max_children, max_keys};
use crate::common::{Error, NodeId, Result};
use crate::index::btree::Key;

/// A single node of the tree.
///
/// Leaves carry no children. An internal node always has exactly one more
/// child than it has keys, and for every `i`:
///
/// ```text
///   keys(children[i])  <=  keys[i]  <=  keys(children[i + 1])
/// ```
///
/// Both vectors reserve their full capacity (`2t - 1` keys, `2t` children)
/// when the node is created, so splits and merges never reallocate.
#[derive(Debug)]
pub struct Node<K: Key> {
    pub(crate) is_leaf: bool,
    pub(crate) keys: Vec<K>,
    pub(crate) children: Vec<NodeId>,
}

impl<K: Key> Node<K> {
    /// Create an empty node sized for minimum degree `t`.
    ///
    /// # Errors
    /// - `Error::AllocationFailure` if key or child storage cannot be reserved.
    ///   Nothing is leaked; the partial vectors are dropped.
    pub fn new(is_leaf: bool, t: usize) -> Result<Self> {
        let mut keys = Vec::new();
        keys.try_reserve_exact(max_keys(t))
            .map_err(|_| Error::AllocationFailure { requested: 1 })?;

        let mut children = Vec::new();
        if !is_leaf {
            children
                .try_reserve_exact(max_children(t))
                .map_err(|_| Error::AllocationFailure { requested: 1 })?;
        }

        Ok(Self {
            is_leaf,
            keys,
            children,
        })
    }

    /// Whether this node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    /// Keys in ascending order.
    #[inline]
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Child ids, empty for a leaf.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// A full node cannot take another key without splitting.
    #[inline]
    pub fn is_full(&self, t: usize) -> bool {
        self.keys.len() == max_keys(t)
    }

    /// Index of the first key `>= key`.
    ///
    /// Used for lookups and deletion: if `key` is not at this index it can
    /// only live in `children[index]`.
    pub fn lower_bound(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k < key)
    }

    /// Index of the first key `> key`.
    ///
    /// Used for insertion so that a duplicate lands after its equals.
    pub fn upper_bound(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k <= key)
    }

    /// Insert into a leaf at its sorted position, shifting larger keys right.
    pub(crate) fn insert_sorted(&mut self, key: K) {
        debug_assert!(self.is_leaf, "insert_sorted on internal node");
        let pos = self.upper_bound(&key);
        self.keys.insert(pos, key);
    }
}
