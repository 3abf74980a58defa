//! Point lookups.

use std::fmt;

use crate::common::NodeId;
use crate::index::btree::tree::BTree;
use crate::index::btree::Key;

/// Where a key was found: a node and the key's index inside it.
///
/// Only valid until the next mutation of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyLocation {
    pub node: NodeId,
    pub index: usize,
}

impl fmt::Display for KeyLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.node, self.index)
    }
}

impl<K: Key> BTree<K> {
    /// Find `key`, returning the node and index holding it.
    ///
    /// At each node the first key `>= key` is located; an exact match ends
    /// the search, a leaf without a match means the key is absent, and
    /// otherwise the search continues in the child at that index.
    pub fn search(&self, key: &K) -> Option<KeyLocation> {
        let mut current = self.root?;
        loop {
            let node = self.arena.get(current);
            let index = node.lower_bound(key);

            if node.keys().get(index) == Some(key) {
                return Some(KeyLocation {
                    node: current,
                    index,
                });
            }
            if node.is_leaf() {
                return None;
            }
            current = node.children()[index];
        }
    }

    /// Whether `key` is stored in the tree.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Read the key at a location returned by [`BTree::search`].
    pub fn key_at(&self, location: KeyLocation) -> Option<K> {
        self.node(location.node)?.keys().get(location.index).copied()
    }

    /// Smallest key, if any.
    pub fn min(&self) -> Option<K> {
        self.root.map(|root| self.subtree_min(root))
    }

    /// Largest key, if any.
    pub fn max(&self) -> Option<K> {
        self.root.map(|root| self.subtree_max(root))
    }

    /// Leftmost key of the subtree rooted at `id` (in-order successor source).
    ///
    /// # Panics
    /// Panics if the subtree's leftmost leaf is empty, which only the root
    /// leaf of an empty tree can be.
    pub(crate) fn subtree_min(&self, mut id: NodeId) -> K {
        loop {
            let node = self.arena.get(id);
            match node.children().first() {
                Some(&child) => id = child,
                None => return node.keys()[0],
            }
        }
    }

    /// Rightmost key of the subtree rooted at `id` (in-order predecessor source).
    ///
    /// # Panics
    /// Same as [`BTree::subtree_min`].
    pub(crate) fn subtree_max(&self, mut id: NodeId) -> K {
        loop {
            let node = self.arena.get(id);
            match node.children().last() {
                Some(&child) => id = child,
                None => return node.keys()[node.key_count() - 1],
            }
        }
    }
}
