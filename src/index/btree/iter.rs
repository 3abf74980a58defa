//! Lazy in-order traversal.

use std::iter::FusedIterator;

use crate::common::NodeId;
use crate::index::btree::tree::BTree;
use crate::index::btree::Key;

/// Ascending iterator over the keys of a [`BTree`].
///
/// Visits `child[0], key[0], child[1], key[1], ..., child[last]` using an
/// explicit stack of `(node, next key index)` frames, so it yields one key
/// per `next()` and never mutates the tree.
pub struct Iter<'a, K: Key> {
    tree: &'a BTree<K>,
    stack: Vec<(NodeId, usize)>,
    remaining: usize,
}

impl<'a, K: Key> Iter<'a, K> {
    pub(crate) fn new(tree: &'a BTree<K>) -> Self {
        let mut iter = Self {
            tree,
            stack: Vec::with_capacity(tree.height()),
            remaining: tree.len(),
        };
        if let Some(root) = tree.root {
            iter.push_left_spine(root);
        }
        iter
    }

    fn push_left_spine(&mut self, mut id: NodeId) {
        let tree = self.tree;
        loop {
            self.stack.push((id, 0));
            match tree.arena.get(id).children().first() {
                Some(&child) => id = child,
                None => break,
            }
        }
    }
}

impl<K: Key> Iterator for Iter<'_, K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let tree = self.tree;
        loop {
            let (id, index) = self.stack.last_mut()?;
            let node = tree.arena.get(*id);

            if *index < node.key_count() {
                let key = node.keys()[*index];
                *index += 1;
                if let Some(&right) = node.children().get(*index) {
                    self.push_left_spine(right);
                }
                self.remaining = self.remaining.saturating_sub(1);
                return Some(key);
            }

            self.stack.pop();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Key> ExactSizeIterator for Iter<'_, K> {}

impl<K: Key> FusedIterator for Iter<'_, K> {}

impl<K: Key> BTree<K> {
    /// Iterate over all keys in ascending order.
    ///
    /// Restartable: every call starts a fresh pass over the current tree.
    pub fn traverse(&self) -> Iter<'_, K> {
        Iter::new(self)
    }

    /// Collect all keys in ascending order.
    pub fn keys(&self) -> Vec<K> {
        self.traverse().collect()
    }
}

impl<'a, K: Key> IntoIterator for &'a BTree<K> {
    type Item = K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.traverse()
    }
}
