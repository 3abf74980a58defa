//! Deletion with proactive fill (borrow or merge) on the way down.
//!
//! Every node the descent enters, other than the root, is guaranteed to hold
//! at least `t` keys, so removing one key can never leave it under-full.
//!
//! ```text
//!     borrow from left                    merge
//!
//!        [ p ]          [ c ]            [ p ]           [ ]
//!        /   \    =>    /   \            /   \    =>      |
//!   [a b c]  [x]     [a b]  [p x]      [a]   [x]       [a p x]
//! ```
//! Merging needs no allocation: the right node is released into the arena.

use tracing::{debug, trace};

use crate::common::NodeId;
use crate::index::btree::stats::TreeStats;
use crate::index::btree::tree::BTree;
use crate::index::btree::Key;

impl<K: Key> BTree<K> {
    /// Remove one copy of `key`.
    ///
    /// Returns `false`, without touching the tree, if `key` is absent.
    pub fn delete(&mut self, key: &K) -> bool {
        trace!(?key, "delete");

        // The fill step restructures on the way down; only start it when the
        // key is known to be there.
        if !self.contains(key) {
            return false;
        }
        let Some(root) = self.root else {
            return false;
        };

        self.delete_from(root, key);
        self.len -= 1;
        self.shrink_root();
        true
    }

    /// Remove `key` from the subtree rooted at `id`.
    ///
    /// `id` is the root or holds at least `t` keys.
    fn delete_from(&mut self, id: NodeId, key: &K) {
        let node = self.arena.get(id);
        let index = node.lower_bound(key);
        let found = node.keys().get(index) == Some(key);
        debug_assert!(
            found || !node.is_leaf(),
            "delete reached leaf {id} without finding {key:?}"
        );

        match (found, node.is_leaf()) {
            (true, true) => {
                self.arena.get_mut(id).keys.remove(index);
            }
            (true, false) => self.delete_internal_key(id, index, key),
            (false, false) => {
                let child = self.fill_child(id, index);
                self.delete_from(child, key);
            }
            // absent; ruled out by the contains() check in delete()
            (false, true) => {}
        }
    }

    /// Remove `keys[index]` of internal node `id`.
    fn delete_internal_key(&mut self, id: NodeId, index: usize, key: &K) {
        let t = self.min_degree;
        let (left, right) = {
            let node = self.arena.get(id);
            (node.children()[index], node.children()[index + 1])
        };

        if self.arena.get(left).key_count() >= t {
            let predecessor = self.subtree_max(left);
            self.arena.get_mut(id).keys[index] = predecessor;
            self.delete_from(left, &predecessor);
        } else if self.arena.get(right).key_count() >= t {
            let successor = self.subtree_min(right);
            self.arena.get_mut(id).keys[index] = successor;
            self.delete_from(right, &successor);
        } else {
            self.merge_children(id, index);
            self.delete_from(left, key);
        }
    }

    /// Make sure `children[index]` of `parent` has at least `t` keys before
    /// the descent enters it. Returns the child to descend into, which is the
    /// left sibling when the last child had to merge leftwards.
    fn fill_child(&mut self, parent: NodeId, index: usize) -> NodeId {
        let t = self.min_degree;
        let node = self.arena.get(parent);
        let child = node.children()[index];

        if self.arena.get(child).key_count() >= t {
            return child;
        }

        let left = index.checked_sub(1).map(|i| node.children()[i]);
        let right = node.children().get(index + 1).copied();

        if let Some(left) = left {
            if self.arena.get(left).key_count() >= t {
                self.borrow_from_left(parent, index);
                return child;
            }
        }
        if let Some(right) = right {
            if self.arena.get(right).key_count() >= t {
                self.borrow_from_right(parent, index);
                return child;
            }
        }

        match (right, left) {
            (Some(_), _) => {
                self.merge_children(parent, index);
                child
            }
            (None, Some(left)) => {
                self.merge_children(parent, index - 1);
                left
            }
            // only the root can have a single child, and only transiently
            (None, None) => child,
        }
    }

    /// Rotate right: the left sibling's last key goes up to the parent, the
    /// parent's separator comes down to the front of `children[index]`.
    fn borrow_from_left(&mut self, parent: NodeId, index: usize) {
        let (left, child) = {
            let node = self.arena.get(parent);
            (node.children()[index - 1], node.children()[index])
        };

        let left_node = self.arena.get_mut(left);
        let Some(lent_key) = left_node.keys.pop() else {
            return;
        };
        let lent_child = left_node.children.pop();

        let separator = std::mem::replace(&mut self.arena.get_mut(parent).keys[index - 1], lent_key);

        let child_node = self.arena.get_mut(child);
        child_node.keys.insert(0, separator);
        if let Some(grandchild) = lent_child {
            child_node.children.insert(0, grandchild);
        }

        TreeStats::bump(&self.arena.stats().borrows);
        debug!(parent = %parent, from = %left, to = %child, "borrowed key from left sibling");
    }

    /// Rotate left: the right sibling's first key goes up to the parent, the
    /// parent's separator goes down to the end of `children[index]`.
    fn borrow_from_right(&mut self, parent: NodeId, index: usize) {
        let (child, right) = {
            let node = self.arena.get(parent);
            (node.children()[index], node.children()[index + 1])
        };

        let (lent_key, lent_child) = {
            let right_node = self.arena.get_mut(right);
            let key = right_node.keys.remove(0);
            let grandchild = if right_node.is_leaf() {
                None
            } else {
                Some(right_node.children.remove(0))
            };
            (key, grandchild)
        };

        let separator = std::mem::replace(&mut self.arena.get_mut(parent).keys[index], lent_key);

        let child_node = self.arena.get_mut(child);
        child_node.keys.push(separator);
        if let Some(grandchild) = lent_child {
            child_node.children.push(grandchild);
        }

        TreeStats::bump(&self.arena.stats().borrows);
        debug!(parent = %parent, from = %right, to = %child, "borrowed key from right sibling");
    }

    /// Fold `keys[index]` and `children[index + 1]` of `parent` into
    /// `children[index]`, releasing the right node.
    fn merge_children(&mut self, parent: NodeId, index: usize) {
        let (separator, right) = {
            let node = self.arena.get_mut(parent);
            (node.keys.remove(index), node.children.remove(index + 1))
        };
        let left = self.arena.get(parent).children()[index];

        let right_node = self.arena.release(right);
        let left_node = self.arena.get_mut(left);
        left_node.keys.push(separator);
        left_node.keys.extend(right_node.keys);
        left_node.children.extend(right_node.children);
        let merged_keys = left_node.key_count();

        TreeStats::bump(&self.arena.stats().merges);
        debug!(
            parent = %parent,
            into = %left,
            released = %right,
            keys = merged_keys,
            "merged siblings"
        );
    }

    /// Drop an empty root, promoting its only child (or emptying the tree).
    fn shrink_root(&mut self) {
        let Some(root) = self.root else {
            return;
        };
        let node = self.arena.get(root);
        if node.key_count() > 0 {
            return;
        }

        self.root = node.children().first().copied();
        self.arena.release(root);
        debug!(old_root = %root, new_root = ?self.root, "tree shrank");
    }
}
