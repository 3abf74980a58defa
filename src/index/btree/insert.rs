//! Insertion with proactive top-down splitting.

use tracing::{debug, trace};

use crate::common::{Error, NodeId, Result};
use crate::index::btree::arena::Reservation;
use crate::index::btree::stats::TreeStats;
use crate::index::btree::tree::BTree;
use crate::index::btree::Key;

impl<K: Key> BTree<K> {
    /// Insert `key`, splitting full nodes on the way down.
    ///
    /// Duplicates are stored after existing equal keys.
    ///
    /// # Errors
    /// - `Error::AllocationFailure` if the nodes this insert needs cannot be
    ///   obtained. Nothing has been modified when this is returned.
    pub fn insert(&mut self, key: K) -> Result<()> {
        trace!(?key, "insert");

        let (leaves, internals) = self.plan_insert(&key);
        let mut reservation = self.arena.reserve(leaves, internals)?;

        let result = self.insert_reserved(key, &mut reservation);
        debug_assert!(reservation.is_empty(), "insert plan over-reserved");
        self.arena.cancel(reservation);

        if result.is_ok() {
            self.len += 1;
        }
        result
    }

    /// Count the nodes an insert of `key` will allocate, without mutating.
    ///
    /// Splitting a full node keeps the key on the same child path, so the
    /// number of splits equals the number of full nodes on the read-only
    /// descent. Returns `(leaf nodes, internal nodes)`.
    fn plan_insert(&self, key: &K) -> (usize, usize) {
        let Some(root) = self.root else {
            return (1, 0);
        };

        let t = self.min_degree;
        let mut leaves = 0;
        let mut internals = 0;

        if self.arena.get(root).is_full(t) {
            // new root above the old one
            internals += 1;
        }

        let mut current = root;
        loop {
            let node = self.arena.get(current);
            if node.is_full(t) {
                if node.is_leaf() {
                    leaves += 1;
                } else {
                    internals += 1;
                }
            }
            if node.is_leaf() {
                break;
            }
            current = node.children()[node.upper_bound(key)];
        }

        (leaves, internals)
    }

    fn insert_reserved(&mut self, key: K, reservation: &mut Reservation) -> Result<()> {
        let root = match self.root {
            Some(root) => root,
            None => {
                let root = reservation.take(true)?;
                self.arena.get_mut(root).keys.push(key);
                self.root = Some(root);
                debug!(root = %root, "created leaf root");
                return Ok(());
            }
        };

        let root = if self.arena.get(root).is_full(self.min_degree) {
            let new_root = reservation.take(false)?;
            self.arena.get_mut(new_root).children.push(root);
            self.split_child(new_root, 0, reservation)?;
            self.root = Some(new_root);
            debug!(old_root = %root, new_root = %new_root, height = self.height(), "tree grew");
            new_root
        } else {
            root
        };

        self.insert_non_full(root, key, reservation)
    }

    /// Descend from a non-full node to the leaf that takes `key`.
    fn insert_non_full(
        &mut self,
        mut current: NodeId,
        key: K,
        reservation: &mut Reservation,
    ) -> Result<()> {
        loop {
            let node = self.arena.get(current);
            if node.is_leaf() {
                self.arena.get_mut(current).insert_sorted(key);
                return Ok(());
            }

            let mut index = node.upper_bound(&key);
            let child = node.children()[index];

            if self.arena.get(child).is_full(self.min_degree) {
                self.split_child(current, index, reservation)?;
                if key >= self.arena.get(current).keys()[index] {
                    index += 1;
                }
            }

            current = self.arena.get(current).children()[index];
        }
    }

    /// Split the full child at `parent.children[index]`.
    ///
    /// The child keeps its lower `t-1` keys, a new sibling takes the upper
    /// `t-1` keys (and upper `t` children), and the median moves up into
    /// `parent.keys[index]`. `parent` must not be full.
    pub(crate) fn split_child(
        &mut self,
        parent: NodeId,
        index: usize,
        reservation: &mut Reservation,
    ) -> Result<()> {
        let t = self.min_degree;
        let child = self.arena.get(parent).children()[index];
        let child_is_leaf = self.arena.get(child).is_leaf();
        let sibling = reservation.take(child_is_leaf)?;

        let median = {
            let (child_node, sibling_node) = self.arena.pair_mut(child, sibling);
            debug_assert!(child_node.is_full(t));

            sibling_node.keys.extend(child_node.keys.drain(t..));
            if !child_is_leaf {
                sibling_node.children.extend(child_node.children.drain(t..));
            }
            child_node.keys.pop()
        }
        .ok_or_else(|| Error::InvariantViolation(format!("split of empty {child}")))?;

        let parent_node = self.arena.get_mut(parent);
        parent_node.keys.insert(index, median);
        parent_node.children.insert(index + 1, sibling);

        TreeStats::bump(&self.arena.stats().splits);
        debug!(
            parent = %parent,
            child = %child,
            sibling = %sibling,
            ?median,
            "split full child"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::common::{Error, TreeConfig};
    use crate::index::btree::BTree;

    #[test]
    fn test_insert_into_empty() {
        let mut tree = BTree::new(2).unwrap();
        tree.insert(42).unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.keys(), vec![42]);
    }

    #[test]
    fn test_root_split_grows_height() {
        let mut tree = BTree::new(2).unwrap();
        for key in [10, 20, 30] {
            tree.insert(key).unwrap();
        }
        assert_eq!(tree.height(), 1);

        tree.insert(40).unwrap();

        assert_eq!(tree.height(), 2);
        let root = tree.node(tree.root().unwrap()).unwrap();
        assert_eq!(root.keys(), &[20]);
        assert_eq!(root.children().len(), 2);
        assert_eq!(tree.stats().snapshot().splits, 1);
    }

    #[test]
    fn test_split_child_layout_t3() {
        let mut tree = BTree::new(3).unwrap();
        for key in 1..=6 {
            tree.insert(key).unwrap();
        }

        // [1 2 3 4 5] split around 3 before 6 went in
        let root = tree.node(tree.root().unwrap()).unwrap();
        assert_eq!(root.keys(), &[3]);
        let left = tree.node(root.children()[0]).unwrap();
        let right = tree.node(root.children()[1]).unwrap();
        assert_eq!(left.keys(), &[1, 2]);
        assert_eq!(right.keys(), &[4, 5, 6]);
    }

    #[test]
    fn test_insert_ascending_and_descending() {
        for t in 2..=5 {
            let mut asc = BTree::new(t).unwrap();
            let mut desc = BTree::new(t).unwrap();
            for key in 0..200 {
                asc.insert(key).unwrap();
                desc.insert(199 - key).unwrap();
            }

            let expected: Vec<i32> = (0..200).collect();
            assert_eq!(asc.keys(), expected);
            assert_eq!(desc.keys(), expected);
            asc.check_invariants().unwrap();
            desc.check_invariants().unwrap();
        }
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut tree = BTree::new(2).unwrap();
        for key in [5, 5, 5, 1, 5, 9, 5] {
            tree.insert(key).unwrap();
        }

        assert_eq!(tree.len(), 7);
        assert_eq!(tree.keys(), vec![1, 5, 5, 5, 5, 5, 9]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_allocation_failure_leaves_tree_unchanged() {
        // A full leaf root needs two fresh nodes to split.
        let mut tree = BTree::with_config(TreeConfig::new(2).with_max_nodes(2)).unwrap();
        for key in [1, 2, 3] {
            tree.insert(key).unwrap();
        }
        let before = format!("{}", tree);

        let result = tree.insert(4);

        assert_eq!(result, Err(Error::AllocationFailure { requested: 2 }));
        assert_eq!(format!("{}", tree), before);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.node_count(), 1);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_without_split_needs_no_budget() {
        let mut tree = BTree::with_config(TreeConfig::new(2).with_max_nodes(1)).unwrap();
        tree.insert(1).unwrap();
        tree.insert(2).unwrap();
        tree.insert(3).unwrap();
        assert_eq!(tree.keys(), vec![1, 2, 3]);

        assert!(tree.insert(4).is_err());
        assert_eq!(tree.keys(), vec![1, 2, 3]);
    }
}
