//! The tree handle and its lifecycle.
//!
//! Mutation and lookup live in sibling modules (`insert`, `delete`,
//! `search`, `iter`); this file owns construction, teardown and display.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::common::{NodeId, Result, TreeConfig};
use crate::index::btree::arena::NodeArena;
use crate::index::btree::node::Node;
use crate::index::btree::stats::TreeStats;
use crate::index::btree::Key;

/// An in-memory B-tree of ordered scalar keys.
///
/// Duplicate keys are accepted and stored; `delete` removes one copy.
///
/// # Example
/// ```
/// use btree_index::BTree;
///
/// let mut tree = BTree::new(2).unwrap();
/// for key in [10, 20, 5, 6, 12, 30, 7, 17] {
///     tree.insert(key).unwrap();
/// }
///
/// assert!(tree.contains(&12));
/// assert!(!tree.contains(&15));
/// assert!(tree.delete(&12));
/// assert_eq!(tree.keys(), vec![5, 6, 7, 10, 17, 20, 30]);
/// ```
pub struct BTree<K: Key> {
    /// Owns every node.
    pub(crate) arena: NodeArena<K>,

    /// Root node, `None` only when the tree is empty.
    pub(crate) root: Option<NodeId>,

    /// Minimum degree `t` (immutable after construction).
    pub(crate) min_degree: usize,

    /// Number of stored keys, duplicates included.
    pub(crate) len: usize,
}

impl<K: Key> BTree<K> {
    /// Create an empty tree with minimum degree `t`.
    ///
    /// # Errors
    /// - `Error::InvalidMinDegree` if `t < 2`
    pub fn new(min_degree: usize) -> Result<Self> {
        Self::with_config(TreeConfig::new(min_degree))
    }

    /// Create an empty tree from a full configuration.
    ///
    /// # Errors
    /// Any error from [`TreeConfig::validate`].
    pub fn with_config(config: TreeConfig) -> Result<Self> {
        Self::with_stats(config, Arc::new(TreeStats::new()))
    }

    /// Create an empty tree that reports into caller-owned statistics.
    ///
    /// The caller keeps its `Arc` and can observe counters after the tree is
    /// destroyed.
    ///
    /// # Errors
    /// Any error from [`TreeConfig::validate`].
    pub fn with_stats(config: TreeConfig, stats: Arc<TreeStats>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            arena: NodeArena::new(config.min_degree, config.max_nodes, stats),
            root: None,
            min_degree: config.min_degree,
            len: 0,
        })
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Number of stored keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The minimum degree `t`.
    #[inline]
    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.arena.live()
    }

    /// Number of levels; 0 for an empty tree, 1 for a lone leaf root.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Some(id) = current {
            height += 1;
            current = self.arena.get(id).children().first().copied();
        }
        height
    }

    /// Root node id, if any.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Borrow a node by id.
    ///
    /// Returns `None` for ids that do not name a live node.
    pub fn node(&self, id: NodeId) -> Option<&Node<K>> {
        self.arena.is_live(id).then(|| self.arena.get(id))
    }

    /// Statistics shared with this tree.
    pub fn stats(&self) -> &Arc<TreeStats> {
        self.arena.stats()
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Remove every key, releasing all nodes. The tree stays usable.
    pub fn clear(&mut self) {
        self.release_all();
    }

    /// Tear the tree down, releasing every node children-first.
    ///
    /// Returns the number of nodes released.
    pub fn destroy(mut self) -> usize {
        self.release_all()
    }

    fn release_all(&mut self) -> usize {
        let released = match self.root.take() {
            Some(root) => self.release_subtree(root),
            None => 0,
        };
        self.len = 0;
        if released > 0 {
            debug!(released, "tree destroyed");
        }
        released
    }

    /// Post-order release of the subtree rooted at `id`.
    fn release_subtree(&mut self, id: NodeId) -> usize {
        let children = std::mem::take(&mut self.arena.get_mut(id).children);
        let mut released = 0;
        for child in children {
            released += self.release_subtree(child);
        }
        self.arena.release(id);
        released + 1
    }
}

impl<K: Key> Drop for BTree<K> {
    fn drop(&mut self) {
        self.release_all();
    }
}

impl<K: Key> fmt::Debug for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BTree")
            .field("min_degree", &self.min_degree)
            .field("len", &self.len)
            .field("height", &self.height())
            .field("nodes", &self.node_count())
            .finish()
    }
}

/// Level-by-level dump, one line per depth:
///
/// ```text
/// L0: [10]
/// L1: [5 6] [20]
/// ```
impl<K: Key> fmt::Display for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.root else {
            return write!(f, "(empty)");
        };

        let mut queue = VecDeque::from([(root, 0usize)]);
        let mut current_depth = None;

        while let Some((id, depth)) = queue.pop_front() {
            if current_depth != Some(depth) {
                if current_depth.is_some() {
                    writeln!(f)?;
                }
                write!(f, "L{depth}:")?;
                current_depth = Some(depth);
            }

            let node = self.arena.get(id);
            write!(f, " [")?;
            for (i, key) in node.keys().iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{key:?}")?;
            }
            write!(f, "]")?;

            queue.extend(node.children().iter().map(|&c| (c, depth + 1)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;

    #[test]
    fn test_new_tree_is_empty() {
        let tree: BTree<i32> = BTree::new(2).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.node_count(), 0);
        assert_eq!(tree.min_degree(), 2);
        assert_eq!(format!("{}", tree), "(empty)");
    }

    #[test]
    fn test_invalid_min_degree() {
        let result: Result<BTree<i32>> = BTree::new(1);
        assert_eq!(result.unwrap_err(), Error::InvalidMinDegree(1));
    }

    #[test]
    fn test_destroy_releases_all_nodes() {
        let stats = Arc::new(TreeStats::new());
        let mut tree = BTree::with_stats(TreeConfig::new(2), Arc::clone(&stats)).unwrap();
        for key in 0..50 {
            tree.insert(key).unwrap();
        }
        let nodes = tree.node_count();
        assert!(nodes > 1);
        assert_eq!(stats.live_nodes(), nodes as u64);

        let released = tree.destroy();

        assert_eq!(released, nodes);
        assert_eq!(stats.live_nodes(), 0);
    }

    #[test]
    fn test_drop_releases_all_nodes() {
        let stats = Arc::new(TreeStats::new());
        {
            let mut tree = BTree::with_stats(TreeConfig::new(3), Arc::clone(&stats)).unwrap();
            for key in 0..100u64 {
                tree.insert(key).unwrap();
            }
            assert!(stats.live_nodes() > 0);
        }
        assert_eq!(stats.live_nodes(), 0);
    }

    #[test]
    fn test_clear_keeps_tree_usable() {
        let mut tree = BTree::new(2).unwrap();
        for key in 0..20 {
            tree.insert(key).unwrap();
        }

        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 0);

        tree.insert(7).unwrap();
        assert_eq!(tree.keys(), vec![7]);
    }

    #[test]
    fn test_display_levels() {
        let mut tree = BTree::new(2).unwrap();
        for key in [1, 2, 3, 4] {
            tree.insert(key).unwrap();
        }

        // root [1 2 3] splits on the fourth insert
        assert_eq!(format!("{}", tree), "L0: [2]\nL1: [1] [3 4]");
    }

    #[test]
    fn test_node_lookup() {
        let mut tree = BTree::new(2).unwrap();
        tree.insert(5).unwrap();

        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).unwrap().keys(), &[5]);
        assert!(tree.node(NodeId::new(99)).is_none());
    }
}
