//! Structural audit of a tree.

use crate::common::config::{max_keys, min_keys};
use crate::common::{Error, NodeId, Result};
use crate::index::btree::tree::BTree;
use crate::index::btree::Key;

/// Summary returned by a successful [`BTree::check_invariants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeShape {
    /// Levels from root to leaves; 0 for an empty tree.
    pub height: usize,
    /// Nodes reachable from the root.
    pub nodes: usize,
    /// Keys stored, duplicates included.
    pub keys: usize,
    pub leaves: usize,
}

impl<K: Key> BTree<K> {
    /// Walk the whole tree and verify every structural invariant.
    ///
    /// Checked:
    /// - keys ascend within each node and respect the parent separators
    /// - every non-root node holds `t-1..=2t-1` keys, the root at most `2t-1`
    /// - internal nodes have exactly one more child than keys
    /// - all leaves sit at the same depth
    /// - every live node in the arena is reachable exactly once
    /// - the cached length matches the key count
    ///
    /// # Errors
    /// - `Error::InvariantViolation` describing the first problem found
    pub fn check_invariants(&self) -> Result<TreeShape> {
        let Some(root) = self.root else {
            if self.len != 0 || self.arena.live() != 0 {
                return Err(violation(format!(
                    "empty tree reports len {} with {} live nodes",
                    self.len,
                    self.arena.live()
                )));
            }
            return Ok(TreeShape::default());
        };

        let mut audit = Audit {
            seen: Vec::new(),
            leaf_depth: None,
            shape: TreeShape::default(),
        };
        self.check_node(root, 1, None, None, &mut audit)?;

        let mut shape = audit.shape;
        shape.height = audit.leaf_depth.unwrap_or(0);

        if shape.keys != self.len {
            return Err(violation(format!(
                "len is {} but {} keys are reachable",
                self.len, shape.keys
            )));
        }
        if shape.nodes != self.arena.live() {
            let leaked: Vec<NodeId> = self
                .arena
                .live_ids()
                .filter(|id| audit.seen.get(id.index()) != Some(&true))
                .collect();
            return Err(violation(format!(
                "{} live nodes but {} reachable; unreachable: {:?}",
                self.arena.live(),
                shape.nodes,
                leaked
            )));
        }

        Ok(shape)
    }

    fn check_node(
        &self,
        id: NodeId,
        depth: usize,
        lower: Option<K>,
        upper: Option<K>,
        audit: &mut Audit,
    ) -> Result<()> {
        if !self.arena.is_live(id) {
            return Err(violation(format!("{id} is referenced but not live")));
        }
        if audit.seen.len() <= id.index() {
            audit.seen.resize(id.index() + 1, false);
        }
        if std::mem::replace(&mut audit.seen[id.index()], true) {
            return Err(violation(format!("{id} is reachable more than once")));
        }

        let t = self.min_degree;
        let is_root = Some(id) == self.root;
        let node = self.arena.get(id);
        let keys = node.keys();

        if keys.len() > max_keys(t) {
            return Err(violation(format!("{id} holds {} keys (> 2t-1)", keys.len())));
        }
        if !is_root && keys.len() < min_keys(t) {
            return Err(violation(format!("{id} holds {} keys (< t-1)", keys.len())));
        }
        if keys.is_empty() {
            return Err(violation(format!("{id} has no keys")));
        }
        if keys.windows(2).any(|w| w[0] > w[1]) {
            return Err(violation(format!("{id} keys out of order: {keys:?}")));
        }
        if let (Some(lo), Some(first)) = (lower, keys.first()) {
            if *first < lo {
                return Err(violation(format!("{id} key {first:?} below separator {lo:?}")));
            }
        }
        if let (Some(hi), Some(last)) = (upper, keys.last()) {
            if *last > hi {
                return Err(violation(format!("{id} key {last:?} above separator {hi:?}")));
            }
        }

        audit.shape.nodes += 1;
        audit.shape.keys += keys.len();

        if node.is_leaf() {
            if !node.children().is_empty() {
                return Err(violation(format!("leaf {id} has children")));
            }
            audit.shape.leaves += 1;
            return match audit.leaf_depth {
                None => {
                    audit.leaf_depth = Some(depth);
                    Ok(())
                }
                Some(expected) if expected == depth => Ok(()),
                Some(expected) => Err(violation(format!(
                    "leaf {id} at depth {depth}, expected {expected}"
                ))),
            };
        }

        if node.children().len() != keys.len() + 1 {
            return Err(violation(format!(
                "{id} has {} keys but {} children",
                keys.len(),
                node.children().len()
            )));
        }

        for (i, &child) in node.children().iter().enumerate() {
            let child_lower = if i == 0 { lower } else { Some(keys[i - 1]) };
            let child_upper = keys.get(i).copied().or(upper);
            self.check_node(child, depth + 1, child_lower, child_upper, audit)?;
        }
        Ok(())
    }
}

struct Audit {
    /// Indexed by slot; marks nodes already visited.
    seen: Vec<bool>,
    leaf_depth: Option<usize>,
    shape: TreeShape,
}

fn violation(message: String) -> Error {
    Error::InvariantViolation(message)
}
