//! Node arena - owns every node of a tree, addressed by [`NodeId`].
//!
//! Parent-to-child ownership is expressed as ids held in `Node::children`;
//! the arena is the only place nodes physically live. Freed slots go on a
//! free list and are reused LIFO, the same way buffer pool frames are.

use std::sync::Arc;

use tracing::warn;

use crate::common::{Error, NodeId, Result};
use crate::index::btree::node::Node;
use crate::index::btree::stats::TreeStats;
use crate::index::btree::Key;

/// Slot storage for the nodes of one tree.
///
/// # Architecture
/// ```text
/// ┌───────────────────────────────────────────────────────┐
/// │                      NodeArena                        │
/// │  ┌──────────────┐  ┌──────────────────────────────┐   │
/// │  │  free_list   │  │  slots: Vec<Option<Node>>    │   │
/// │  │ Vec<NodeId>  │─▶│  [Some] [None] [Some] ...    │   │
/// │  └──────────────┘  └──────────────────────────────┘   │
/// │  live / max_nodes budget        stats: Arc<TreeStats> │
/// └───────────────────────────────────────────────────────┘
/// ```
#[derive(Debug)]
pub(crate) struct NodeArena<K: Key> {
    /// Node storage; `None` marks a free slot.
    slots: Vec<Option<Node<K>>>,

    /// Stack of free slot ids.
    free_list: Vec<NodeId>,

    /// Number of occupied slots.
    live: usize,

    /// Optional cap on `live`.
    max_nodes: Option<usize>,

    /// Minimum degree, used to size new nodes.
    min_degree: usize,

    stats: Arc<TreeStats>,
}

impl<K: Key> NodeArena<K> {
    pub(crate) fn new(min_degree: usize, max_nodes: Option<usize>, stats: Arc<TreeStats>) -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
            max_nodes,
            min_degree,
            stats,
        }
    }

    pub(crate) fn stats(&self) -> &Arc<TreeStats> {
        &self.stats
    }

    /// Number of live nodes.
    pub(crate) fn live(&self) -> usize {
        self.live
    }

    /// Whether `id` currently names a live node.
    pub(crate) fn is_live(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id.index()), Some(Some(_)))
    }

    /// Ids of every live node, in slot order.
    pub(crate) fn live_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| NodeId::new(i))
    }

    // ========================================================================
    // Allocation
    // ========================================================================

    /// Allocate one empty node.
    ///
    /// # Errors
    /// - `Error::AllocationFailure` if the node budget is exhausted or the
    ///   allocator refuses; the arena is unchanged in that case.
    pub(crate) fn allocate(&mut self, is_leaf: bool) -> Result<NodeId> {
        if let Some(max) = self.max_nodes {
            if self.live >= max {
                return Err(self.refuse(1));
            }
        }

        let node = match Node::new(is_leaf, self.min_degree) {
            Ok(node) => node,
            Err(e) => {
                TreeStats::bump(&self.stats.allocation_failures);
                warn!(is_leaf, "node storage allocation refused");
                return Err(e);
            }
        };

        let id = match self.free_list.pop() {
            Some(id) => {
                self.slots[id.index()] = Some(node);
                id
            }
            None => {
                if self.slots.try_reserve(1).is_err() {
                    return Err(self.refuse(1));
                }
                self.slots.push(Some(node));
                NodeId::new(self.slots.len() - 1)
            }
        };

        self.live += 1;
        TreeStats::bump(&self.stats.nodes_allocated);
        Ok(id)
    }

    /// Allocate every node an operation will need before it mutates anything.
    ///
    /// Either all `leaves + internals` nodes are obtained, or none are kept.
    pub(crate) fn reserve(&mut self, leaves: usize, internals: usize) -> Result<Reservation> {
        let mut reservation = Reservation::default();

        for (count, is_leaf) in [(leaves, true), (internals, false)] {
            for _ in 0..count {
                match self.allocate(is_leaf) {
                    Ok(id) => reservation.push(id, is_leaf),
                    Err(_) => {
                        self.cancel(reservation);
                        return Err(Error::AllocationFailure {
                            requested: leaves + internals,
                        });
                    }
                }
            }
        }

        Ok(reservation)
    }

    /// Return unused reserved nodes to the free list.
    pub(crate) fn cancel(&mut self, reservation: Reservation) {
        for id in reservation.leaves.into_iter().chain(reservation.internals) {
            self.release(id);
        }
    }

    /// Free a node's slot, handing the node back to the caller.
    ///
    /// # Panics
    /// Panics if `id` is not live (double free).
    pub(crate) fn release(&mut self, id: NodeId) -> Node<K> {
        let node = match self.slots.get_mut(id.index()).and_then(Option::take) {
            Some(node) => node,
            None => panic!("release of dead {id}"),
        };
        self.free_list.push(id);
        self.live -= 1;
        TreeStats::bump(&self.stats.nodes_released);
        node
    }

    fn refuse(&self, requested: usize) -> Error {
        TreeStats::bump(&self.stats.allocation_failures);
        warn!(
            live = self.live,
            max_nodes = ?self.max_nodes,
            requested,
            "node allocation refused"
        );
        Error::AllocationFailure { requested }
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Borrow a live node.
    ///
    /// # Panics
    /// Panics on a dangling id, which means the tree structure is corrupt.
    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node<K> {
        match self.slots.get(id.index()) {
            Some(Some(node)) => node,
            _ => panic!("dangling {id}"),
        }
    }

    /// Mutably borrow a live node.
    ///
    /// # Panics
    /// Panics on a dangling id.
    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<K> {
        match self.slots.get_mut(id.index()) {
            Some(Some(node)) => node,
            _ => panic!("dangling {id}"),
        }
    }

    /// Mutably borrow two distinct live nodes at once.
    ///
    /// # Panics
    /// Panics if `a == b` or either id is dangling.
    pub(crate) fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut Node<K>, &mut Node<K>) {
        assert_ne!(a, b, "pair_mut on the same node");
        let (lo, hi) = if a.index() < b.index() { (a, b) } else { (b, a) };

        let (head, tail) = self.slots.split_at_mut(hi.index());
        let (lo_node, hi_node) = match (head.get_mut(lo.index()), tail.first_mut()) {
            (Some(Some(l)), Some(Some(h))) => (l, h),
            _ => panic!("dangling {lo} or {hi}"),
        };

        if a.index() < b.index() {
            (lo_node, hi_node)
        } else {
            (hi_node, lo_node)
        }
    }
}

/// Blank nodes allocated ahead of a mutation, split by leaf-ness.
#[derive(Debug, Default)]
pub(crate) struct Reservation {
    leaves: Vec<NodeId>,
    internals: Vec<NodeId>,
}

impl Reservation {
    fn push(&mut self, id: NodeId, is_leaf: bool) {
        if is_leaf {
            self.leaves.push(id);
        } else {
            self.internals.push(id);
        }
    }

    /// Take a reserved node of the given kind.
    ///
    /// # Errors
    /// - `Error::InvariantViolation` if the plan under-counted.
    pub(crate) fn take(&mut self, is_leaf: bool) -> Result<NodeId> {
        let pool = if is_leaf {
            &mut self.leaves
        } else {
            &mut self.internals
        };
        pool.pop().ok_or_else(|| {
            Error::InvariantViolation(format!(
                "insert plan reserved too few {} nodes",
                if is_leaf { "leaf" } else { "internal" }
            ))
        })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.leaves.is_empty() && self.internals.is_empty()
    }
}
