//! Tree statistics tracking.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Structural statistics tracked by a tree.
///
/// All fields are atomic so a `TreeStats` can sit behind an `Arc` and be
/// read by the caller after the tree itself has been destroyed. The tree is
/// single-threaded; atomics are only used for shared ownership.
///
/// # Memory Ordering
/// `Ordering::Relaxed` everywhere: counters are independent of each other.
///
/// # Example
/// ```
/// use btree_index::{BTree, TreeConfig, TreeStats};
/// use std::sync::Arc;
///
/// let stats = Arc::new(TreeStats::new());
/// let mut tree = BTree::with_stats(TreeConfig::new(2), Arc::clone(&stats)).unwrap();
/// tree.insert(1u32).unwrap();
/// assert_eq!(stats.live_nodes(), 1);
///
/// tree.destroy();
/// assert_eq!(stats.live_nodes(), 0);
/// ```
#[derive(Debug)]
pub struct TreeStats {
    /// Nodes handed out by the arena.
    pub nodes_allocated: AtomicU64,

    /// Nodes returned to the arena.
    pub nodes_released: AtomicU64,

    /// Allocation requests refused (budget or allocator failure).
    pub allocation_failures: AtomicU64,

    /// Full nodes split in two during insertion.
    pub splits: AtomicU64,

    /// Sibling pairs merged during deletion.
    pub merges: AtomicU64,

    /// Keys rotated in from a sibling during deletion.
    pub borrows: AtomicU64,
}

impl TreeStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            nodes_allocated: AtomicU64::new(0),
            nodes_released: AtomicU64::new(0),
            allocation_failures: AtomicU64::new(0),
            splits: AtomicU64::new(0),
            merges: AtomicU64::new(0),
            borrows: AtomicU64::new(0),
        }
    }

    /// Nodes allocated and not yet released.
    pub fn live_nodes(&self) -> u64 {
        let allocated = self.nodes_allocated.load(Ordering::Relaxed);
        let released = self.nodes_released.load(Ordering::Relaxed);
        allocated.saturating_sub(released)
    }

    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            nodes_allocated: self.nodes_allocated.load(Ordering::Relaxed),
            nodes_released: self.nodes_released.load(Ordering::Relaxed),
            allocation_failures: self.allocation_failures.load(Ordering::Relaxed),
            splits: self.splits.load(Ordering::Relaxed),
            merges: self.merges.load(Ordering::Relaxed),
            borrows: self.borrows.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.nodes_allocated.store(0, Ordering::Relaxed);
        self.nodes_released.store(0, Ordering::Relaxed);
        self.allocation_failures.store(0, Ordering::Relaxed);
        self.splits.store(0, Ordering::Relaxed);
        self.merges.store(0, Ordering::Relaxed);
        self.borrows.store(0, Ordering::Relaxed);
    }
}

impl Default for TreeStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time copy of [`TreeStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub nodes_allocated: u64,
    pub nodes_released: u64,
    pub allocation_failures: u64,
    pub splits: u64,
    pub merges: u64,
    pub borrows: u64,
}

impl StatsSnapshot {
    /// Nodes allocated and not yet released at snapshot time.
    pub fn live_nodes(&self) -> u64 {
        self.nodes_allocated.saturating_sub(self.nodes_released)
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ live: {}, allocated: {}, released: {}, splits: {}, merges: {}, borrows: {} }}",
            self.live_nodes(),
            self.nodes_allocated,
            self.nodes_released,
            self.splits,
            self.merges,
            self.borrows
        )
    }
}
