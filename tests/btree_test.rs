//! B-tree scenario tests.
//!
//! End-to-end behaviour through the public API only.

use std::sync::Arc;

use btree_index::{BTree, Error, TreeConfig, TreeStats, MIN_DEGREE_UPPER_BOUND};

const SCENARIO: [i32; 14] = [10, 20, 5, 6, 12, 30, 7, 17, 1, 3, 8, 25, 35, 40];
const SCENARIO_SORTED: [i32; 14] = [1, 3, 5, 6, 7, 8, 10, 12, 17, 20, 25, 30, 35, 40];

fn scenario_tree() -> BTree<i32> {
    let mut tree = BTree::new(2).unwrap();
    for key in SCENARIO {
        tree.insert(key).unwrap();
    }
    tree
}

/// Depth of every leaf, collected by walking the public node view.
fn leaf_depths(tree: &BTree<i32>) -> Vec<usize> {
    let mut depths = vec![];
    let mut stack = vec![];
    if let Some(root) = tree.root() {
        stack.push((root, 1));
    }
    while let Some((id, depth)) = stack.pop() {
        let node = tree.node(id).unwrap();
        if node.is_leaf() {
            depths.push(depth);
        }
        stack.extend(node.children().iter().map(|&c| (c, depth + 1)));
    }
    depths
}

// ============================================================================
// Original driver scenario (t = 2)
// ============================================================================

#[test]
fn test_scenario_traversal() {
    let tree = scenario_tree();
    assert_eq!(tree.keys(), SCENARIO_SORTED.to_vec());
    assert_eq!(tree.len(), 14);
}

#[test]
fn test_scenario_search() {
    let tree = scenario_tree();

    assert!(tree.contains(&7));
    assert!(!tree.contains(&15));
    assert!(tree.contains(&25));
    assert!(!tree.contains(&50));
}

#[test]
fn test_scenario_delete_10() {
    let mut tree = scenario_tree();

    assert!(tree.delete(&10));

    let expected: Vec<i32> = SCENARIO_SORTED.iter().copied().filter(|&k| k != 10).collect();
    assert_eq!(tree.keys(), expected);

    let depths = leaf_depths(&tree);
    assert!(depths.windows(2).all(|w| w[0] == w[1]), "{depths:?}");
    tree.check_invariants().unwrap();
}

#[test]
fn test_scenario_delete_10_and_25() {
    let mut tree = scenario_tree();

    assert!(tree.delete(&10));
    assert!(tree.delete(&25));
    assert!(!tree.delete(&25));

    assert_eq!(
        tree.keys(),
        vec![1, 3, 5, 6, 7, 8, 12, 17, 20, 30, 35, 40]
    );
    tree.check_invariants().unwrap();
}

#[test]
fn test_scenario_destroy_releases_everything() {
    let stats = Arc::new(TreeStats::new());
    let mut tree = BTree::with_stats(TreeConfig::new(2), Arc::clone(&stats)).unwrap();
    for key in SCENARIO {
        tree.insert(key).unwrap();
    }
    let live = tree.node_count();

    assert_eq!(tree.destroy(), live);

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.live_nodes(), 0);
    assert_eq!(snapshot.nodes_allocated, snapshot.nodes_released);
}

// ============================================================================
// Lifecycle and errors
// ============================================================================

#[test]
fn test_min_degree_must_be_at_least_two() {
    assert!(matches!(
        BTree::<i32>::new(0),
        Err(Error::InvalidMinDegree(0))
    ));
    assert!(matches!(
        BTree::<i32>::new(1),
        Err(Error::InvalidMinDegree(1))
    ));
    assert!(BTree::<i32>::new(2).is_ok());
}

#[test]
fn test_min_degree_too_large_is_rejected() {
    let too_big = MIN_DEGREE_UPPER_BOUND + 1;
    assert!(matches!(
        BTree::<i32>::new(too_big),
        Err(Error::InvalidMinDegree(t)) if t == too_big
    ));
}

#[test]
fn test_largest_min_degree_fails_insert_cleanly() {
    let mut tree = BTree::<i32>::new(MIN_DEGREE_UPPER_BOUND).unwrap();

    // Node storage for this degree cannot be reserved.
    let result = tree.insert(1);

    assert!(matches!(result, Err(Error::AllocationFailure { .. })));
    assert!(tree.is_empty());
    assert_eq!(tree.node_count(), 0);
    assert_eq!(tree.stats().snapshot().allocation_failures, 1);
}

#[test]
fn test_node_budget_failure_is_atomic() {
    let config = TreeConfig::new(2).with_max_nodes(4);
    let mut tree = BTree::with_config(config).unwrap();

    let mut inserted = vec![];
    let mut failed = None;
    for key in 0..100 {
        match tree.insert(key) {
            Ok(()) => inserted.push(key),
            Err(e) => {
                failed = Some((key, e));
                break;
            }
        }
    }

    let (key, err) = failed.expect("budget of 4 nodes must run out");
    assert!(matches!(err, Error::AllocationFailure { .. }));
    assert!(!tree.contains(&key));
    assert_eq!(tree.keys(), inserted);
    assert!(tree.node_count() <= 4);
    tree.check_invariants().unwrap();

    // Deletes still work and free room for more inserts.
    for k in &inserted[..inserted.len() / 2] {
        assert!(tree.delete(k));
    }
    tree.insert(key).unwrap();
    assert!(tree.contains(&key));
    assert_eq!(tree.stats().snapshot().allocation_failures, 1);
}

#[test]
fn test_large_degree() {
    let mut tree = BTree::new(16).unwrap();
    for key in (0..5_000).rev() {
        tree.insert(key).unwrap();
    }

    let shape = tree.check_invariants().unwrap();
    assert!(shape.height <= 4);
    assert_eq!(tree.keys(), (0..5_000).collect::<Vec<_>>());

    for key in (0..5_000).filter(|k| k % 3 == 0) {
        assert!(tree.delete(&key));
    }
    tree.check_invariants().unwrap();
    assert!(!tree.contains(&3));
    assert!(tree.contains(&4));
}

#[test]
fn test_string_like_scalars() {
    let mut tree = BTree::new(3).unwrap();
    for c in "the quick brown fox jumps over the lazy dog".chars() {
        tree.insert(c).unwrap();
    }

    let keys: String = tree.traverse().collect();
    let mut expected: Vec<char> = "the quick brown fox jumps over the lazy dog".chars().collect();
    expected.sort();
    assert_eq!(keys, expected.into_iter().collect::<String>());
}

#[test]
fn test_clear_then_reuse() {
    let mut tree = scenario_tree();
    tree.clear();

    assert!(tree.is_empty());
    assert_eq!(tree.keys(), Vec::<i32>::new());
    for key in SCENARIO {
        assert!(!tree.contains(&key));
    }

    tree.insert(99).unwrap();
    assert_eq!(tree.min(), Some(99));
    assert_eq!(tree.max(), Some(99));
}
