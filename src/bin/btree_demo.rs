//! Demo driver: builds a small tree, searches it, deletes from it, and
//! tears it down, printing each step.
//!
//! Configuration comes from `BTREE_MIN_DEGREE` / `BTREE_MAX_NODES`;
//! log verbosity from `RUST_LOG` (default `btree_index=debug`).

use std::sync::Arc;

use btree_index::{BTree, TreeConfig, TreeStats};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const INSERT_KEYS: [i64; 14] = [10, 20, 5, 6, 12, 30, 7, 17, 1, 3, 8, 25, 35, 40];
const SEARCH_KEYS: [i64; 4] = [7, 15, 25, 50];
const DELETE_KEYS: [i64; 2] = [10, 25];

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "btree_index=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match TreeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        "Loaded configuration: min_degree={}, max_nodes={:?}",
        config.min_degree,
        config.max_nodes
    );

    let stats = Arc::new(TreeStats::new());
    let mut tree = match BTree::with_stats(config, Arc::clone(&stats)) {
        Ok(tree) => tree,
        Err(e) => {
            tracing::error!("Failed to create tree: {e}");
            std::process::exit(1);
        }
    };

    println!("1. Inserting keys: {INSERT_KEYS:?}");
    for key in INSERT_KEYS {
        if let Err(e) = tree.insert(key) {
            tracing::error!("Failed to insert key {key}: {e}");
            std::process::exit(1);
        }
    }

    println!("\n2. Tree traversal (in-order):");
    print_tree(&tree);

    println!("\n3. Searching:");
    for key in SEARCH_KEYS {
        let status = if tree.contains(&key) {
            "FOUND"
        } else {
            "NOT FOUND"
        };
        println!("Key {key}: {status}");
    }

    println!("\n4. Deleting:");
    for key in DELETE_KEYS {
        let status = if tree.delete(&key) {
            "deleted"
        } else {
            "not present"
        };
        println!("Key {key}: {status}");
    }

    println!("\n5. Final tree traversal:");
    print_tree(&tree);

    match tree.check_invariants() {
        Ok(shape) => println!(
            "\nHeight {}, {} nodes, {} keys",
            shape.height, shape.nodes, shape.keys
        ),
        Err(e) => {
            tracing::error!("Tree is inconsistent: {e}");
            std::process::exit(1);
        }
    }

    println!("\n6. Cleaning up...");
    let released = tree.destroy();
    println!("Released {released} nodes; {}", stats.snapshot());
}

fn print_tree(tree: &BTree<i64>) {
    if tree.is_empty() {
        println!("Tree is empty");
        return;
    }
    let keys: Vec<String> = tree.traverse().map(|k| k.to_string()).collect();
    println!("{}", keys.join(" "));
    println!("{tree}");
}
