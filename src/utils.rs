//! Structural statistics over a subtree of the `Arena`, used for build
//! diagnostics and by `PartitionTree`.

use crate::tree::{Arena, NodeId};

/// Counts the nodes reachable from `root`, including `root`.
pub fn count_nodes(arena: &Arena, root: NodeId) -> usize {
    let mut total = 0;
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        total += 1;
        stack.extend_from_slice(arena.node(id).children());
    }
    total
}

/// Number of levels below and including `root` (a single node has depth 1).
pub fn tree_depth(arena: &Arena, root: NodeId) -> usize {
    let mut depth = 0;
    let mut stack = vec![(root, 1usize)];
    while let Some((id, d)) = stack.pop() {
        depth = depth.max(d);
        for &child in arena.node(id).children() {
            stack.push((child, d + 1));
        }
    }
    depth
}

/// Counts reachable nodes per persistence level, ascending.
///
/// Levels are compared exactly: nodes created by the same merge event share
/// the same normalized value.
pub fn level_histogram(arena: &Arena, root: NodeId) -> Vec<(f64, usize)> {
    let mut levels: Vec<f64> = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let node = arena.node(id);
        levels.push(node.persistence());
        stack.extend_from_slice(node.children());
    }
    levels.sort_by(|a, b| a.total_cmp(b));

    let mut histogram: Vec<(f64, usize)> = Vec::new();
    for level in levels {
        match histogram.last_mut() {
            Some((last, count)) if *last == level => *count += 1,
            _ => histogram.push((level, 1)),
        }
    }
    histogram
}
