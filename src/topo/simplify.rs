//! Removes degenerate tree levels left behind by the merge replay.
//!
//! A child created at the same persistence as its parent describes the same
//! topological feature twice. Internal children of that kind are spliced out
//! (their children move up), childless ones are folded into the parent.

use crate::tree::{Arena, NodeId};

/// Simplifies the subtree rooted at `node`, post-order.
///
/// Children are simplified before the rule is applied to them, so a spliced
/// child never hands up a grandchild with its own persistence. A second pass
/// over the result is a no-op.
///
/// # Arguments
/// * `arena` - The arena holding the tree; detached nodes stay in it.
/// * `values` - The point value table, used when a fold widens the range.
/// * `node` - Root of the subtree to simplify.
pub(crate) fn simplify(arena: &mut Arena, values: &[f64], node: NodeId) {
    let persistence = arena.node(node).persistence();
    let children = arena.node(node).children().to_vec();
    let mut kept = Vec::with_capacity(children.len());

    for child in children {
        simplify(arena, values, child);

        if arena.node(child).persistence() != persistence {
            kept.push(child);
        } else if !arena.node(child).is_leaf() {
            let grandchildren = arena.node(child).children().to_vec();
            for grandchild in grandchildren {
                arena.node_mut(grandchild).parent = Some(node);
                kept.push(grandchild);
            }
        } else {
            arena.fold_leaf(node, child, values);
        }
    }

    arena.node_mut(node).children = kept;
}
