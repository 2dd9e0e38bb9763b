//! Linearizes the tree's points into one buffer and renumbers the nodes.
//!
//! After indexing, every node's points are the contiguous slice `span` of the
//! buffer: a depth-first walk emits each node's own points and then its
//! children's, so a parent's span is the union of its children's.

use crate::error::BuildError;
use crate::tree::{Arena, NodeId, PointIdx, Span};

/// Sentinel for points not yet placed in the buffer.
const UNPLACED: usize = usize::MAX;

/// Depth-first span assignment over an arena.
pub(crate) struct Indexer<'a> {
    arena: &'a mut Arena,
    /// The reordered point buffer being built.
    pts: Vec<PointIdx>,
    /// `position[p]` is the buffer offset of point `p`, or `UNPLACED`.
    position: Vec<usize>,
    /// Internal nodes with exactly one child.
    single: usize,
}

impl<'a> Indexer<'a> {
    pub(crate) fn new(arena: &'a mut Arena, n_points: usize) -> Self {
        Indexer {
            arena,
            pts: Vec::with_capacity(n_points),
            position: vec![UNPLACED; n_points],
            single: 0,
        }
    }

    /// Assigns spans to the subtree rooted at `node`, starting at `cursor`.
    /// Returns the cursor past the subtree's last point.
    ///
    /// Once a node's span is known, extrema physically placed inside it are
    /// dropped from its `extrema`: they are reported by the descendant that
    /// owns them.
    pub(crate) fn index(&mut self, node: NodeId, mut cursor: usize) -> usize {
        let first = cursor;

        for &pt in self.arena.node(node).base_pts() {
            self.position[pt] = self.pts.len();
            self.pts.push(pt);
            cursor += 1;
        }

        let children = self.arena.node(node).children().to_vec();
        if children.len() == 1 {
            self.single += 1;
        }
        for child in children {
            cursor = self.index(child, cursor);
        }

        let span = Span::new(first, cursor);
        let position = &self.position;
        let n = self.arena.node_mut(node);
        n.span = span;
        n.extrema.retain(|&e| !span.contains(position[e]));
        cursor
    }

    pub(crate) fn single(&self) -> usize {
        self.single
    }

    /// Consumes the indexer, checking that the buffer accounts for exactly
    /// `expected` points.
    ///
    /// # Errors
    /// `PointCountMismatch` if points were dropped or duplicated.
    pub(crate) fn finish(self, expected: usize) -> Result<Vec<PointIdx>, BuildError> {
        if self.pts.len() != expected {
            return Err(BuildError::PointCountMismatch { found: self.pts.len(), expected });
        }
        Ok(self.pts)
    }
}

/// Assigns compact ids in depth-first pre-order starting at `next`.
///
/// The walk does not descend below a node of persistence exactly 0: base
/// level nodes keep their place but their children are not renumbered.
///
/// # Returns
/// The next unused id.
pub(crate) fn renumber(arena: &mut Arena, node: NodeId, mut next: usize) -> usize {
    arena.node_mut(node).id = next;
    next += 1;
    if arena.node(node).persistence() > 0.0 {
        let children = arena.node(node).children().to_vec();
        for child in children {
            next = renumber(arena, child, next);
        }
    }
    next
}
