//! Defines the core data structures of the partition tree: the node record,
//! the arena that owns every node created during a build, and the finished
//! `PartitionTree` handed to downstream consumers.
//!
//! Nodes refer to each other through `NodeId` handles into the arena. Children
//! are owning handles, the parent link is a plain back-reference, so the
//! parent/child cycle never becomes an ownership cycle.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::mem;
use std::ops::Range;

use crate::error::BuildError;
use crate::utils;

/// Handle of a node within the `Arena`. Stable for the lifetime of a build.
pub type NodeId = usize;
/// Index of a point in the value table.
pub type PointIdx = usize;

/// Which extremum a merge operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeDirection {
    /// Ascending merge: two maxima become one, candidates are paired by min.
    Max,
    /// Descending merge: two minima become one, candidates are paired by max.
    Min,
}

/// Contiguous `[start, end)` range into the reordered point buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "Inverted span [{}, {})", start, end);
        Span { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// A node of the partition tree.
///
/// Leaves are the base partitions (persistence 0) and own their points
/// directly. Internal nodes are created by merge events and own their points
/// only through their children.
#[derive(Debug, Clone)]
pub struct PartitionNode {
    pub(crate) id: usize,
    pub(crate) persistence: f64,
    pub(crate) min_idx: PointIdx,
    pub(crate) max_idx: PointIdx,
    pub(crate) extrema: BTreeSet<PointIdx>,
    pub(crate) base_pts: Vec<PointIdx>,
    pub(crate) span: Span,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Descendant that last provided the node's min or max.
    pub(crate) origin: Option<NodeId>,
    /// Base leaf that last provided the node's min or max.
    pub(crate) base: NodeId,
    pub(crate) direction: Option<MergeDirection>,
}

impl PartitionNode {
    /// Node identity. Compact and depth-first ordered once the build finishes.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Normalized level at which the node was created, 0 for base partitions.
    pub fn persistence(&self) -> f64 {
        self.persistence
    }

    pub fn min_idx(&self) -> PointIdx {
        self.min_idx
    }

    pub fn max_idx(&self) -> PointIdx {
        self.max_idx
    }

    /// Extrema recorded in this subtree that are not physically owned by the
    /// node's own span (after indexing).
    pub fn extrema(&self) -> &BTreeSet<PointIdx> {
        &self.extrema
    }

    /// Points owned directly by the node, in input order.
    pub fn base_pts(&self) -> &[PointIdx] {
        &self.base_pts
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn origin(&self) -> Option<NodeId> {
        self.origin
    }

    pub fn base(&self) -> NodeId {
        self.base
    }

    /// Direction of the merge that paired this node's children, if any.
    pub fn direction(&self) -> Option<MergeDirection> {
        self.direction
    }
}

/// Owns every node created during a build. Nodes are never removed, only
/// detached from their parent's `children`.
#[derive(Debug, Clone, Default)]
pub struct Arena {
    nodes: Vec<PartitionNode>,
}

#[allow(clippy::len_without_is_empty)]
impl Arena {
    pub fn new() -> Self {
        Arena { nodes: Vec::new() }
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    fn push(&mut self, node: PartitionNode) -> NodeId {
        let handle = self.nodes.len();
        self.nodes.push(node);
        handle
    }

    /// Creates a base partition owning `base_pts`, bounded by the two extrema.
    pub(crate) fn new_leaf(&mut self, id: usize, min_idx: PointIdx, max_idx: PointIdx, base_pts: Vec<PointIdx>) -> NodeId {
        let handle = self.nodes.len();
        self.push(PartitionNode {
            id,
            persistence: 0.0,
            min_idx,
            max_idx,
            extrema: BTreeSet::from([min_idx, max_idx]),
            base_pts,
            span: Span::default(),
            parent: None,
            children: Vec::new(),
            origin: None,
            base: handle,
            direction: None,
        })
    }

    /// Creates a node at `persistence` whose first child is `from`. The new
    /// node starts with `from`'s extrema and point set.
    pub(crate) fn new_parent(
        &mut self,
        id: usize,
        persistence: f64,
        from: NodeId,
        direction: Option<MergeDirection>,
        values: &[f64],
    ) -> NodeId {
        let (min_idx, max_idx, base) = {
            let child = &self.nodes[from];
            (child.min_idx, child.max_idx, child.base)
        };
        let handle = self.push(PartitionNode {
            id,
            persistence,
            min_idx,
            max_idx,
            extrema: BTreeSet::new(),
            base_pts: Vec::new(),
            span: Span::default(),
            parent: None,
            children: Vec::new(),
            origin: Some(from),
            base,
            direction,
        });
        self.add_child(handle, from, values);
        handle
    }

    /// Attaches `child` under `parent`, widening the parent's extremum range
    /// when the child reaches further.
    pub(crate) fn add_child(&mut self, parent: NodeId, child: NodeId, values: &[f64]) {
        let child_node = &mut self.nodes[child];
        child_node.parent = Some(parent);
        let (c_min, c_max, c_base) = (child_node.min_idx, child_node.max_idx, child_node.base);
        let c_extrema = child_node.extrema.clone();

        let node = &mut self.nodes[parent];
        node.children.push(child);
        node.extrema.extend(c_extrema);
        if values[c_min] < values[node.min_idx] {
            node.min_idx = c_min;
            node.origin = Some(child);
            node.base = c_base;
        }
        if values[c_max] > values[node.max_idx] {
            node.max_idx = c_max;
            node.origin = Some(child);
            node.base = c_base;
        }
    }

    /// Registers `extremum` as the node's new min or max.
    ///
    /// # Errors
    /// `NotAnExtremum` if the extremum's value lies strictly inside the node's
    /// current `(min, max)` range. The node is left untouched in that case.
    pub(crate) fn add_extremum(&mut self, node: NodeId, extremum: PointIdx, values: &[f64]) -> Result<(), BuildError> {
        let n = &mut self.nodes[node];
        if values[extremum] <= values[n.min_idx] {
            n.min_idx = extremum;
        } else if values[n.max_idx] <= values[extremum] {
            n.max_idx = extremum;
        } else {
            return Err(BuildError::NotAnExtremum { node, extremum });
        }
        n.extrema.insert(extremum);
        Ok(())
    }

    /// Moves the points and extrema of the childless `child` into `parent`.
    /// The child record stays in the arena with an empty point list.
    pub(crate) fn fold_leaf(&mut self, parent: NodeId, child: NodeId, values: &[f64]) {
        let child_node = &mut self.nodes[child];
        let pts = mem::take(&mut child_node.base_pts);
        let (c_min, c_max) = (child_node.min_idx, child_node.max_idx);
        let c_extrema = child_node.extrema.clone();

        let node = &mut self.nodes[parent];
        node.base_pts.extend(pts);
        node.extrema.extend(c_extrema);
        if values[c_min] < values[node.min_idx] {
            node.min_idx = c_min;
        }
        if values[c_max] > values[node.max_idx] {
            node.max_idx = c_max;
        }
    }

    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    pub fn node(&self, id: NodeId) -> &PartitionNode {
        &self.nodes[id]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut PartitionNode {
        &mut self.nodes[id]
    }

    /// Number of nodes ever created, attached or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// The finished tree: every node reachable from `root` has a span into the
/// reordered point buffer `pts`.
#[derive(Debug, Clone)]
pub struct PartitionTree {
    pub(crate) arena: Arena,
    pub(crate) root: NodeId,
    pub(crate) pts: Vec<PointIdx>,
    pub(crate) values: Vec<f64>,
}

// A finished tree always has a root.
#[allow(clippy::len_without_is_empty)]
impl PartitionTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// # Panics
    /// Panics if `id` is out of bounds.
    pub fn node(&self, id: NodeId) -> &PartitionNode {
        self.arena.node(id)
    }

    /// Every node created during the build, including detached ones.
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Number of nodes reachable from the root.
    pub fn len(&self) -> usize {
        utils::count_nodes(&self.arena, self.root)
    }

    /// Original point indices in leaf-contiguous order.
    pub fn pts(&self) -> &[PointIdx] {
        &self.pts
    }

    /// Original point indices covered by a node's span.
    pub fn points(&self, id: NodeId) -> &[PointIdx] {
        &self.pts[self.node(id).span.range()]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Number of levels, counting the root as 1.
    pub fn depth(&self) -> usize {
        utils::tree_depth(&self.arena, self.root)
    }

    pub fn size(&self, id: NodeId) -> usize {
        self.node(id).span.len()
    }

    /// Fraction of all points covered by the node.
    pub fn relative_size(&self, id: NodeId) -> f64 {
        if self.pts.is_empty() {
            return 0.0;
        }
        self.size(id) as f64 / self.pts.len() as f64
    }

    pub fn min_value(&self, id: NodeId) -> f64 {
        self.values[self.node(id).min_idx]
    }

    pub fn max_value(&self, id: NodeId) -> f64 {
        self.values[self.node(id).max_idx]
    }

    /// Reachable nodes in depth-first pre-order, children in stored order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.node(id).children.iter().rev());
        }
        order
    }

    /// The partition of the domain at `level`: the highest nodes whose
    /// persistence does not exceed `level`. Their spans tile the buffer.
    pub fn cut(&self, level: f64) -> Vec<NodeId> {
        let mut selected = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.persistence <= level || node.is_leaf() {
                selected.push(id);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        selected
    }

    /// `(persistence, node count)` pairs in ascending persistence order.
    pub fn level_histogram(&self) -> Vec<(f64, usize)> {
        utils::level_histogram(&self.arena, self.root)
    }

    /// Indented text dump of the tree, one node per line.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        self.describe_recursive(self.root, "", &mut out);
        out
    }

    fn describe_recursive(&self, id: NodeId, prefix: &str, out: &mut String) {
        let node = self.node(id);
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{}[{}] persistence={:.4} span=[{}, {}) min={} max={} extrema={:?}",
            prefix, node.id, node.persistence, node.span.start, node.span.end, node.min_idx, node.max_idx, node.extrema
        );
        let child_prefix = format!("{}  ", prefix);
        for &child in &node.children {
            self.describe_recursive(child, &child_prefix, out);
        }
    }
}
