//! The active working set: nodes not yet absorbed by a later merge, indexed by
//! their current min and max extremum.
//!
//! Buckets are ordered by handle, which makes the collapse pairing order (and
//! therefore the shape of the output) independent of hashing.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::tree::{Arena, MergeDirection, NodeId, PointIdx};

#[derive(Debug, Clone, Default)]
pub(crate) struct ActiveSet {
    nodes: BTreeSet<NodeId>,
    by_min: FxHashMap<PointIdx, BTreeSet<NodeId>>,
    by_max: FxHashMap<PointIdx, BTreeSet<NodeId>>,
}

impl ActiveSet {
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.by_min.clear();
        self.by_max.clear();
    }

    /// Registers `id` under its current extrema.
    pub(crate) fn insert(&mut self, arena: &Arena, id: NodeId) {
        let node = arena.node(id);
        self.by_min.entry(node.min_idx()).or_default().insert(id);
        self.by_max.entry(node.max_idx()).or_default().insert(id);
        self.nodes.insert(id);
    }

    /// Unregisters `id`. Must run before the node's extrema change.
    pub(crate) fn remove(&mut self, arena: &Arena, id: NodeId) {
        let node = arena.node(id);
        Self::discard(&mut self.by_min, node.min_idx(), id);
        Self::discard(&mut self.by_max, node.max_idx(), id);
        self.nodes.remove(&id);
    }

    fn discard(index: &mut FxHashMap<PointIdx, BTreeSet<NodeId>>, key: PointIdx, id: NodeId) {
        if let Some(bucket) = index.get_mut(&key) {
            bucket.remove(&id);
            if bucket.is_empty() {
                index.remove(&key);
            }
        }
    }

    /// Snapshot of the nodes whose max (`Max`) or min (`Min`) is `extremum`.
    pub(crate) fn indexed(&self, direction: MergeDirection, extremum: PointIdx) -> Vec<NodeId> {
        let index = match direction {
            MergeDirection::Max => &self.by_max,
            MergeDirection::Min => &self.by_min,
        };
        index.get(&extremum).map(|bucket| bucket.iter().copied().collect()).unwrap_or_default()
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Removes and returns the only remaining node, if exactly one is left.
    pub(crate) fn take_single(&mut self) -> Option<NodeId> {
        if self.nodes.len() != 1 {
            return None;
        }
        let id = self.nodes.pop_first()?;
        self.by_min.clear();
        self.by_max.clear();
        Some(id)
    }
}
