//! Implements the partition tree construction: replaying the merge hierarchy
//! against the active working set until a single root remains, then
//! simplifying and indexing the result.
//!
//! The merge phase behaves like an online union-find over two independently
//! tracked extremum indices. A maximum-merge relabels every active node whose
//! max is the absorbed extremum; nodes that end up with the same `(min, max)`
//! pair are combined under one new parent. Minimum-merges are symmetric.

use std::mem;
use std::time::Instant;

use log::{debug, info, warn};
use rustc_hash::FxHashSet;

use crate::config::{BuilderOptions, ERROR_SAMPLE_SIZE};
use crate::error::BuildError;
use crate::tree::{Arena, MergeDirection, NodeId, PartitionTree, PointIdx};
use crate::utils::{count_nodes, tree_depth};
use super::active::ActiveSet;
use super::data::{BasePartition, Hierarchy, MsComplex};
use super::index::{renumber, Indexer};
use super::merge::{order_merges, Merge};
use super::redirect::Redirects;
use super::simplify::simplify;
use super::BuildStats;

/// Hands out node identities. Reset at the start of every build.
#[derive(Debug, Clone, Default)]
pub(crate) struct IdGenerator {
    next: usize,
}

impl IdGenerator {
    pub(crate) fn reset(&mut self) {
        self.next = 0;
    }

    pub(crate) fn next_id(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Builds a `PartitionTree` from a base partition and a merge hierarchy.
///
/// The builder owns the point value table for the duration of a build and may
/// be reused: every call to `build` resets identities and working state.
///
/// ```ignore
/// let tree = Builder::new(BuilderOptions::default())
///     .data(values)
///     .msc(base, hierarchy)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    options: BuilderOptions,
    /// Point value table, read-only during a build.
    values: Vec<f64>,
    base: BasePartition,
    hierarchy: Hierarchy,

    // --- Working state, reset by `prepare` ---
    ids: IdGenerator,
    arena: Arena,
    active: ActiveSet,
    mapping: Redirects,
    /// Max extremum of every base partition.
    maxima: FxHashSet<PointIdx>,
    merges: Vec<Merge>,
    stats: BuildStats,
}

impl Builder {
    pub fn new(options: BuilderOptions) -> Self {
        Builder { options, ..Builder::default() }
    }

    /// Builder preloaded with the values, base partition and hierarchy of `msc`.
    pub fn from_msc(msc: &MsComplex, options: BuilderOptions) -> Self {
        Builder::new(options).data(msc.values.clone()).msc(msc.base(), msc.hierarchy())
    }

    /// Installs the point value table.
    pub fn data(mut self, values: Vec<f64>) -> Self {
        self.values = values;
        self
    }

    /// Installs the base partition and the merge hierarchy.
    pub fn msc(mut self, base: BasePartition, hierarchy: Hierarchy) -> Self {
        self.base = base;
        self.hierarchy = hierarchy;
        self
    }

    /// Normalized merge records of the last build, in replay order.
    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// Statistics of the last build.
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Runs the full pipeline: prepare, merge, simplify, index, renumber.
    ///
    /// # Errors
    /// Any `BuildError`; the builder's working state is unspecified afterwards
    /// but the next `build` starts from scratch.
    pub fn build(&mut self) -> Result<PartitionTree, BuildError> {
        self.stats = BuildStats::default();

        let start = Instant::now();
        self.prepare()?;
        if self.options.check_points {
            self.count_points()?;
        }
        self.stats.prepare_duration = start.elapsed();

        let start = Instant::now();
        self.merge()?;
        let root = self.create_root()?;
        self.stats.merge_duration = start.elapsed();
        self.stats.nodes_created = self.arena.len();

        let start = Instant::now();
        self.stats.partitions_before = count_nodes(&self.arena, root);
        self.stats.depth_before = tree_depth(&self.arena, root);
        simplify(&mut self.arena, &self.values, root);
        self.stats.partitions_after = count_nodes(&self.arena, root);
        self.stats.depth_after = tree_depth(&self.arena, root);
        self.stats.simplify_duration = start.elapsed();
        info!(
            "Simplification: partitions {} -> {}, depth {} -> {}",
            self.stats.partitions_before, self.stats.partitions_after, self.stats.depth_before, self.stats.depth_after
        );

        let start = Instant::now();
        let mut indexer = Indexer::new(&mut self.arena, self.values.len());
        indexer.index(root, 0);
        self.stats.single_child = indexer.single();
        let pts = indexer.finish(self.values.len())?;
        renumber(&mut self.arena, root, 0);
        self.stats.index_duration = start.elapsed();
        if self.stats.single_child > 0 {
            debug!("Found {} single-child partitions", self.stats.single_child);
        }

        Ok(PartitionTree {
            arena: mem::take(&mut self.arena),
            root,
            pts,
            values: self.values.clone(),
        })
    }

    // --- Phases ---

    /// Resets the working state, creates one active leaf per base partition
    /// and orders the merge records.
    fn prepare(&mut self) -> Result<(), BuildError> {
        self.ids.reset();
        self.arena.clear();
        self.active.clear();
        self.mapping.clear();
        self.maxima.clear();
        self.merges.clear();

        self.validate()?;

        for (&(min_idx, max_idx), pts) in &self.base {
            let id = self.ids.next_id();
            let leaf = self.arena.new_leaf(id, min_idx, max_idx, pts.clone());
            self.maxima.insert(max_idx);
            self.active.insert(&self.arena, leaf);
        }
        info!("Base: {} partitions {} points", self.active.len(), self.values.len());

        self.merges = order_merges(&self.hierarchy, &self.maxima)?;
        self.stats.base_partitions = self.active.len();
        self.stats.merges = self.merges.len();
        Ok(())
    }

    /// Every index in the input must address the value table.
    fn validate(&self) -> Result<(), BuildError> {
        let len = self.values.len();
        let check = |index: PointIdx| {
            if index < len {
                Ok(())
            } else {
                Err(BuildError::UnknownPoint { index, len })
            }
        };
        for (&(min_idx, max_idx), pts) in &self.base {
            check(min_idx)?;
            check(max_idx)?;
            pts.iter().try_for_each(|&pt| check(pt))?;
        }
        for (&src, &(_, dest)) in &self.hierarchy {
            check(src)?;
            check(dest)?;
        }
        Ok(())
    }

    /// Verifies that the active partitions own every point exactly as the
    /// value table describes, and that each extremum is owned by some
    /// partition.
    fn count_points(&self) -> Result<(), BuildError> {
        let mut pts: FxHashSet<PointIdx> = FxHashSet::default();
        let mut extrema: FxHashSet<PointIdx> = FxHashSet::default();
        for id in self.active.iter() {
            let node = self.arena.node(id);
            pts.extend(node.base_pts().iter().copied());
            extrema.extend(node.extrema().iter().copied());
        }

        let mut orphans: Vec<PointIdx> = extrema.difference(&pts).copied().collect();
        if !orphans.is_empty() {
            orphans.sort_unstable();
            let count = orphans.len();
            orphans.truncate(ERROR_SAMPLE_SIZE);
            warn!("Extrema not in points: {:?} #pts={}", orphans, pts.len());
            return Err(BuildError::OrphanExtrema { count, sample: orphans });
        }

        if pts.len() != self.values.len() {
            warn!("Lost some points: #pts={} #data={} #extrema={}", pts.len(), self.values.len(), extrema.len());
            return Err(BuildError::PointsLost { found: pts.len(), expected: self.values.len() });
        }
        Ok(())
    }

    /// Replays every merge record in order.
    fn merge(&mut self) -> Result<(), BuildError> {
        for i in 0..self.merges.len() {
            let record = self.merges[i];
            if record.src == record.dest {
                self.stats.skipped_merges += 1;
                continue;
            }

            // dest may already have been merged at the same or a lower level
            let dest = self.mapping.find(record.dest);
            let src = self.mapping.find(record.src);
            if src == dest {
                self.stats.skipped_merges += 1;
                continue;
            }

            let resolved = Merge { src, dest, ..record };
            self.merges[i] = resolved;
            self.mapping.redirect(src, dest);

            debug!(
                "Merge {} -> {} at {:.4} ({:?}), {} active",
                src, dest, record.level, record.direction, self.active.len()
            );
            self.collapse(&resolved)?;
        }
        debug!("{} extrema redirected, {} active", self.mapping.len(), self.active.len());
        Ok(())
    }

    /// Combines the active nodes touched by one resolved merge.
    ///
    /// Destination and source nodes sharing the extremum not involved in the
    /// merge (the min for a maximum-merge, the max for a minimum-merge) are
    /// grouped under one new parent per destination node. Unpaired sources
    /// are relabeled with the destination extremum: wrapped in a new
    /// single-child parent, or reused in place when they were created at this
    /// very level.
    fn collapse(&mut self, merge: &Merge) -> Result<(), BuildError> {
        let opposite = |arena: &Arena, id: NodeId| match merge.direction {
            MergeDirection::Max => arena.node(id).min_idx(),
            MergeDirection::Min => arena.node(id).max_idx(),
        };

        let mut added: Vec<NodeId> = Vec::new();
        let mut removed: Vec<NodeId> = Vec::new();

        for d in self.active.indexed(merge.direction, merge.dest) {
            let key = opposite(&self.arena, d);
            let mut parent: Option<NodeId> = None;
            let mut consumed: Vec<NodeId> = Vec::new();

            for s in self.active.indexed(merge.direction, merge.src) {
                if opposite(&self.arena, s) != key {
                    continue;
                }
                let p = match parent {
                    Some(p) => p,
                    None => {
                        let id = self.ids.next_id();
                        let p = self.arena.new_parent(id, merge.level, d, Some(merge.direction), &self.values);
                        // d stays indexed until every source has been paired
                        removed.push(d);
                        added.push(p);
                        parent = Some(p);
                        p
                    }
                };
                self.arena.add_child(p, s, &self.values);
                consumed.push(s);
            }

            for s in consumed {
                self.active.remove(&self.arena, s);
            }
        }

        for s in self.active.indexed(merge.direction, merge.src) {
            if self.arena.node(s).persistence() != merge.level {
                // Same shape, but the extremum changed: new level.
                let id = self.ids.next_id();
                let p = self.arena.new_parent(id, merge.level, s, None, &self.values);
                self.arena.add_extremum(p, merge.dest, &self.values)?;
                added.push(p);
                removed.push(s);
            } else {
                // Created at this level already: relabel in place.
                self.active.remove(&self.arena, s);
                self.arena.add_extremum(s, merge.dest, &self.values)?;
                self.active.insert(&self.arena, s);
            }
        }

        for r in removed {
            self.active.remove(&self.arena, r);
        }
        for a in added {
            self.active.insert(&self.arena, a);
        }
        Ok(())
    }

    /// Takes the single remaining active node as the root.
    ///
    /// # Errors
    /// `RootCount` if the hierarchy left zero or several active nodes.
    fn create_root(&mut self) -> Result<NodeId, BuildError> {
        let count = self.active.len();
        self.active.take_single().ok_or_else(|| {
            warn!("{} active partitions after merging", count);
            BuildError::RootCount { count }
        })
    }
}
