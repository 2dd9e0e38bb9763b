//! Builds a persistence-simplified partition tree over a scalar field.
//!
//! Given a fine-grained base partition of the points into extremum-bounded
//! segments and a hierarchy of merge events, `Builder` produces a single
//! rooted `PartitionTree`:
//! 1. `prepare`: one active leaf per base partition, merge records sorted by
//!    `(level, source)` and normalized to `[0, 1]`.
//! 2. `merge`: records are replayed against the active working set, resolving
//!    absorbed extrema through a union-find, until one root remains.
//! 3. `simplify`: levels duplicated by the replay are spliced out.
//! 4. `index`: points are laid out leaf-contiguously, every node gets a span,
//!    and node ids are renumbered.

mod active;
mod builder;
mod data;
mod index;
mod merge;
mod redirect;
pub(crate) mod simplify;

#[cfg(test)]
pub(crate) mod fixtures;

pub use builder::Builder;
pub use data::{load_msc, parse_msc, BasePartition, Hierarchy, HierarchyRecord, MsComplex, PartitionKey, PartitionRecord};
pub use merge::Merge;

use std::time::Duration;

/// Counters and phase timings of one `Builder::build` run.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BuildStats {
    /// Number of base partitions (leaves created by `prepare`).
    pub base_partitions: usize,
    /// Number of merge records after ordering.
    pub merges: usize,
    /// Records skipped because source and destination already coincide.
    pub skipped_merges: usize,
    /// Nodes created in total, including ones later spliced out.
    pub nodes_created: usize,
    /// Reachable nodes before and after simplification.
    pub partitions_before: usize,
    pub partitions_after: usize,
    /// Tree depth before and after simplification.
    pub depth_before: usize,
    pub depth_after: usize,
    /// Internal nodes with a single child in the final tree.
    pub single_child: usize,
    pub prepare_duration: Duration,
    pub merge_duration: Duration,
    pub simplify_duration: Duration,
    pub index_duration: Duration,
}

impl BuildStats {
    pub fn total_duration(&self) -> Duration {
        self.prepare_duration + self.merge_duration + self.simplify_duration + self.index_duration
    }
}
