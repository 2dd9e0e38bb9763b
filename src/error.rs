//! Error taxonomy for the partition tree build.
//!
//! Every failure is fatal: the build is a deterministic input-to-tree
//! transformation, so there is nothing to retry. Variants carry enough context
//! (counts, offending indices) to tell a broken hierarchy apart from an
//! algorithmic regression.

use thiserror::Error;

use crate::tree::{NodeId, PointIdx};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    // --- Configuration errors ---
    /// The merge hierarchy has no records, so levels cannot be normalized.
    #[error("merge hierarchy is empty: nothing to normalize levels against")]
    EmptyHierarchy,

    /// The highest merge level is zero, negative or not finite.
    #[error("maximum merge level is {0}, expected a finite positive value")]
    InvalidLevel(f64),

    /// A partition key, owned point or hierarchy entry refers to a point that
    /// is not in the value table.
    #[error("point index {index} is outside the value table ({len} points)")]
    UnknownPoint { index: PointIdx, len: usize },

    /// The hierarchy does not connect the whole base partition.
    #[error("found {count} roots after merging, expected exactly one")]
    RootCount { count: usize },

    // --- Data-loss errors ---
    /// The base partitions do not own every point of the value table.
    #[error("lost points: {found} distinct points accounted for, data has {expected}")]
    PointsLost { found: usize, expected: usize },

    /// Some extrema are not owned by any partition.
    #[error("{count} extrema are not owned by any partition (e.g. {sample:?})")]
    OrphanExtrema { count: usize, sample: Vec<PointIdx> },

    /// The reordered point buffer does not match the input point count.
    #[error("reordered buffer holds {found} points but data has {expected}")]
    PointCountMismatch { found: usize, expected: usize },

    // --- Logic assertions ---
    /// An extremum was registered that lies strictly inside the node's range.
    #[error("point {extremum} is not an extremum of node {node}: its value lies inside [min, max]")]
    NotAnExtremum { node: NodeId, extremum: PointIdx },
}
