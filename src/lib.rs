//! Persistence-simplified partition trees over scalar fields.
//!
//! The crate turns a base partition of a point set (extremum-bounded
//! segments) and a hierarchy of merge events into a single rooted merge tree
//! whose nodes own contiguous spans of a reordered point buffer. See
//! [`topo::Builder`] for the pipeline and [`tree::PartitionTree`] for the
//! read-only result consumed by downstream measures and models.

pub mod config;
pub mod error;
pub mod topo;
pub mod tree;
pub mod utils;

#[cfg(test)]
mod proptests;

pub use config::BuilderOptions;
pub use error::BuildError;
pub use topo::{BuildStats, Builder, MsComplex};
pub use tree::{MergeDirection, NodeId, PartitionNode, PartitionTree, PointIdx, Span};
