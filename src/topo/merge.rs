//! Merge records and their deterministic ordering.
//!
//! Records are replayed lowest persistence first; ties are broken by source
//! extremum so that two runs over the same input pair the same nodes.

use rustc_hash::FxHashSet;

use crate::error::BuildError;
use crate::tree::{MergeDirection, PointIdx};
use super::data::Hierarchy;

/// One merge event: extremum `src` is absorbed into extremum `dest` at `level`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    pub level: f64,
    pub direction: MergeDirection,
    pub src: PointIdx,
    pub dest: PointIdx,
}

impl Merge {
    pub fn is_max(&self) -> bool {
        self.direction == MergeDirection::Max
    }
}

/// Builds the ordered, normalized merge sequence.
///
/// A record is a maximum-merge when its source extremum is the max of some
/// base partition (`maxima`), a minimum-merge otherwise. Records are sorted by
/// `(level, src)` and every level is divided by the highest one, so the last
/// record ends at exactly 1.
///
/// # Errors
/// * `EmptyHierarchy` if there are no records.
/// * `InvalidLevel` if the highest level is not a finite positive number, or
///   if any level is negative.
pub(crate) fn order_merges(hierarchy: &Hierarchy, maxima: &FxHashSet<PointIdx>) -> Result<Vec<Merge>, BuildError> {
    let mut merges: Vec<Merge> = hierarchy
        .iter()
        .map(|(&src, &(level, dest))| Merge {
            level,
            direction: if maxima.contains(&src) { MergeDirection::Max } else { MergeDirection::Min },
            src,
            dest,
        })
        .collect();

    merges.sort_by(|a, b| a.level.total_cmp(&b.level).then(a.src.cmp(&b.src)));

    let high = merges.last().ok_or(BuildError::EmptyHierarchy)?.level;
    if !(high.is_finite() && high > 0.0) {
        return Err(BuildError::InvalidLevel(high));
    }
    // Sorted, so the first record holds the lowest level.
    if let Some(low) = merges.first().map(|m| m.level).filter(|&l| l < 0.0) {
        return Err(BuildError::InvalidLevel(low));
    }
    for merge in merges.iter_mut() {
        merge.level /= high;
    }
    Ok(merges)
}
