//! Small hand-checked inputs over 1-D scalar fields.
//!
//! Points are laid out along a line; minima and maxima alternate and each
//! monotone segment between two extrema is one base partition.

use super::data::{BasePartition, Hierarchy, HierarchyRecord, MsComplex, PartitionRecord};

/// minima 0, 4, 8 and maxima 2, 6.
fn valley_field() -> (Vec<f64>, BasePartition) {
    let values = vec![0.0, 2.0, 4.0, 2.5, 1.0, 3.0, 5.0, 2.0, 0.5];
    let base: BasePartition = [
        ((0, 2), vec![0, 1, 2]),
        ((4, 2), vec![3, 4]),
        ((4, 6), vec![5, 6]),
        ((8, 6), vec![7, 8]),
    ]
    .into_iter()
    .collect();
    (values, base)
}

fn hierarchy(records: &[(usize, f64, usize)]) -> Hierarchy {
    records.iter().map(|&(src, level, dest)| (src, (level, dest))).collect()
}

/// Distinct merge levels: min 4 into 8, max 2 into 6, min 0 into 8.
pub(crate) fn valley() -> (Vec<f64>, BasePartition, Hierarchy) {
    let (values, base) = valley_field();
    (values, base, hierarchy(&[(4, 1.5, 8), (2, 3.0, 6), (0, 4.0, 8)]))
}

/// Same field, but the first two merges share a level.
pub(crate) fn plateau() -> (Vec<f64>, BasePartition, Hierarchy) {
    let (values, base) = valley_field();
    (values, base, hierarchy(&[(2, 2.0, 6), (4, 2.0, 8), (0, 4.0, 8)]))
}

/// Same field, first merge at raw level 0.
pub(crate) fn shelf() -> (Vec<f64>, BasePartition, Hierarchy) {
    let (values, base) = valley_field();
    (values, base, hierarchy(&[(2, 0.0, 6), (4, 2.0, 8), (0, 4.0, 8)]))
}

/// minima 0, 4, 8, 12 and maxima 2, 6, 10. Two maximum-merges at the same
/// level, so the second one finds sources already created at that level.
pub(crate) fn ridge() -> (Vec<f64>, BasePartition, Hierarchy) {
    let values = vec![0.0, 2.0, 4.0, 2.5, 1.0, 3.0, 5.0, 2.0, 0.5, 3.0, 6.0, 2.0, 0.2];
    let base: BasePartition = [
        ((0, 2), vec![0, 1, 2]),
        ((4, 2), vec![3, 4]),
        ((4, 6), vec![5, 6]),
        ((8, 6), vec![7, 8]),
        ((8, 10), vec![9, 10]),
        ((12, 10), vec![11, 12]),
    ]
    .into_iter()
    .collect();
    let hierarchy = hierarchy(&[(2, 2.0, 6), (6, 2.0, 10), (4, 3.0, 8), (8, 4.0, 12), (0, 5.0, 12)]);
    (values, base, hierarchy)
}

/// minima 0, 4, 8, 12 and maxima 2, 6, 10, with later records naming
/// extrema absorbed earlier: `12 -> 4` resolves to `12 -> 8`, and `10 -> 2`
/// resolves to `10 -> 10` and is skipped.
pub(crate) fn chain() -> (Vec<f64>, BasePartition, Hierarchy) {
    let values = vec![0.0, 5.0, 7.0, 5.0, 3.0, 5.0, 8.0, 5.0, 1.0, 5.0, 9.0, 5.0, 2.0];
    let base: BasePartition = [
        ((0, 2), vec![0, 1, 2]),
        ((4, 2), vec![3, 4]),
        ((4, 6), vec![5, 6]),
        ((8, 6), vec![7, 8]),
        ((8, 10), vec![9, 10]),
        ((12, 10), vec![11, 12]),
    ]
    .into_iter()
    .collect();
    let hierarchy = hierarchy(&[
        (2, 1.0, 6),
        (6, 2.0, 10),
        (10, 2.5, 2),
        (4, 3.0, 8),
        (12, 4.0, 4),
        (8, 5.0, 0),
    ]);
    (values, base, hierarchy)
}

pub(crate) fn to_msc(values: &[f64], base: &BasePartition, hierarchy: &Hierarchy) -> MsComplex {
    MsComplex {
        values: values.to_vec(),
        partitions: base
            .iter()
            .map(|(&(min, max), points)| PartitionRecord { min, max, points: points.clone() })
            .collect(),
        hierarchy: hierarchy
            .iter()
            .map(|(&extremum, &(level, dest))| HierarchyRecord { extremum, level, dest })
            .collect(),
    }
}
