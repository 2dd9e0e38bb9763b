use std::collections::BTreeSet;

use proptest::prelude::*;
use proptest::sample::Index;

use crate::config::BuilderOptions;
use crate::topo::simplify::simplify;
use crate::topo::{BasePartition, Builder, Hierarchy};
use crate::tree::{PartitionTree, PointIdx};

/// A random complex whose hierarchy is guaranteed to reduce to one root.
///
/// Points `0..n_min` are minima (the last one lowest), the next `n_max` points
/// are maxima (the last one highest), the rest are regular. Every minimum but
/// the lowest merges into a random lower minimum, every maximum but the
/// highest into a random higher maximum. Destinations are often absorbed
/// before their own sources, so records go through the redirection table, and
/// once all of them are replayed every partition is keyed
/// `(lowest, highest)`.
#[derive(Debug, Clone)]
struct Case {
    values: Vec<f64>,
    base: BasePartition,
    hierarchy: Hierarchy,
}

#[allow(clippy::too_many_arguments)]
fn build_case(
    n_min: usize,
    n_max: usize,
    n_regular: usize,
    extra: Vec<(usize, usize)>,
    extremum_owner: Vec<Index>,
    regular_owner: Vec<Index>,
    levels: Vec<u32>,
    dest_choice: Vec<Index>,
) -> Case {
    let n_ext = n_min + n_max;
    let mut values: Vec<f64> = (0..n_min).map(|i| -(i as f64) - 1.0).collect();
    values.extend((0..n_max).map(|j| 10.0 + j as f64));
    values.extend(std::iter::repeat(5.0).take(n_regular));

    // Every extremum bounds at least one partition.
    let mut keys: BTreeSet<(PointIdx, PointIdx)> = BTreeSet::new();
    for i in 0..n_min {
        keys.insert((i, n_min + i % n_max));
    }
    for j in 0..n_max {
        keys.insert((j % n_min, n_min + j));
    }
    for (i, j) in extra {
        keys.insert((i, n_min + j));
    }
    let keys: Vec<(PointIdx, PointIdx)> = keys.into_iter().collect();

    let mut base: BasePartition = keys.iter().map(|&k| (k, Vec::new())).collect();
    for (e, owner) in extremum_owner.iter().enumerate() {
        let bounded: Vec<_> = keys.iter().copied().filter(|&(min, max)| min == e || max == e).collect();
        let key = bounded[owner.index(bounded.len())];
        base.get_mut(&key).unwrap().push(e);
    }
    for (k, owner) in regular_owner.iter().enumerate() {
        let key = keys[owner.index(keys.len())];
        base.get_mut(&key).unwrap().push(n_ext + k);
    }

    let lowest = n_min - 1;
    let highest = n_ext - 1;
    let mut hierarchy = Hierarchy::new();
    for i in 0..lowest {
        let dest = i + 1 + dest_choice[i].index(lowest - i);
        hierarchy.insert(i, (levels[i] as f64, dest));
    }
    for j in n_min..highest {
        let dest = j + 1 + dest_choice[j].index(highest - j);
        hierarchy.insert(j, (levels[j] as f64, dest));
    }

    Case { values, base, hierarchy }
}

fn case_strategy() -> impl Strategy<Value = Case> {
    (1usize..=5, 1usize..=5, 0usize..=12)
        .prop_flat_map(|(n_min, n_max, n_regular)| {
            (
                Just(n_min),
                Just(n_max),
                Just(n_regular),
                prop::collection::vec((0..n_min, 0..n_max), 0..=6),
                prop::collection::vec(any::<Index>(), n_min + n_max),
                prop::collection::vec(any::<Index>(), n_regular),
                prop::collection::vec(1u32..1000, n_min + n_max),
                prop::collection::vec(any::<Index>(), n_min + n_max),
            )
        })
        .prop_map(|(n_min, n_max, n_regular, extra, extremum_owner, regular_owner, levels, dest_choice)| {
            build_case(n_min, n_max, n_regular, extra, extremum_owner, regular_owner, levels, dest_choice)
        })
}

/// Every extremum bounding some base partition.
fn base_extrema(base: &BasePartition) -> BTreeSet<PointIdx> {
    base.keys().flat_map(|&(min, max)| [min, max]).collect()
}

fn validate_tree(tree: &PartitionTree, extrema: &BTreeSet<PointIdx>) {
    for id in tree.preorder() {
        let node = tree.node(id);
        let mut cursor = node.span().start + node.base_pts().len();
        if !node.is_leaf() {
            assert!(node.base_pts().is_empty(), "internal node {} owns points", id);
        }

        // Extrema are recorded, or owned by the node's span once indexed.
        let points = tree.points(id);
        for e in [node.min_idx(), node.max_idx()] {
            assert!(
                node.extrema().contains(&e) || points.contains(&e),
                "node {} lost its own extremum {}",
                id,
                e
            );
        }
        for e in node.extrema() {
            assert!(extrema.contains(e), "node {} records {} which bounds no partition", id, e);
            assert!(!points.contains(e), "node {} records {} inside its own span", id, e);
        }
        for &child in node.children() {
            let c = tree.node(child);
            assert_eq!(c.parent(), Some(id), "broken parent link");
            assert!(
                c.persistence() < node.persistence(),
                "child persistence {} not below parent {}",
                c.persistence(),
                node.persistence()
            );
            assert_eq!(c.span().start, cursor, "child spans must be contiguous");
            for e in c.extrema() {
                assert!(
                    node.extrema().contains(e) || points.contains(e),
                    "extremum {} of node {} not inherited by its parent {}",
                    e,
                    child,
                    id
                );
            }
            cursor = c.span().end;
        }
        assert_eq!(cursor, node.span().end, "children must cover the parent span");
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_builds_single_rooted_tree(case in case_strategy()) {
        prop_assume!(!case.hierarchy.is_empty());
        let n = case.values.len();
        let mut builder = Builder::new(BuilderOptions::default())
            .data(case.values.clone())
            .msc(case.base.clone(), case.hierarchy.clone());
        let tree = builder.build().unwrap();

        // Every point exactly once.
        let mut pts = tree.pts().to_vec();
        pts.sort_unstable();
        prop_assert_eq!(pts, (0..n).collect::<Vec<_>>());
        prop_assert_eq!(tree.node(tree.root()).span().len(), n);
        prop_assert_eq!(tree.parent(tree.root()), None);

        let merges = builder.merges();
        prop_assert!(merges.iter().all(|m| (0.0..=1.0).contains(&m.level)));
        prop_assert_eq!(merges.last().map(|m| m.level), Some(1.0));

        validate_tree(&tree, &base_extrema(&case.base));

        let ids: Vec<usize> = tree.preorder().iter().map(|&id| tree.node(id).id()).collect();
        prop_assert_eq!(ids, (0..tree.len()).collect::<Vec<_>>());
    }

    #[test]
    fn prop_simplify_is_idempotent(case in case_strategy()) {
        prop_assume!(!case.hierarchy.is_empty());
        let tree = Builder::new(BuilderOptions::default())
            .data(case.values.clone())
            .msc(case.base, case.hierarchy)
            .build()
            .unwrap();

        let mut again = tree.clone();
        simplify(&mut again.arena, &case.values, again.root);
        prop_assert_eq!(again.preorder(), tree.preorder());
        for id in tree.preorder() {
            prop_assert_eq!(again.children(id), tree.children(id));
            prop_assert_eq!(again.node(id).base_pts(), tree.node(id).base_pts());
        }
    }

    #[test]
    fn prop_cut_tiles_the_buffer(case in case_strategy(), level in 0.0f64..=1.0) {
        prop_assume!(!case.hierarchy.is_empty());
        let tree = Builder::new(BuilderOptions::default())
            .data(case.values.clone())
            .msc(case.base, case.hierarchy)
            .build()
            .unwrap();

        let mut spans: Vec<_> = tree.cut(level).iter().map(|&id| tree.node(id).span()).collect();
        spans.sort_by_key(|s| (s.start, s.end));
        let mut cursor = 0;
        for span in spans {
            prop_assert_eq!(span.start, cursor);
            cursor = span.end;
        }
        prop_assert_eq!(cursor, case.values.len());
    }
}
