//! Redirection table from absorbed extrema to their surviving representative.
//!
//! A union-find over extremum indices with path compression. Only roots are
//! ever redirected, so the table stays a forest.

use rustc_hash::FxHashMap;

use crate::tree::PointIdx;

#[derive(Debug, Clone, Default)]
pub(crate) struct Redirects {
    parent: FxHashMap<PointIdx, PointIdx>,
}

impl Redirects {
    pub(crate) fn clear(&mut self) {
        self.parent.clear();
    }

    /// Current representative of `key`. Compresses the visited path.
    pub(crate) fn find(&mut self, key: PointIdx) -> PointIdx {
        let mut root = key;
        while let Some(&next) = self.parent.get(&root) {
            root = next;
        }

        let mut current = key;
        while current != root {
            // Every non-root on the path has an entry.
            let next = self.parent.insert(current, root).unwrap_or(root);
            current = next;
        }
        root
    }

    /// Records that the representative `from` is absorbed into `to`.
    pub(crate) fn redirect(&mut self, from: PointIdx, to: PointIdx) {
        debug_assert!(!self.parent.contains_key(&from), "Redirecting non-root extremum {}", from);
        self.parent.insert(from, to);
    }

    pub(crate) fn len(&self) -> usize {
        self.parent.len()
    }
}
