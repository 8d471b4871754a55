//! Disjoint-set forest over dense [`KeyId`]s with an O(1) component count.
//!
//! Path compression uses iterative path halving: each element visited during
//! [`UnionFind::find`] is pointed at its grandparent, flattening the walk
//! without recursion or a second pass. Union-by-rank keeps trees shallow;
//! when ranks tie, the lower index becomes the root so representatives are
//! deterministic regardless of the order unions were issued.
//!
//! # Invariants
//! - `parent[i] == i` iff `i` is a root; parent chains terminate (no cycles).
//! - `rank[root]` is an upper bound on that tree's height; union-by-rank
//!   preserves height &le; log2(size), so `rank` never overflows a `u8`.
//! - `components` equals the number of roots.
//!
//! Elements are appended by [`UnionFind::make_set`] and never removed.

use std::cmp::Ordering;

use crate::index::KeyId;

/// Disjoint-set forest with path halving and union-by-rank.
///
/// Amortized O(α(N)) per operation. Out-of-range [`KeyId`]s are a caller
/// bug: lookups panic on the slice bounds check rather than reporting an
/// error.
///
/// # Examples
/// ```
/// use framecov_rs::index::UnionFind;
///
/// let mut uf = UnionFind::new();
/// let a = uf.make_set();
/// let b = uf.make_set();
/// assert_eq!(uf.count(), 2);
/// assert!(uf.union(a, b));
/// assert_eq!(uf.count(), 1);
/// assert!(uf.same(a, b));
/// ```
pub struct UnionFind {
    parent: Vec<u32>,
    rank: Vec<u8>,
    components: usize,
}

impl UnionFind {
    /// Creates an empty forest.
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            rank: Vec::new(),
            components: 0,
        }
    }

    /// Appends a new singleton set and returns its ID.
    ///
    /// IDs are assigned densely: 0, 1, 2, ... in call order.
    pub fn make_set(&mut self) -> KeyId {
        debug_assert!(self.parent.len() < u32::MAX as usize);
        let id = self.parent.len() as u32;
        self.parent.push(id);
        self.rank.push(0);
        self.components += 1;
        KeyId(id)
    }

    /// Returns the representative of `id`'s set.
    ///
    /// Every element visited on the walk is re-pointed at its grandparent
    /// (path halving).
    pub fn find(&mut self, id: KeyId) -> KeyId {
        let mut x = id.index();
        while self.parent[x] as usize != x {
            let grandparent = self.parent[self.parent[x] as usize];
            self.parent[x] = grandparent;
            x = grandparent as usize;
        }
        KeyId(x as u32)
    }

    /// Merges the sets containing `a` and `b`.
    ///
    /// Returns `true` iff an effective merge occurred (the sets were
    /// disjoint); effective merges decrement [`count`](Self::count) by one.
    /// On a rank tie the lower index wins the root, so the representative of
    /// any merge history is independent of union order.
    pub fn union(&mut self, a: KeyId, b: KeyId) -> bool {
        let ra = self.find(a).index();
        let rb = self.find(b).index();
        if ra == rb {
            return false;
        }

        match self.rank[ra].cmp(&self.rank[rb]) {
            Ordering::Less => self.parent[ra] = rb as u32,
            Ordering::Greater => self.parent[rb] = ra as u32,
            Ordering::Equal => {
                let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
                self.parent[child] = root as u32;
                self.rank[root] += 1;
            }
        }
        self.components -= 1;
        true
    }

    /// Returns `true` iff `a` and `b` are in the same set.
    pub fn same(&mut self, a: KeyId, b: KeyId) -> bool {
        self.find(a) == self.find(b)
    }

    /// Current number of disjoint sets. O(1).
    pub fn count(&self) -> usize {
        self.components
    }

    /// Number of elements ever added.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns `true` when the forest holds no elements.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Resets to the empty forest, keeping allocations for reuse.
    pub fn clear(&mut self) {
        self.parent.clear();
        self.rank.clear();
        self.components = 0;
    }
}

impl Default for UnionFind {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_forest() {
        let uf = UnionFind::new();
        assert_eq!(uf.count(), 0);
        assert_eq!(uf.len(), 0);
        assert!(uf.is_empty());
    }

    #[test]
    fn make_set_assigns_dense_ids() {
        let mut uf = UnionFind::new();
        assert_eq!(uf.make_set(), KeyId(0));
        assert_eq!(uf.make_set(), KeyId(1));
        assert_eq!(uf.make_set(), KeyId(2));
        assert_eq!(uf.count(), 3);
        assert_eq!(uf.len(), 3);
    }

    #[test]
    fn singleton_is_its_own_representative() {
        let mut uf = UnionFind::new();
        let a = uf.make_set();
        assert_eq!(uf.find(a), a);
    }

    #[test]
    fn union_merges_and_counts() {
        let mut uf = UnionFind::new();
        let a = uf.make_set();
        let b = uf.make_set();
        let c = uf.make_set();

        assert!(uf.union(a, b));
        assert_eq!(uf.count(), 2);
        assert!(uf.same(a, b));
        assert!(!uf.same(a, c));

        assert!(uf.union(b, c));
        assert_eq!(uf.count(), 1);
        assert!(uf.same(a, c));
    }

    #[test]
    fn union_is_idempotent() {
        let mut uf = UnionFind::new();
        let a = uf.make_set();
        let b = uf.make_set();
        assert!(uf.union(a, b));
        assert!(!uf.union(a, b));
        assert!(!uf.union(b, a));
        assert_eq!(uf.count(), 1);
    }

    #[test]
    fn rank_tie_break_is_deterministic() {
        // Two independent histories over the same merges must agree on the
        // representative.
        let mut uf1 = UnionFind::new();
        let a1 = uf1.make_set();
        let b1 = uf1.make_set();
        uf1.union(a1, b1);

        let mut uf2 = UnionFind::new();
        let a2 = uf2.make_set();
        let b2 = uf2.make_set();
        uf2.union(b2, a2);

        assert_eq!(uf1.find(b1), KeyId(0));
        assert_eq!(uf2.find(b2), KeyId(0));
    }

    #[test]
    fn clear_resets_everything() {
        let mut uf = UnionFind::new();
        let a = uf.make_set();
        let b = uf.make_set();
        uf.union(a, b);
        uf.clear();
        assert!(uf.is_empty());
        assert_eq!(uf.count(), 0);
        // IDs restart from zero after a clear.
        assert_eq!(uf.make_set(), KeyId(0));
    }

    #[test]
    fn long_chain_stays_consistent() {
        let mut uf = UnionFind::new();
        let ids: Vec<KeyId> = (0..100).map(|_| uf.make_set()).collect();
        for pair in ids.windows(2) {
            uf.union(pair[0], pair[1]);
        }
        assert_eq!(uf.count(), 1);
        let root = uf.find(ids[0]);
        for &id in &ids {
            assert_eq!(uf.find(id), root);
        }
    }
}
