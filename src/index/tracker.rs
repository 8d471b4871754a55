//! The coverage monitor: BK-tree + union-find behind one mutation point.
//!
//! Every distinct fingerprint gets a dense [`KeyId`]; the BK-tree answers
//! "who is within R of this key" and the union-find folds those answers into
//! connected components. The component count is the coverage metric: it
//! depends only on the set of fingerprints and the radius, never on the
//! order `add` calls arrive in.
//!
//! # Invariants
//! - `key_to_id.len() == bktree.len() == uf.len()` after every call.
//! - IDs are allocated 0, 1, 2, ... in insertion order and index directly
//!   into the forest.
//! - For any two tracked keys at Hamming distance &le; `radius`, their IDs
//!   share a union-find representative.
//!
//! # Design Notes
//! - `add` queries neighbours *before* inserting the key, so the new key can
//!   never match itself and no self-union is needed.
//! - All steps of `add` are infallible in-memory operations; a call either
//!   completes or the allocator aborts, so partial state is not observable.

use ahash::{AHashMap, AHashSet};

use crate::index::{BkTree, KeyId, UnionFind};

/// Largest permitted clustering radius; distances above 64 cannot occur
/// between 64-bit keys.
pub const MAX_RADIUS: u8 = 64;

/// Order-independent coverage monitor over 64-bit perceptual fingerprints.
///
/// # Guarantees
/// - [`distinct_count`](Self::distinct_count) is monotonically
///   non-decreasing and counts exact-distinct fingerprints.
/// - [`component_count`](Self::component_count) equals the number of
///   connected components of the graph whose vertices are the tracked keys
///   and whose edges join pairs at Hamming distance &le; the radius. It may
///   decrease when a new key bridges previously separate components.
/// - Exact duplicates are no-ops.
///
/// A tracker is single-threaded; independent instances are fully
/// independent. Callers that parallelize fingerprint extraction should
/// funnel results through a single writer.
///
/// # Examples
/// ```
/// use framecov_rs::index::CoverageTracker;
///
/// let mut tracker = CoverageTracker::new(2);
/// tracker.add(0b0000);
/// tracker.add(0b0001); // distance 1: same cluster
/// tracker.add(0b1111_0000); // far away: new cluster
/// assert_eq!(tracker.distinct_count(), 3);
/// assert_eq!(tracker.component_count(), 2);
/// ```
pub struct CoverageTracker {
    radius: u8,
    key_to_id: AHashMap<u64, KeyId>,
    bktree: BkTree,
    uf: UnionFind,
    path_seen: AHashSet<String>,
}

impl CoverageTracker {
    /// Creates an empty tracker clustering at the given radius.
    ///
    /// The radius is clamped to `0..=64`; it is fixed for the lifetime of
    /// the tracker so counts stay comparable across sessions.
    pub fn new(radius: u8) -> Self {
        Self {
            radius: radius.min(MAX_RADIUS),
            key_to_id: AHashMap::new(),
            bktree: BkTree::new(),
            uf: UnionFind::new(),
            path_seen: AHashSet::new(),
        }
    }

    /// Adds one fingerprint; returns `true` iff it was new.
    ///
    /// # Effects
    /// - Exact duplicates change nothing and return `false`.
    /// - A new key is assigned the next dense ID, indexed in the BK-tree,
    ///   and unioned with every existing key within the radius.
    pub fn add(&mut self, key: u64) -> bool {
        if self.key_to_id.contains_key(&key) {
            return false;
        }

        // Neighbour query runs before the insert so the key cannot match
        // itself; every returned neighbour already has an ID.
        let neighbours = self.bktree.find_within(key, self.radius);

        let id = self.uf.make_set();
        self.key_to_id.insert(key, id);
        let inserted = self.bktree.insert(key);
        debug_assert!(inserted);
        debug_assert_eq!(self.key_to_id.len(), self.bktree.len());
        debug_assert_eq!(self.bktree.len(), self.uf.len());

        for neighbour in neighbours {
            let neighbour_id = self.key_to_id[&neighbour];
            self.uf.union(id, neighbour_id);
        }
        true
    }

    /// Adds every fingerprint in `keys`. Equivalent to repeated
    /// [`add`](Self::add).
    pub fn add_all<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = u64>,
    {
        for key in keys {
            self.add(key);
        }
    }

    /// Records an opaque session path ID; returns `true` iff it was new.
    ///
    /// Path IDs exist only to let callers skip already-ingested sessions;
    /// they have no bearing on the clustering metric.
    pub fn add_path(&mut self, path_id: impl Into<String>) -> bool {
        self.path_seen.insert(path_id.into())
    }

    /// Whether a session path ID has been recorded.
    pub fn contains_path(&self, path_id: &str) -> bool {
        self.path_seen.contains(path_id)
    }

    /// Exact-match membership test over the index.
    pub fn contains_key(&self, key: u64) -> bool {
        self.key_to_id.contains_key(&key)
    }

    /// The coverage metric: number of Hamming-&le;-radius clusters.
    pub fn component_count(&self) -> usize {
        self.uf.count()
    }

    /// Number of distinct fingerprints ever added. Never decreases.
    pub fn distinct_count(&self) -> usize {
        self.bktree.len()
    }

    /// The clustering radius fixed at construction.
    pub fn radius(&self) -> u8 {
        self.radius
    }

    /// Returns `true` when no fingerprints have been added.
    pub fn is_empty(&self) -> bool {
        self.key_to_id.is_empty()
    }

    /// All tracked fingerprints in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.bktree.keys()
    }

    /// Returns to the empty state, keeping the radius and allocations.
    pub fn reset(&mut self) {
        self.key_to_id.clear();
        self.bktree.clear();
        self.uf.clear();
        self.path_seen.clear();
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tracker_tests;
