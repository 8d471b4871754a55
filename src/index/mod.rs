//! Coverage index core: Hamming metric, BK-tree, union-find, and the
//! tracker that ties them together.
//!
//! # Scope
//! Everything in this module is in-memory, append-only, and single-threaded.
//! The index answers two questions about the stream of 64-bit perceptual
//! fingerprints a fuzzing campaign produces: how many distinct fingerprints
//! have been observed, and how many clusters they form under the
//! Hamming-distance-&le;-R relation. The cluster count is the coverage metric;
//! unlike greedy first-seen counting it depends only on the fingerprint set
//! and the radius, never on arrival order.
//!
//! # Module map
//! - `bktree`: metric-space index supporting radius queries over u64 keys.
//! - `union_find`: disjoint-set forest over dense [`KeyId`]s.
//! - `tracker`: the user-visible monitor combining both.

pub mod bktree;
pub mod tracker;
pub mod union_find;

pub use bktree::{BkTree, MAX_DISTANCE};
pub use tracker::{CoverageTracker, MAX_RADIUS};
pub use union_find::UnionFind;

/// Dense identifier assigned to each distinct fingerprint in insertion order.
///
/// IDs index directly into the union-find forest, keeping the
/// fingerprint-to-ID map and the forest aligned without a second lookup
/// table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyId(pub u32);

impl KeyId {
    /// The ID as a forest slot index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Hamming distance between two 64-bit fingerprints.
///
/// `count_ones` compiles to a single hardware popcount on every target this
/// crate cares about; the traversal loops treat it as constant-time.
#[inline(always)]
pub fn hamming(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}
