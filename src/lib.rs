//! Visual state-space coverage for game fuzzing.
//!
//! A fuzzer that plays a game records sessions; an external frame pipeline
//! reduces every recorded frame to a 64-bit perceptual hash. This crate is
//! the coverage index those fingerprints flow into: it maintains the set of
//! distinct fingerprints and their clustering under the
//! Hamming-distance-&le;-R relation, and reports the number of clusters as
//! the coverage metric, the visual analogue of edge coverage.
//!
//! The metric is monotonic in distinct observations, idempotent, and
//! order-independent: any permutation of the same fingerprint multiset
//! yields the same counts, which is what makes runs and campaigns
//! comparable and mergeable.
//!
//! High-level flow (one session):
//! 1) The frame pipeline emits deduplicated fingerprints plus an opaque
//!    session path ID.
//! 2) [`SessionRecord::ingest`] skips the session if its path ID was seen,
//!    otherwise feeds every fingerprint to [`CoverageTracker::add`].
//! 3) Each new fingerprint is indexed in a BK-tree and unioned with every
//!    existing fingerprint within the radius.
//! 4) [`CoverageTracker::component_count`] and
//!    [`CoverageTracker::distinct_count`] are readable at any time.
//!
//! Video decoding, perceptual hashing, and panorama stitching live outside
//! this crate; the index is in-memory, append-only, and single-process.

pub mod cli;
pub mod greedy;
pub mod index;
pub mod report;
pub mod session;
#[cfg(test)]
pub mod test_utils;

pub use greedy::GreedyMonitor;
pub use index::{hamming, BkTree, CoverageTracker, KeyId, UnionFind};
pub use session::{parse_fingerprint_lines, path_id_for, SessionRecord};
