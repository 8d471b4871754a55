//! Session-level ingestion: records, trace dedup, and path IDs.
//!
//! A session is one recorded gameplay run, reduced by the external frame
//! pipeline to an ordered trace of 64-bit perceptual fingerprints. This
//! module owns the caller side of the ingestion contract: collapse a trace
//! to its deduplicated coverage set, derive the opaque path ID that names
//! the session, and drive the tracker with it.
//!
//! The path ID is a hash over the *sorted distinct* fingerprints, so it is
//! invariant under frame order and duplication. The core never interprets
//! it; any stable string works.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::index::{BkTree, CoverageTracker};

/// One session's identity and deduplicated fingerprints.
///
/// The JSON wire form is the corpus-file format consumed by the CLI:
/// `{"path_id":"…","fingerprints":[…]}`. Fingerprints are expected to be
/// already deduplicated; exact duplicates are tolerated downstream but waste
/// space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque session fingerprint, typically [`path_id_for`] over the
    /// coverage set.
    pub path_id: String,
    /// The session's distinct frame fingerprints.
    pub fingerprints: Vec<u64>,
}

impl SessionRecord {
    /// Builds a record from an ordered fingerprint trace.
    ///
    /// Applies greedy first-seen dedup at `radius`: a fingerprint is kept
    /// iff no already-kept fingerprint lies within `radius`. This matches
    /// what a frame pipeline produces when it drops near-duplicate frames,
    /// and `radius` should equal the tracker's radius so session coverage
    /// sets stay comparable across runs.
    pub fn from_trace(trace: &[u64], radius: u8) -> Self {
        let mut kept = BkTree::new();
        let mut fingerprints = Vec::new();
        for &fingerprint in trace {
            if kept.any_within(fingerprint, radius) {
                continue;
            }
            kept.insert(fingerprint);
            fingerprints.push(fingerprint);
        }
        let path_id = path_id_for(&fingerprints);
        Self {
            path_id,
            fingerprints,
        }
    }

    /// Feeds this session into `tracker` unless its path ID was already
    /// ingested. Returns `true` iff the session was new.
    ///
    /// Ingesting the same record twice is a no-op the second time: the path
    /// gate short-circuits before any fingerprint is touched.
    pub fn ingest(&self, tracker: &mut CoverageTracker) -> bool {
        if tracker.contains_path(&self.path_id) {
            return false;
        }
        tracker.add_all(self.fingerprints.iter().copied());
        tracker.add_path(self.path_id.clone());
        true
    }
}

/// Derives the opaque path ID for a fingerprint set.
///
/// Sorts and dedups a copy, then hashes the big-endian byte concatenation.
/// The result is a deterministic function of the fingerprint *set*:
/// permuting or duplicating the input does not change it.
pub fn path_id_for(fingerprints: &[u64]) -> String {
    let mut sorted = fingerprints.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut hasher = blake3::Hasher::new();
    for fingerprint in &sorted {
        hasher.update(&fingerprint.to_be_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Parses a plain-text fingerprint listing.
///
/// One hex fingerprint per line, optional `0x` prefix, case-insensitive.
/// Blank lines and `#` comments are skipped. Errors carry the 1-based line
/// number of the offending entry.
pub fn parse_fingerprint_lines(source: &str) -> Result<Vec<u64>, BadFingerprintLine> {
    let mut fingerprints = Vec::new();
    for (index, raw_line) in source.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let digits = line
            .strip_prefix("0x")
            .or_else(|| line.strip_prefix("0X"))
            .unwrap_or(line);
        match u64::from_str_radix(digits, 16) {
            Ok(fingerprint) => fingerprints.push(fingerprint),
            Err(_) => {
                return Err(BadFingerprintLine {
                    line: index + 1,
                    content: line.to_string(),
                })
            }
        }
    }
    Ok(fingerprints)
}

/// A line that failed to parse as a 64-bit hex fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadFingerprintLine {
    /// 1-based line number in the source text.
    pub line: usize,
    /// The offending line, trimmed.
    pub content: String,
}

impl fmt::Display for BadFingerprintLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: not a 64-bit hex fingerprint: {:?}",
            self.line, self.content
        )
    }
}

impl Error for BadFingerprintLine {}
