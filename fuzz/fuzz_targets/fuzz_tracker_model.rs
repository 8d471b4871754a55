#![no_main]

use libfuzzer_sys::fuzz_target;

use framecov_rs::{hamming, CoverageTracker};

// Interprets a byte stream as a radius plus a key sequence, feeds the keys
// to `CoverageTracker`, and checks both counts against brute-force ground
// truth over the Hamming-<=-radius graph.
//
// Byte layout:
// - Byte 0 -> radius (clamped to 0..=64)
// - Byte 1 -> key mask width selector (narrow masks force dense clusters)
// - Remaining bytes in chunks of 8 -> big-endian u64 keys
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let radius = data[0] % 65;
    let mask = match data[1] % 4 {
        0 => 0xFF,
        1 => 0xFFFF,
        2 => 0xFFFF_FFFF,
        _ => u64::MAX,
    };

    let mut keys = Vec::new();
    for chunk in data[2..].chunks_exact(8) {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(chunk);
        keys.push(u64::from_be_bytes(raw) & mask);
        if keys.len() >= 64 {
            // Brute force is quadratic; keep the model cheap.
            break;
        }
    }

    let mut tracker = CoverageTracker::new(radius);
    let mut previous_distinct = 0usize;
    for &key in &keys {
        tracker.add(key);
        assert!(
            tracker.distinct_count() >= previous_distinct,
            "distinct_count went backwards"
        );
        assert!(tracker.component_count() <= tracker.distinct_count());
        previous_distinct = tracker.distinct_count();
    }

    // Ground truth: distinct set and connected components.
    let mut distinct = keys.clone();
    distinct.sort_unstable();
    distinct.dedup();
    assert_eq!(tracker.distinct_count(), distinct.len());
    for &key in &distinct {
        assert!(tracker.contains_key(key));
    }

    let n = distinct.len();
    let mut visited = vec![false; n];
    let mut components = 0usize;
    let mut stack = Vec::new();
    for start in 0..n {
        if visited[start] {
            continue;
        }
        components += 1;
        visited[start] = true;
        stack.push(start);
        while let Some(node) = stack.pop() {
            for next in 0..n {
                if !visited[next] && hamming(distinct[node], distinct[next]) <= u32::from(radius)
                {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }
    }
    assert_eq!(
        tracker.component_count(),
        components,
        "component_count diverged from brute force (radius {radius})"
    );
});
