#![no_main]

use libfuzzer_sys::fuzz_target;

use framecov_rs::{hamming, BkTree};

// Builds a BK-tree from a byte stream and checks a radius query against the
// brute-force scan of the same keys.
//
// Byte layout:
// - Byte 0 -> query radius (clamped to 0..=64)
// - Bytes 1..9 -> big-endian u64 query key
// - Remaining bytes in chunks of 8 -> big-endian u64 keys to insert
fuzz_target!(|data: &[u8]| {
    if data.len() < 9 {
        return;
    }

    let radius = data[0] % 65;
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&data[1..9]);
    let query = u64::from_be_bytes(raw);

    let mut tree = BkTree::new();
    let mut keys = Vec::new();
    for chunk in data[9..].chunks_exact(8) {
        raw.copy_from_slice(chunk);
        let key = u64::from_be_bytes(raw);
        let inserted = tree.insert(key);
        assert_eq!(inserted, !keys.contains(&key), "insert() duplicate report");
        if inserted {
            keys.push(key);
        }
    }
    assert_eq!(tree.len(), keys.len());

    let mut got = tree.find_within(query, radius);
    got.sort_unstable();
    let mut expected: Vec<u64> = keys
        .iter()
        .copied()
        .filter(|&k| hamming(query, k) <= u32::from(radius))
        .collect();
    expected.sort_unstable();
    assert_eq!(got, expected, "find_within diverged from brute force");

    assert_eq!(
        tree.any_within(query, radius),
        !expected.is_empty(),
        "any_within diverged from find_within"
    );
});
