use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use framecov_rs::BkTree;

const KEY_COUNT: u64 = 10_000;

// Simple xorshift for reproducible random keys.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

fn make_keys(count: usize, seed: u64) -> Vec<u64> {
    let mut rng = XorShift64::new(seed);
    (0..count).map(|_| rng.next_u64()).collect()
}

/// Clustered corpus: a few hundred base keys, each surrounded by variants a
/// couple of bit-flips away. Mimics what perceptual hashes of similar
/// frames look like.
fn make_clustered_keys(count: usize, seed: u64) -> Vec<u64> {
    let mut rng = XorShift64::new(seed);
    let bases = make_keys(count / 32 + 1, seed ^ 0xABCD);
    (0..count)
        .map(|i| {
            let base = bases[i % bases.len()];
            let flip_a = rng.next_u64() % 64;
            let flip_b = rng.next_u64() % 64;
            base ^ (1u64 << flip_a) ^ (1u64 << flip_b)
        })
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("bktree/insert");
    group.throughput(Throughput::Elements(KEY_COUNT));

    let uniform = make_keys(KEY_COUNT as usize, 0xDEAD_BEEF);
    group.bench_function("uniform", |b| {
        b.iter(|| {
            let mut tree = BkTree::new();
            for &key in &uniform {
                black_box(tree.insert(black_box(key)));
            }
            tree
        })
    });

    let clustered = make_clustered_keys(KEY_COUNT as usize, 0xF00D);
    group.bench_function("clustered", |b| {
        b.iter(|| {
            let mut tree = BkTree::new();
            for &key in &clustered {
                black_box(tree.insert(black_box(key)));
            }
            tree
        })
    });

    group.finish();
}

fn bench_find_within(c: &mut Criterion) {
    let mut group = c.benchmark_group("bktree/find_within");

    let keys = make_keys(KEY_COUNT as usize, 0xDEAD_BEEF);
    let mut tree = BkTree::new();
    for &key in &keys {
        tree.insert(key);
    }
    let queries = make_keys(256, 0xC0FF_EE);
    group.throughput(Throughput::Elements(queries.len() as u64));

    for radius in [0u8, 2, 5, 10, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, &radius| {
            b.iter(|| {
                let mut hits = 0usize;
                for &query in &queries {
                    hits += tree.find_within(black_box(query), radius).len();
                }
                hits
            })
        });
    }

    group.finish();
}

fn bench_any_within(c: &mut Criterion) {
    let mut group = c.benchmark_group("bktree/any_within");

    let keys = make_clustered_keys(KEY_COUNT as usize, 0xF00D);
    let mut tree = BkTree::new();
    for &key in &keys {
        tree.insert(key);
    }
    let queries = make_clustered_keys(256, 0xF00D ^ 1);
    group.throughput(Throughput::Elements(queries.len() as u64));

    group.bench_function("radius_5", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for &query in &queries {
                hits += usize::from(tree.any_within(black_box(query), 5));
            }
            hits
        })
    });

    group.finish();
}

criterion_group!(benches, bench_insert, bench_find_within, bench_any_within);
criterion_main!(benches);
