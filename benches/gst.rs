use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use suffix_index::GeneralizedSuffixTree;

/// Generate synthetic keys with some repeated fragments so the tree gets
/// realistic sharing between keys.
fn generate_keys(n: usize, key_len: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(42);
    let alphabet = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];
    let mut keys = Vec::with_capacity(n);

    for _ in 0..n {
        let key: String = (0..key_len)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();
        keys.push(key);
    }

    // splice a shared fragment into half of the keys
    for i in 0..n / 2 {
        if i + 1 < n {
            let fragment = keys[i][..key_len.min(12)].to_string();
            keys[i + 1].replace_range(0..fragment.len(), &fragment);
        }
    }

    keys
}

fn build_tree(keys: &[String]) -> GeneralizedSuffixTree<usize> {
    let mut tree = GeneralizedSuffixTree::new();
    for (i, key) in keys.iter().enumerate() {
        tree.insert(key, i);
    }
    tree
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for n in [100, 500, 1000] {
        let keys = generate_keys(n, 40);
        group.bench_with_input(BenchmarkId::new("insert_keys", n), &keys, |b, keys| {
            b.iter(|| build_tree(black_box(keys)));
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    let keys = generate_keys(1000, 40);
    let tree = build_tree(&keys);

    let mut rng = StdRng::seed_from_u64(7);
    let queries: Vec<String> = (0..100)
        .map(|_| {
            let key = &keys[rng.gen_range(0..keys.len())];
            let start = rng.gen_range(0..key.len() - 4);
            key[start..start + 4].to_string()
        })
        .collect();

    group.bench_function("hundred_short_queries", |b| {
        b.iter(|| {
            for query in &queries {
                black_box(tree.search(black_box(query)));
            }
        });
    });

    group.bench_function("whole_key_query", |b| {
        b.iter(|| black_box(tree.search(black_box(&keys[0]))));
    });

    group.finish();
}

fn bench_common_substrings(c: &mut Criterion) {
    let mut group = c.benchmark_group("common_substrings");
    group.sample_size(20);

    for n in [50, 100] {
        let keys = generate_keys(n, 40);
        let tree = build_tree(&keys);
        group.bench_with_input(BenchmarkId::new("min_len_6_min_keys_2", n), &tree, |b, tree| {
            b.iter(|| {
                let mut emitted = 0usize;
                tree.common_substrings(6, 2, |_, _| emitted += 1).unwrap();
                black_box(emitted)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_construction, bench_search, bench_common_substrings);
criterion_main!(benches);
