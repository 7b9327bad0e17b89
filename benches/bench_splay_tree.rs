use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use splay_collections::splay_tree::SplayMap;
use std::collections::BTreeMap;

const NUM_OF_OPERATIONS: usize = 100;

fn random_entries() -> Vec<(u32, u32)> {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    (0..NUM_OF_OPERATIONS)
        .map(|_| (rng.next_u32(), rng.next_u32()))
        .collect()
}

fn bench_btreemap_insert(c: &mut Criterion) {
    let entries = random_entries();
    c.bench_function("bench btreemap insert", move |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &(key, val) in &entries {
                map.insert(key, val);
            }
        })
    });
}

fn bench_btreemap_get(c: &mut Criterion) {
    let entries = random_entries();
    let map = entries.iter().cloned().collect::<BTreeMap<u32, u32>>();
    c.bench_function("bench btreemap get", move |b| {
        b.iter(|| {
            for (key, _) in &entries {
                black_box(map.get(key));
            }
        })
    });
}

fn bench_splay_map_insert(c: &mut Criterion) {
    let entries = random_entries();
    c.bench_function("bench splay map insert", move |b| {
        b.iter(|| {
            let mut map = SplayMap::new();
            for &(key, val) in &entries {
                black_box(map.insert(key, val).ok());
            }
        })
    });
}

fn bench_splay_map_get(c: &mut Criterion) {
    let entries = random_entries();
    let mut map = SplayMap::new();
    for &(key, val) in &entries {
        map.insert(key, val).ok();
    }
    c.bench_function("bench splay map get", move |b| {
        b.iter(|| {
            for (key, _) in &entries {
                black_box(map.get(key));
            }
        })
    });
}

fn bench_splay_map_get_repeated(c: &mut Criterion) {
    let entries = random_entries();
    let mut map = SplayMap::new();
    for &(key, val) in &entries {
        map.insert(key, val).ok();
    }
    let hot = entries[..NUM_OF_OPERATIONS / 10]
        .iter()
        .map(|&(key, _)| key)
        .collect::<Vec<u32>>();
    c.bench_function("bench splay map get repeated", move |b| {
        b.iter(|| {
            for key in hot.iter().cycle().take(NUM_OF_OPERATIONS) {
                black_box(map.get(key));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_btreemap_insert,
    bench_btreemap_get,
    bench_splay_map_insert,
    bench_splay_map_get,
    bench_splay_map_get_repeated
);
criterion_main!(benches);
