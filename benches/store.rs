//! Benchmarks for the element graph store.
//!
//! Measures:
//! - Bulk node and edge creation
//! - Cascading deletion of a hub with many incident edges of edges
//! - Dictionary reads on a source with many keys

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use stratum::prelude::*;

fn bench_create_chain(c: &mut Criterion) {
    c.bench_function("create_chain_10k", |b| {
        b.iter(|| {
            let mut store = GraphStore::new();
            let mut prev = store.create_node();
            for _ in 0..10_000 {
                let node = store.create_node();
                store.create_edge(prev, node);
                prev = node;
            }
            black_box(store.len())
        });
    });
}

/// Hub with `spokes` edges, each carrying a dictionary label.
fn labelled_hub(spokes: usize) -> (GraphStore, ElementId) {
    let mut store = GraphStore::new();
    let hub = store.create_node();
    for i in 0..spokes {
        let leaf = store.create_value_node(i as i64).unwrap();
        store.create_dict(hub, &format!("k{i}"), leaf);
    }
    (store, hub)
}

fn bench_cascade_delete(c: &mut Criterion) {
    c.bench_function("cascade_delete_hub_5k", |b| {
        b.iter_batched(
            || labelled_hub(5_000),
            |(mut store, hub)| black_box(store.delete_node(hub)),
            BatchSize::LargeInput,
        );
    });
}

fn bench_dict_reads(c: &mut Criterion) {
    let (store, hub) = labelled_hub(1_000);
    c.bench_function("read_dict_last_of_1k", |b| {
        b.iter(|| store.read_dict(black_box(hub), black_box("k999")));
    });
    c.bench_function("read_dict_keys_1k", |b| {
        b.iter(|| store.read_dict_keys(black_box(hub)).map(|keys| keys.len()));
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(10); // smaller sample for speed
    targets = bench_create_chain,
              bench_cascade_delete,
              bench_dict_reads
);
criterion_main!(benches);
