use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::TempDir;
use tilegraph::{BucketQueue, GraphId, TileArchiveBuilder, TileStore};

/// Pseudo-random costs spread over several queue windows.
fn costs(n: u32) -> Vec<f32> {
    (0..n)
        .map(|i| (i.wrapping_mul(2_654_435_761) % 100_000) as f32 * 0.01)
        .collect()
}

fn bench_add_pop(c: &mut Criterion) {
    let costs = costs(10_000);
    let mut queue = BucketQueue::new(0.0, 200.0, 1.0, |l: u32| costs[l as usize]);

    c.bench_function("bucket_queue_add_pop_10k", |b| {
        b.iter(|| {
            queue.clear();
            for (label, &cost) in costs.iter().enumerate() {
                queue.add(label as u32, cost);
            }
            while let Some(label) = queue.pop() {
                black_box(label);
            }
        });
    });
}

fn bench_decrease(c: &mut Criterion) {
    let costs = costs(10_000);
    let mut queue = BucketQueue::new(0.0, 200.0, 1.0, |l: u32| costs[l as usize]);

    c.bench_function("bucket_queue_decrease_10k", |b| {
        b.iter(|| {
            queue.clear();
            for (label, &cost) in costs.iter().enumerate() {
                queue.add(label as u32, cost);
            }
            for (label, &cost) in costs.iter().enumerate() {
                queue.decrease(label as u32, cost * 0.5, cost);
            }
            black_box(queue.len());
        });
    });
}

fn bench_resolve_tile(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("graph.tgr");

    let mut builder = TileArchiveBuilder::new();
    for tile in 0..4096 {
        builder.add_tile(GraphId::new(2, tile, 0), vec![0u8; 64]);
    }
    builder.write_to(&path).unwrap();
    let store = TileStore::from_path(&path).unwrap();

    c.bench_function("resolve_tile", |b| {
        let mut tile = 0u32;
        b.iter(|| {
            tile = (tile + 1) % 5000;
            black_box(store.resolve_tile(black_box(GraphId::new(2, tile, 7))));
        });
    });
}

criterion_group!(benches, bench_add_pop, bench_decrease, bench_resolve_tile);
criterion_main!(benches);
