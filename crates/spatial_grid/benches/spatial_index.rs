use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use cellgrid_spatial_grid::*;

const OBJECT_COUNT: u32 = 5000;
const WORLD_SIZE: f64 = 4000.0;

fn build_index(rng: &mut SmallRng) -> SpatialIndex<u32> {
    let mut index = SpatialIndex::default();
    for i in 0..OBJECT_COUNT {
        let x = rng.gen_range(0.0..WORLD_SIZE);
        let y = rng.gen_range(0.0..WORLD_SIZE);
        let w = rng.gen_range(4.0..48.0);
        let h = rng.gen_range(4.0..48.0);
        index.add(i, x, y, w, h).unwrap();
    }
    index
}

/// Every object moves a couple of units, as it would in one frame of a game.
fn jitter_all(index: &mut SpatialIndex<u32>, rng: &mut SmallRng) {
    for i in 0..OBJECT_COUNT {
        let b = index.get_bbox(&i).unwrap();
        let dx = rng.gen_range(-3.0..3.0);
        let dy = rng.gen_range(-3.0..3.0);
        index.update(&i, b.x + dx, b.y + dy, b.w, b.h).unwrap();
    }
}

fn sweep_viewports(index: &mut SpatialIndex<u32>) {
    let mut y = 0.0;
    while y < WORLD_SIZE {
        let mut x = 0.0;
        while x < WORLD_SIZE {
            let found = index.query(x, y, 800.0, 600.0).unwrap();
            black_box(found.len());
            index.recycle(found);
            x += 400.0;
        }
        y += 300.0;
    }
}

pub fn benchmarks(c: &mut Criterion) {
    cellgrid_logging::log_to_stderr();

    c.bench_function("bulk_add", |b| {
        b.iter_batched(
            || SmallRng::seed_from_u64(1),
            |mut rng| build_index(&mut rng),
            BatchSize::SmallInput,
        )
    });

    c.bench_function("frame_update", |b| {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut index = build_index(&mut rng);
        b.iter(|| jitter_all(&mut index, &mut rng))
    });

    c.bench_function("viewport_queries", |b| {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut index = build_index(&mut rng);
        b.iter(|| sweep_viewports(&mut index))
    });
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
