//! Benchmarks for radius search

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use georoute::{FlatIndex, GeoIndex, Point, SpatialIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn create_random_points(n: usize) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..n)
        .map(|_| Point::new(rng.gen_range(46.0..49.0), rng.gen_range(38.0..41.0)))
        .collect()
}

fn benchmark_radius_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("radius_search");
    let center = Point::new(47.5, 39.5);

    for &size in &[1_000, 10_000, 100_000] {
        let points = create_random_points(size);

        let mut flat = FlatIndex::new();
        let mut tree = GeoIndex::new();
        for (i, p) in points.iter().enumerate() {
            flat.insert(*p, i).unwrap();
            tree.insert(*p, i).unwrap();
        }

        group.bench_with_input(BenchmarkId::new("flat", size), &size, |b, _| {
            b.iter(|| flat.search_radius(black_box(&center), black_box(5.0)));
        });

        group.bench_with_input(BenchmarkId::new("avl", size), &size, |b, _| {
            b.iter(|| tree.search_radius(black_box(&center), black_box(5.0)));
        });
    }

    group.finish();
}

fn benchmark_insert(c: &mut Criterion) {
    let points = create_random_points(10_000);

    c.bench_function("avl_insert_10000", |b| {
        b.iter(|| {
            let mut tree = GeoIndex::new();
            for (i, p) in points.iter().enumerate() {
                tree.insert(*p, i).unwrap();
            }
            tree
        });
    });
}

criterion_group!(benches, benchmark_radius_search, benchmark_insert);
criterion_main!(benches);
