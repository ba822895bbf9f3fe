//! Branch-and-bound vs exhaustive benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use georoute::{solve_exhaustive, CostMatrix, RouteSolver};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_matrix(n: usize, seed: u64) -> CostMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let rows = (0..n)
        .map(|_| (0..n).map(|_| rng.gen_range(1.0..100.0)).collect())
        .collect();
    CostMatrix::from_rows(rows).unwrap()
}

fn benchmark_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    group.sample_size(20);

    for &n in &[6, 8, 10] {
        let matrix = random_matrix(n, n as u64);

        group.bench_with_input(BenchmarkId::new("branch_and_bound", n), &n, |b, _| {
            b.iter(|| RouteSolver::new().solve(black_box(&matrix)).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("exhaustive", n), &n, |b, _| {
            b.iter(|| solve_exhaustive(black_box(&matrix)).unwrap());
        });
    }

    group.finish();
}

fn benchmark_solver_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_scaling");
    group.sample_size(10);

    for &n in &[12, 14] {
        let matrix = random_matrix(n, 42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| RouteSolver::new().solve(black_box(&matrix)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_solver, benchmark_solver_scaling);
criterion_main!(benches);
