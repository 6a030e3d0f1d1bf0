/// Statistics kernel benchmarks
///
/// Measures rank correlation, quartile binning and the one-way ANOVA at
/// table sizes typical of a multi-chain export.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ytaudit::stats::{one_way_anova, qcut, spearman};

/// Deterministic pseudo-random series in [0, 1)
fn series(n: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 11) as f64 / (1u64 << 53) as f64
        })
        .collect()
}

fn bench_spearman(c: &mut Criterion) {
    let mut group = c.benchmark_group("spearman");

    for size in [1_000usize, 10_000, 50_000] {
        let x = series(size, 7);
        let y = series(size, 11);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| spearman(black_box(&x), black_box(&y)));
        });
    }

    group.finish();
}

fn bench_qcut(c: &mut Criterion) {
    let mut group = c.benchmark_group("qcut_quartiles");

    for size in [1_000usize, 10_000, 50_000] {
        let values = series(size, 3);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| qcut(black_box(&values), 4));
        });
    }

    group.finish();
}

fn bench_anova(c: &mut Criterion) {
    let groups: Vec<Vec<f64>> = (0..8).map(|g| series(2_000, g + 1)).collect();

    c.bench_function("one_way_anova_8x2000", |b| {
        b.iter(|| one_way_anova(black_box(&groups)));
    });
}

criterion_group!(benches, bench_spearman, bench_qcut, bench_anova);
criterion_main!(benches);
