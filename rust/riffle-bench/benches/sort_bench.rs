//! Criterion benchmarks for the shell sorter.
//!
//! Measures sequential throughput across input sizes and the fork-join
//! parallel variant across thread counts, on all three input families.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use riffle_core::{sort_sequential, ShellSorter};
use riffle_rt::{DataSource, PartiallySortedSource, ReversedSource, UniformSource};

fn bench_sequential_sizes(c: &mut Criterion) {
    let sizes = [1_000usize, 10_000, 100_000];
    let mut group = c.benchmark_group("shell_sort_sequential");

    for size in sizes {
        let input = UniformSource.generate(size, 42);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let mut data = input.clone();
                sort_sequential(black_box(&mut data));
            });
        });
    }

    group.finish();
}

fn bench_parallel_threads(c: &mut Criterion) {
    let size = 100_000usize;
    let input = UniformSource.generate(size, 42);
    let mut group = c.benchmark_group("shell_sort_parallel");
    group.throughput(Throughput::Elements(size as u64));

    for threads in [2usize, 4, 8] {
        let sorter = ShellSorter::new(threads);
        group.bench_with_input(BenchmarkId::new("threads", threads), &threads, |b, _| {
            b.iter(|| {
                let mut data = input.clone();
                sorter.sort(black_box(&mut data));
            });
        });
    }

    group.finish();
}

fn bench_input_families(c: &mut Criterion) {
    let size = 50_000usize;
    let inputs: [(&str, Vec<i32>); 3] = [
        ("uniform", UniformSource.generate(size, 42)),
        ("reversed", ReversedSource.generate(size, 42)),
        ("partial", PartiallySortedSource.generate(size, 42)),
    ];
    let mut group = c.benchmark_group("shell_sort_input_families");
    group.throughput(Throughput::Elements(size as u64));

    for (name, input) in &inputs {
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, input| {
            b.iter(|| {
                let mut data = input.clone();
                sort_sequential(black_box(&mut data));
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_sequential_sizes,
    bench_parallel_threads,
    bench_input_families
);
criterion_main!(benches);
