//! Criterion benchmarks for the k-way merge.
//!
//! Sweeps the section count through both selection strategies (linear scan
//! below the heap threshold, binary heap above it).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use riffle_core::merge_sections;
use riffle_rt::{DataSource, UniformSource};

/// Build a buffer of `count` independently sorted sections covering
/// `total` elements.
fn sectioned_buffer(total: usize, count: usize) -> Vec<i32> {
    let size = total / count;
    let mut buffer = UniformSource.generate(total, 7);
    for s in 0..count {
        buffer[s * size..(s + 1) * size].sort_unstable();
    }
    buffer
}

fn bench_section_counts(c: &mut Criterion) {
    let total = 1usize << 18;
    let mut group = c.benchmark_group("merge_sections");
    group.throughput(Throughput::Elements(total as u64));

    for count in [2usize, 4, 8, 16, 32] {
        let buffer = sectioned_buffer(total, count);
        let size = total / count;
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| merge_sections(black_box(&buffer), count, size).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_section_counts);
criterion_main!(benches);
