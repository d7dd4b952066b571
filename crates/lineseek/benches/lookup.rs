//! Benchmarks for point lookups and range scans
//!
//! Run with:
//! ```bash
//! cargo bench --bench lookup
//! ```

#![allow(clippy::expect_used)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lineseek::{SearchConfig, SeparatedCodec, SortedFile};
use std::hint::black_box;
use std::io::{BufWriter, Write};
use tempfile::NamedTempFile;

/// Write `count` sorted records, each key repeated `run` times
fn generate_file(count: u64, run: u64) -> NamedTempFile {
    let file = NamedTempFile::new().expect("Failed to create benchmark file");
    let mut writer = BufWriter::new(file.as_file());
    for key in 0..count {
        for i in 0..run {
            writeln!(writer, "{}:payload-{key}-{i}-ABCABCABC", key * 3)
                .expect("Failed to write benchmark record");
        }
    }
    writer.flush().expect("Failed to flush benchmark file");
    drop(writer);
    file
}

fn bench_find_unique(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_unique");

    for count in [1_000u64, 100_000, 1_000_000] {
        let file = generate_file(count, 1);
        let mut sorted = SortedFile::open(
            file.path(),
            SeparatedCodec::<u64, String>::default(),
            SearchConfig::default(),
        )
        .expect("Failed to open benchmark file");

        group.bench_with_input(BenchmarkId::new("hit", count), &count, |b, &count| {
            let mut key = 0;
            b.iter(|| {
                key = (key + 7919) % count;
                black_box(sorted.find_value(&(key * 3)).ok())
            });
        });

        group.bench_with_input(BenchmarkId::new("miss", count), &count, |b, &count| {
            let mut key = 0;
            b.iter(|| {
                key = (key + 7919) % count;
                black_box(sorted.find_value(&(key * 3 + 1)).ok())
            });
        });
    }

    group.finish();
}

fn bench_find_duplicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_duplicates");

    for run in [1u64, 8, 64] {
        let file = generate_file(10_000, run);
        let mut sorted = SortedFile::open(
            file.path(),
            SeparatedCodec::<u64, String>::default(),
            SearchConfig::default().with_unique(false),
        )
        .expect("Failed to open benchmark file");

        group.bench_with_input(BenchmarkId::new("run", run), &run, |b, _| {
            let mut key = 0;
            b.iter(|| {
                key = (key + 7919) % 10_000;
                black_box(sorted.find_all(&(key * 3)).map(|r| r.len()).ok())
            });
        });
    }

    group.finish();
}

fn bench_between(c: &mut Criterion) {
    let file = generate_file(100_000, 1);
    let mut sorted = SortedFile::open(
        file.path(),
        SeparatedCodec::<u64, String>::default(),
        SearchConfig::default(),
    )
    .expect("Failed to open benchmark file");

    let mut group = c.benchmark_group("between");
    for width in [10u64, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("width", width), &width, |b, &width| {
            b.iter(|| {
                black_box(
                    sorted
                        .between(&150_000, &(150_000 + width * 3))
                        .map(|r| r.len())
                        .ok(),
                )
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_find_unique,
    bench_find_duplicates,
    bench_between
);
criterion_main!(benches);
