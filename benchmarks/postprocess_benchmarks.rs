//! Criterion-based performance benchmarks
//!
//! Measures the suppression hot path and the full pipeline on synthetic
//! detector output of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nominal_detect::{
    suppress, BoundingBox, Candidate, CatalogPreset, DetectionPipeline, NominalCatalog,
    RawDetections, TieBreak,
};

/// Banknote-sized boxes on a grid, every other one duplicated with a small offset
fn synthetic_candidates(count: usize) -> Vec<Candidate> {
    let mut seed = 12345u32;
    (0..count)
        .map(|i| {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            let jitter = (seed % 7) as f32;
            let slot = (i / 2) as f32;
            let x = (slot % 8.0) * 150.0 + if i % 2 == 1 { jitter } else { 0.0 };
            let y = (slot / 8.0).floor() * 80.0;
            let confidence = 0.4 + (seed % 60) as f32 / 100.0;
            Candidate::new(
                BoundingBox::new(x, y, x + 120.0, y + 60.0),
                confidence,
                (i % 7) as i32,
            )
        })
        .collect()
}

fn bench_suppression(c: &mut Criterion) {
    let mut group = c.benchmark_group("suppression");
    let catalog = NominalCatalog::from_preset(CatalogPreset::Yolo);

    for count in [4usize, 16, 64, 256] {
        let candidates = synthetic_candidates(count);
        group.throughput(Throughput::Elements(count as u64));

        for tie_break in [TieBreak::FirstWins, TieBreak::HighestConfidence] {
            group.bench_with_input(
                BenchmarkId::new(tie_break.to_string(), count),
                &candidates,
                |b, candidates| {
                    b.iter(|| suppress(black_box(candidates), &catalog, 0.5, tie_break));
                },
            );
        }
    }
    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let pipeline =
        DetectionPipeline::new(NominalCatalog::from_preset(CatalogPreset::Yolo), 0.5, 0.5)
            .expect("valid thresholds");

    for count in [4usize, 32, 128] {
        let raw = RawDetections::from_candidates(&synthetic_candidates(count));
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &raw, |b, raw| {
            b.iter(|| pipeline.run(black_box(raw)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_suppression, bench_full_pipeline);

criterion_main!(benches);
