//! Benchmarks for gap detection, splitting and classification
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{GrayImage, Luma};
use webtoon_cut::{GapDetector, GapOptions, RatioSplitter, SplitOptions, TextTypeClassifier};

/// Webtoon-like strip: textured panels separated by white gutters
fn generate_strip(width: u32, height: u32) -> GrayImage {
    let mut img = GrayImage::from_pixel(width, height, Luma([255]));
    for y in 0..height {
        // 600px panel, 80px gutter
        if y % 680 >= 600 {
            continue;
        }
        for x in 0..width {
            img.put_pixel(x, y, Luma([((x * 31 + y * 17) % 200) as u8]));
        }
    }
    img
}

fn bench_gap_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("gap_detection");
    let options = GapOptions::default();

    for height in [2_000u32, 10_000, 30_000] {
        let img = generate_strip(800, height);
        group.throughput(Throughput::Elements(u64::from(800 * height)));
        group.bench_with_input(BenchmarkId::new("detect", format!("800x{}", height)), &img, |b, img| {
            b.iter(|| GapDetector::detect(black_box(img), black_box(&options)));
        });
    }

    group.finish();
}

fn bench_ratio_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("ratio_split");
    let options = SplitOptions::default();

    for height in [10_000u32, 30_000] {
        let gaps = GapDetector::detect(&generate_strip(800, height), &options.gap);
        group.bench_with_input(BenchmarkId::new("split", height), &gaps, |b, gaps| {
            b.iter(|| RatioSplitter::split(black_box(height), 800, black_box(gaps), &options));
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let classifier = TextTypeClassifier::new().unwrap();
    let samples = ["쿵쿵", "안녕하세요", "제12화", "ㅋㅋ 진짜?", "SALE", "문이 덜컹하고 열렸어요"];

    c.bench_function("classify_mixed", |b| {
        b.iter(|| {
            for text in samples {
                black_box(classifier.classify(black_box(text), false));
            }
        });
    });
}

criterion_group!(benches, bench_gap_detection, bench_ratio_split, bench_classify);
criterion_main!(benches);
