//! Benchmarks for exampaper layout and export.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use exampaper::edit::{HtmlCodec, StructuredCodec};
use exampaper::{build_blocks, render, wrap_text, DocumentMetadata, LayoutOptions, LineFormat};

/// Creates `count` synthetic question texts with a few option lines each.
fn create_texts(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            format!(
                "Question {} asks about a long topic that needs more than one printed line to fit on the page\n\
                 a) first option\nb) second option\nc) third option\nd) fourth option\n(2 marks)",
                i + 1
            )
        })
        .collect()
}

/// Benchmark line wrapping.
fn bench_wrap(c: &mut Criterion) {
    let line = "The quick brown fox jumps over the lazy dog. ".repeat(20);

    c.bench_function("wrap_long_line", |b| {
        b.iter(|| wrap_text(black_box(&line), 11.0, 170.0));
    });
}

/// Benchmark pagination at various sizes.
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let metadata = DocumentMetadata::default();
    let options = LayoutOptions::default();

    for count in [4, 40, 400].iter() {
        let blocks = build_blocks(&create_texts(*count), &LineFormat::default());

        group.bench_function(format!("{}_blocks", count), |b| {
            b.iter(|| render(black_box(&blocks), &metadata, &options));
        });
    }

    group.finish();
}

/// Benchmark the editor markup round trip.
fn bench_codec(c: &mut Criterion) {
    let codec = HtmlCodec::new();
    let blocks = build_blocks(&create_texts(1), &LineFormat::default());
    let html = codec.serialize(&blocks[0]);

    c.bench_function("codec_serialize", |b| {
        b.iter(|| codec.serialize(black_box(&blocks[0])));
    });

    c.bench_function("codec_deserialize", |b| {
        b.iter(|| codec.deserialize(black_box(&html), 0, 11.0).unwrap());
    });
}

/// Benchmark PDF generation.
fn bench_pdf(c: &mut Criterion) {
    let paper = exampaper::build_paper(DocumentMetadata::default(), &create_texts(20));

    c.bench_function("pdf_20_blocks", |b| {
        b.iter(|| exampaper::paper_to_pdf(black_box(&paper)).unwrap());
    });
}

criterion_group!(benches, bench_wrap, bench_render, bench_codec, bench_pdf);
criterion_main!(benches);
