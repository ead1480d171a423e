//! Benchmark release-name parsing and filename normalization throughput.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sift_parser::{LanguageTable, Normalizer};

const INPUTS: &[(&str, &str)] = &[
    ("simple_movie", "The.Matrix.1999.1080p.BluRay.x264-GROUP.mkv"),
    (
        "4k_hdr",
        "Movie.2023.2160p.BluRay.Remux.HDR.DV.TrueHD.7.1.Atmos.HEVC-FraMeSToR.mkv",
    ),
    ("tv_episode", "Breaking.Bad.S01E01.720p.WEB-DL.DD5.1.H.264-DEMAND.mkv"),
    (
        "subtitle_with_flags",
        "My.Movie.2023.BluRay.x264-GRP.pt-BR.sdh.forced.srt",
    ),
    (
        "long_complex",
        "The.Lord.of.the.Rings.The.Return.of.the.King.2003.EXTENDED.2160p.BluRay.x265.HDR10.DTS-HD.MA.6.1-SWTYBLZ.mkv",
    ),
];

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");
    for (name, input) in INPUTS {
        group.bench_function(*name, |b| {
            b.iter(|| sift_parser::parse(black_box(input)));
        });
    }
    group.finish();
}

fn bench_normalizer(c: &mut Criterion) {
    let normalizer = Normalizer::new(Arc::new(LanguageTable::build()));
    let mut group = c.benchmark_group("normalize");
    for (name, input) in INPUTS {
        group.bench_function(*name, |b| {
            b.iter(|| normalizer.normalize(black_box(input)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parser, bench_normalizer);
criterion_main!(benches);
