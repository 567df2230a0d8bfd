//! Benchmark equality, cached hashing and native projection of descriptors.

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use streamformat::{mime, MediaFormat};

fn make_avc(csd_len: usize) -> MediaFormat {
    let sps = Bytes::from(vec![0x67; csd_len]);
    let pps = Bytes::from(vec![0x68; csd_len / 4]);
    MediaFormat::video(mime::VIDEO_H264, 1024 * 1024, 1920, 1080, vec![sps, pps])
}

fn bench_identity(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_identity");

    let a = make_avc(64);
    let b = make_avc(64);
    group.bench_function("eq_small_csd", |bench| {
        bench.iter(|| black_box(&a) == black_box(&b));
    });

    let big_a = make_avc(16 * 1024);
    let big_b = make_avc(16 * 1024).with_max_video_dimensions(3840, 2160);
    group.bench_function("eq_ignoring_max_large_csd", |bench| {
        bench.iter(|| black_box(&big_a).eq_ignoring_max_dimensions(black_box(&big_b)));
    });

    // First call computes, later calls hit the cache.
    group.bench_function("hash_code_uncached", |bench| {
        bench.iter(|| make_avc(1024).hash_code());
    });
    let cached = make_avc(1024);
    cached.hash_code();
    group.bench_function("hash_code_cached", |bench| {
        bench.iter(|| black_box(&cached).hash_code());
    });

    group.bench_function("native_projection", |bench| {
        bench.iter(|| make_avc(256).to_native_format().len());
    });

    group.finish();
}

criterion_group!(benches, bench_identity);
criterion_main!(benches);
