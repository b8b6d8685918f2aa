use arithcode::{
    compress_ppm, compress_static, decompress_ppm, decompress_static, MODEL_ORDER,
};
use criterion::{criterion_group, criterion_main, Criterion};

fn sample_input(len: usize) -> Vec<u8> {
    // English-like skew: a few symbols dominate.
    let alphabet = b"aaaaabbbccde ";
    (0..len).map(|i| alphabet[(i * 7 + i / 13) % alphabet.len()]).collect()
}

fn bench_static(c: &mut Criterion) {
    let mut group = c.benchmark_group("static_order0");
    let input = sample_input(10_000);

    group.bench_function("compress", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            compress_static(&input, &mut out).unwrap();
            out
        })
    });

    let mut compressed = Vec::new();
    compress_static(&input, &mut compressed).unwrap();

    group.bench_function("decompress", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            decompress_static(&compressed[..], &mut out).unwrap();
            out
        })
    });
}

fn bench_ppm(c: &mut Criterion) {
    let mut group = c.benchmark_group("ppm");
    let input = sample_input(10_000);

    group.bench_function("compress", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            compress_ppm(&input[..], &mut out, MODEL_ORDER).unwrap();
            out
        })
    });

    let mut compressed = Vec::new();
    compress_ppm(&input[..], &mut compressed, MODEL_ORDER).unwrap();

    group.bench_function("decompress", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            decompress_ppm(&compressed[..], &mut out, MODEL_ORDER).unwrap();
            out
        })
    });
}

criterion_group!(benches, bench_static, bench_ppm);
criterion_main!(benches);
