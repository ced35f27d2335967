use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pcdview::{encode_pcd, Encoding, Loader, Point, Rgb};

fn synthetic_points(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let t = i as f32;
            Point::with_color(t * 0.001, t * 0.002, t * 0.003, Rgb::from_packed(i as u32))
        })
        .collect()
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let loader = Loader::default();
    for size in [10_000, 100_000, 1_000_000] {
        let points = synthetic_points(size);
        for encoding in [Encoding::Ascii, Encoding::Binary] {
            let raw = encode_pcd(&points, encoding).unwrap();
            group.bench_with_input(
                BenchmarkId::new(encoding.to_string(), size),
                &raw,
                |b, raw| b.iter(|| loader.decode(raw).unwrap()),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
