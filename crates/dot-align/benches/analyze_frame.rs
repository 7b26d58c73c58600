use criterion::{criterion_group, criterion_main, Criterion};
use dot_align::{
    AlignmentConfig, DotParams, FrameAnalyzer, FrameSpec, GrayImage, MarkerConfig, Rect,
    TargetParams,
};
use nalgebra::Vector2;
use std::hint::black_box;

fn setup(size: usize) -> (FrameAnalyzer, GrayImage) {
    let s = size as i32;
    let params = DotParams {
        luminance_threshold: 12,
        pct_dark_low: 0.001,
        pct_dark_high: 1.0,
        max_dispersion: 8.0,
    };
    let config = AlignmentConfig {
        frame: FrameSpec {
            width: size,
            height: size,
            sensor_aligned: true,
        },
        primary: MarkerConfig {
            params,
            region: Rect::new(0, s, 0, s).expect("rect"),
        },
        reference: MarkerConfig {
            params,
            region: Rect::new(s * 3 / 4, s, s * 3 / 4, s).expect("rect"),
        },
        target: TargetParams {
            offset: Vector2::new(-(s as f64) / 2.0, -(s as f64) / 2.0),
            radius: 3.0,
        },
        indicators: None,
    };

    let mut img = GrayImage::filled(size, size, 180);
    let c = s * 7 / 8;
    img.fill_rect(&Rect::new(c - 2, c + 2, c - 2, c + 2).expect("rect"), 0);
    let p = c - s / 2;
    img.fill_rect(&Rect::new(p - 3, p + 3, p - 3, p + 3).expect("rect"), 0);

    (FrameAnalyzer::new(config).expect("config"), img)
}

fn bench_analyze(c: &mut Criterion) {
    for size in [128usize, 256, 512] {
        let (analyzer, img) = setup(size);
        c.bench_function(&format!("analyze_frame_{size}"), |b| {
            b.iter(|| analyzer.analyze(black_box(&img.view())).expect("analyze"))
        });
    }
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
