#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmark for overlay rendering.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pm25_map::prelude::*;

/// Regular lat/lon grid with a smooth synthetic field.
fn world_grid(step: f64) -> Vec<Sample> {
    let mut samples = Vec::new();
    let mut lat = -60.0_f64;
    while lat <= 80.0 {
        let mut lon = -180.0_f64;
        while lon < 180.0 {
            let value = ((lat.to_radians().cos() * lon.to_radians().sin()).abs() * 100.0) as f32;
            samples.push(Sample::new(lat, lon, value));
            lon += step;
        }
        lat += step;
    }
    samples
}

fn markers() -> Vec<Marker> {
    vec![
        Marker::new("London", "United Kingdom", 51.5, -0.12),
        Marker::new("Delhi", "India", 28.61, 77.21),
        Marker::new("Beijing", "China", 39.9, 116.4),
        Marker::new("Lagos", "Nigeria", 6.52, 3.38),
        Marker::new("Lima", "Peru", -12.05, -77.04),
    ]
}

fn overlay_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay");

    let renderer = ViewportRenderer::default();
    let projection = NaturalEarth1::fit_size(1000.0, 500.0);
    let markers = markers();

    for step in [4.0, 2.0, 1.0] {
        let samples = world_grid(step);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_samples", samples.len())),
            &samples,
            |b, samples| {
                let mut fb = Framebuffer::new(1000, 500).expect("framebuffer should allocate");
                b.iter(|| {
                    renderer.render_into(
                        &mut fb,
                        black_box(samples),
                        &markers,
                        &projection,
                        &ViewTransform::IDENTITY,
                    )
                });
            },
        );
    }

    group.finish();
}

fn overlay_zoom_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay_zoom");

    let renderer = ViewportRenderer::default();
    let projection = NaturalEarth1::fit_size(1000.0, 500.0);
    let samples = world_grid(1.0);

    for scale in [0.5_f32, 1.0, 4.0, 8.0] {
        let mut view = PanZoomController::default();
        let transform = view.zoom_at(Point::new(500.0, 250.0), scale);

        group.bench_with_input(BenchmarkId::from_parameter(format!("{scale}x")), &transform, |b, t| {
            let mut fb = Framebuffer::new(1000, 500).expect("framebuffer should allocate");
            b.iter(|| renderer.render_into(&mut fb, black_box(&samples), &[], &projection, t));
        });
    }

    group.finish();
}

criterion_group!(benches, overlay_benchmark, overlay_zoom_benchmark);
criterion_main!(benches);
