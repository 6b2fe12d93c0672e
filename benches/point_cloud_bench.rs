//! Benchmarks for image-to-cloud conversion and the per-frame camera tick.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use relief::camera::rig::CameraRig;
use relief::input::InputState;
use relief::options::{CameraOptions, KeybindingOptions};
use relief::point_cloud::{build, BuildParams, SourceImage};

/// Diagonal gradient with a transparent border, so both the skip and emit
/// paths are exercised.
fn gradient(size: u32) -> SourceImage {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let border = x < 4 || y < 4 || x >= size - 4 || y >= size - 4;
            let v = ((x + y) * 255 / (2 * size)) as u8;
            pixels.extend_from_slice(&[v, 255 - v, v / 2, if border { 0 } else { 255 }]);
        }
    }
    SourceImage::new(size, size, pixels)
}

fn build_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    let params = BuildParams::new(10.0, 0.2);

    for size in [64, 256, 1024] {
        let image = gradient(size);
        let _ = group.bench_function(format!("{size}x{size}"), |b| {
            b.iter(|| black_box(build(black_box(&image), &params)));
        });
    }

    group.finish();
}

fn camera_tick_benchmark(c: &mut Criterion) {
    let mut rig = CameraRig::new(&CameraOptions::default(), (1920, 1080));
    let mut input = InputState::new();
    input.set_key("KeyW", true);
    let _ = input.move_pointer(10.0, 540.0);
    let bindings = KeybindingOptions::default();

    let _ = c.bench_function("camera_tick", |b| {
        b.iter(|| black_box(rig.tick(&input, &bindings)));
    });
}

criterion_group!(benches, build_benchmark, camera_tick_benchmark);
criterion_main!(benches);
