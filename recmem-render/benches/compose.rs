use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use image::{Rgba, RgbaImage};
use std::time::Duration;

use recmem_render::{Compositor, stimulus_pixmap};

fn gradient(side: u32) -> RgbaImage {
    RgbaImage::from_fn(side, side, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    })
}

/// Decode-free cost of scaling a stimulus to screen size.
pub fn bench_stimulus_pixmap(c: &mut Criterion) {
    let mut group = c.benchmark_group("stimulus_pixmap");
    group
        .sample_size(30)
        .measurement_time(Duration::from_secs(5));

    let img = gradient(512);
    for side in [120u32, 240, 480] {
        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, &side| {
            b.iter(|| black_box(stimulus_pixmap(&img, side, side).ok()));
        });
    }
    group.finish();
}

/// One study frame: clear, then draw the stimulus.
pub fn bench_study_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("study_frame");
    group.sample_size(50);

    let img = gradient(256);
    for (w, h) in [(800u32, 800u32), (1280, 720), (1920, 1080)] {
        group.bench_function(format!("{w}x{h}"), |b| {
            let mut compositor = match Compositor::new(w, h) {
                Ok(c) => c,
                Err(_) => return,
            };
            b.iter(|| {
                compositor.clear();
                let _ = compositor.draw_image(black_box(&img), 0.3);
                black_box(compositor.frame().len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_stimulus_pixmap, bench_study_frame);
criterion_main!(benches);
