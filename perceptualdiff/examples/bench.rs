//! Times a full comparison of two 512x512 gradients.
//!
//! Run with `cargo run --release --example bench` and compare against
//! `--no-default-features` to see the effect of row parallelism.

use perceptualdiff::{compare, PdiffParams, RgbaImage};
use std::time::Instant;

fn main() {
    let width = 512;
    let height = 512;

    // Gradient pair with a small structured perturbation
    let mut rgba1 = vec![0u8; width * height * 4];
    let mut rgba2 = vec![0u8; width * height * 4];

    for y in 0..height {
        for x in 0..width {
            let idx = (y * width + x) * 4;
            let val = ((x as f32 / width as f32) * 200.0) as u8;
            rgba1[idx..idx + 4].copy_from_slice(&[val, val, val, 255]);

            let val2 = val.saturating_add(((x * y) % 10) as u8);
            rgba2[idx..idx + 4].copy_from_slice(&[val2, val2, val, 255]);
        }
    }

    let img1 = RgbaImage::from_rgba8(&rgba1, width, height).expect("valid buffer");
    let img2 = RgbaImage::from_rgba8(&rgba2, width, height).expect("valid buffer");
    let params = PdiffParams::default();

    // Warmup
    let result = compare(&img1, &img2, &params).expect("non-empty images");

    let iterations = 10;
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = compare(&img1, &img2, &params);
    }
    let elapsed = start.elapsed();

    println!(
        "512x512 image: {:.2}ms per iteration ({} iterations, total {:.2}s)",
        elapsed.as_secs_f64() * 1000.0 / iterations as f64,
        iterations,
        elapsed.as_secs_f64()
    );
    println!("{}", result.reason);
}
