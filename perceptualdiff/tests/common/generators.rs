//! Deterministic synthetic RGBA images for perceptualdiff tests.
//!
//! Everything is driven by an LCG PRNG so inputs are identical on every
//! platform.

use perceptualdiff::RgbaImage;

/// LCG pseudo-random number generator (deterministic)
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u8(&mut self) -> u8 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.state >> 33) & 0xFF) as u8
    }
}

/// Wrap RGBA bytes into an image.
pub fn to_image(rgba: &[u8], width: usize, height: usize) -> RgbaImage {
    RgbaImage::from_rgba8(rgba, width, height).expect("generator produced wrong size")
}

/// Uniform opaque colour.
pub fn gen_uniform(width: usize, height: usize, r: u8, g: u8, b: u8) -> Vec<u8> {
    [r, g, b, 255].repeat(width * height)
}

/// Opaque diagonal colour gradient.
pub fn gen_color_gradient(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            data.push((x * 255 / width.max(2).saturating_sub(1)).min(255) as u8);
            data.push((y * 255 / height.max(2).saturating_sub(1)).min(255) as u8);
            data.push(((x + y) * 127 / (width + height).max(1)) as u8);
            data.push(255);
        }
    }
    data
}

/// Opaque random noise with fixed seed.
pub fn gen_random(width: usize, height: usize, seed: u64) -> Vec<u8> {
    let mut rng = Lcg::new(seed);
    let mut data = Vec::with_capacity(width * height * 4);
    for _ in 0..width * height {
        data.extend_from_slice(&[rng.next_u8(), rng.next_u8(), rng.next_u8(), 255]);
    }
    data
}

/// Add per-channel noise to the colour channels, leaving alpha alone.
pub fn distort_noise(img: &[u8], seed: u64, amplitude: u8) -> Vec<u8> {
    let mut rng = Lcg::new(seed);
    img.chunks_exact(4)
        .flat_map(|px| {
            let mut out = [0u8; 4];
            for c in 0..3 {
                let noise = rng.next_u8() as i16 - 128;
                let scaled = noise * amplitude as i16 / 128;
                out[c] = (px[c] as i16 + scaled).clamp(0, 255) as u8;
            }
            out[3] = px[3];
            out
        })
        .collect()
}

/// Paint an opaque rectangle.
pub fn paint_rect(
    img: &mut [u8],
    width: usize,
    (x0, y0, x1, y1): (usize, usize, usize, usize),
    rgba: [u8; 4],
) {
    for y in y0..y1 {
        for x in x0..x1 {
            let i = 4 * (x + y * width);
            img[i..i + 4].copy_from_slice(&rgba);
        }
    }
}

/// Random colour and alpha in every channel.
pub fn gen_random_alpha(width: usize, height: usize, seed: u64) -> Vec<u8> {
    let mut rng = Lcg::new(seed);
    (0..width * height * 4).map(|_| rng.next_u8()).collect()
}

/// Add noise to the alpha channel only.
pub fn distort_alpha(img: &[u8], seed: u64, amplitude: u8) -> Vec<u8> {
    let mut rng = Lcg::new(seed);
    img.chunks_exact(4)
        .flat_map(|px| {
            let noise = rng.next_u8() as i16 - 128;
            let scaled = noise * amplitude as i16 / 128;
            [px[0], px[1], px[2], (px[3] as i16 + scaled).clamp(0, 255) as u8]
        })
        .collect()
}

fn parse_field<T: std::str::FromStr>(parts: &[&str], i: usize) -> Option<T> {
    parts.get(i).and_then(|s| s.parse().ok())
}

/// Generate the image pair for a reference case name.
///
/// Names are `<pattern>_<args...>`:
/// - `gray_shift_S`, `red_shift_S`, `blue_shift_S`: uniform colour and a
///   copy with one (or all) channels raised by `S`
/// - `chroma_V`: two uniform colours of similar brightness, hue reversed
/// - `gradient_noise_A_SEED`, `random_noise_A_SEED`: base image and a
///   noisy copy of amplitude `A`
/// - `gradient_rect`: gradient with an opaque magenta block
/// - `alpha_noise_A_SEED`: random RGBA with noise on alpha only
pub fn generate_image_pair(name: &str, width: usize, height: usize) -> Option<(Vec<u8>, Vec<u8>)> {
    let parts: Vec<&str> = name.split('_').collect();

    match parts.first().copied()? {
        "gray" => {
            let s: u8 = parse_field(&parts, 2)?;
            Some((
                gen_uniform(width, height, 128, 128, 128),
                gen_uniform(width, height, 128 + s, 128 + s, 128 + s),
            ))
        }
        "red" => {
            let s: u8 = parse_field(&parts, 2)?;
            Some((
                gen_uniform(width, height, 128, 64, 64),
                gen_uniform(width, height, 128 + s, 64, 64),
            ))
        }
        "blue" => {
            let s: u8 = parse_field(&parts, 2)?;
            Some((
                gen_uniform(width, height, 64, 64, 128),
                gen_uniform(width, height, 64, 64, 128 + s),
            ))
        }
        "chroma" => {
            let v: u16 = parse_field(&parts, 1)?;
            let (full, three_quarter, half) = (v as u8, (v * 3 / 4) as u8, (v / 2) as u8);
            Some((
                gen_uniform(width, height, full, three_quarter, half),
                gen_uniform(width, height, half, three_quarter, full),
            ))
        }
        "gradient" if parts.get(1) == Some(&"rect") => {
            let a = gen_color_gradient(width, height);
            let mut b = a.clone();
            paint_rect(
                &mut b,
                width,
                (width / 4, height / 4, width / 2, height / 2),
                [255, 0, 255, 255],
            );
            Some((a, b))
        }
        "gradient" => {
            let amplitude: u8 = parse_field(&parts, 2)?;
            let seed: u64 = parse_field(&parts, 3)?;
            let a = gen_color_gradient(width, height);
            let b = distort_noise(&a, seed, amplitude);
            Some((a, b))
        }
        "random" => {
            let amplitude: u8 = parse_field(&parts, 2)?;
            let seed: u64 = parse_field(&parts, 3)?;
            let a = gen_random(width, height, seed);
            let b = distort_noise(&a, seed + 1, amplitude);
            Some((a, b))
        }
        "alpha" => {
            let amplitude: u8 = parse_field(&parts, 2)?;
            let seed: u64 = parse_field(&parts, 3)?;
            let a = gen_random_alpha(width, height, seed);
            let b = distort_alpha(&a, seed + 1, amplitude);
            Some((a, b))
        }
        _ => None,
    }
}
