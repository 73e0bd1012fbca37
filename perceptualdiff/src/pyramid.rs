//! Laplacian pyramid of successively blurred luminance images.
//!
//! Level 0 is the caller's channel itself, borrowed rather than copied.
//! Every further level blurs the previous one with a 5x5 kernel built from
//! `[0.05, 0.25, 0.4, 0.25, 0.05]`. Borders are mirrored, so an offset of
//! `-1` reads index 1 and an offset of `width` reads index `width - 1`.
//!
//! A single-pixel image cannot be blurred; all its levels borrow level 0.

use std::borrow::Cow;

use log::{debug, log_enabled, Level};

use crate::consts::{MAX_PYR_LEVELS, PYRAMID_KERNEL};

/// Eight progressively blurred versions of one channel.
#[derive(Debug, Clone)]
pub struct LaplacianPyramid<'a> {
    levels: [Cow<'a, [f32]>; MAX_PYR_LEVELS],
    width: usize,
    height: usize,
}

impl<'a> LaplacianPyramid<'a> {
    /// Builds the pyramid for a `width` x `height` channel.
    ///
    /// # Panics
    /// Panics if `image.len() != width * height`.
    #[must_use]
    pub fn new(image: &'a [f32], width: usize, height: usize) -> Self {
        assert_eq!(image.len(), width * height, "channel size mismatch");
        debug_assert!(width > 0 && height > 0, "zero-area pyramid");

        let start = std::time::Instant::now();

        let mut levels: [Cow<'a, [f32]>; MAX_PYR_LEVELS] =
            std::array::from_fn(|_| Cow::Borrowed(image));

        if width * height > 1 {
            for i in 1..MAX_PYR_LEVELS {
                let mut blurred = vec![0.0f32; image.len()];
                convolve(&levels[i - 1], width, height, &mut blurred);
                levels[i] = Cow::Owned(blurred);
            }
        }

        debug!("pyramid {width}x{height} took {:?}", start.elapsed());

        Self {
            levels,
            width,
            height,
        }
    }

    /// Width of every level.
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of every level.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Value of `level` at `(x, y)`.
    ///
    /// # Panics
    /// Panics if `level >= MAX_PYR_LEVELS` or the coordinates are outside
    /// the image.
    #[inline]
    #[must_use]
    pub fn value(&self, x: usize, y: usize, level: usize) -> f64 {
        assert!(level < MAX_PYR_LEVELS, "pyramid level {level} out of range");
        f64::from(self.levels[level][x + y * self.width])
    }

    /// All pixels of `level`, row-major.
    ///
    /// # Panics
    /// Panics if `level >= MAX_PYR_LEVELS`.
    #[must_use]
    pub fn level(&self, level: usize) -> &[f32] {
        assert!(level < MAX_PYR_LEVELS, "pyramid level {level} out of range");
        &self.levels[level]
    }

    /// Whether `level` shares the caller's input buffer.
    #[must_use]
    pub fn is_borrowed(&self, level: usize) -> bool {
        matches!(self.levels[level], Cow::Borrowed(_))
    }

    pub(crate) fn trace_dump(&self, label: &str) {
        if log_enabled!(Level::Trace) {
            for (i, level) in self.levels.iter().enumerate() {
                crate::trace_array(&format!("{label}.level{i}"), level);
            }
        }
    }
}

/// Mirrors an offset coordinate back into `0..len`.
///
/// A single mirror is enough for `len >= 3`; thinner axes are clamped.
#[inline]
fn reflect(n: isize, len: usize) -> usize {
    let len = len as isize;
    let n = n.abs();
    let n = if n >= len { 2 * len - n - 1 } else { n };
    n.clamp(0, len - 1) as usize
}

/// Convolves `src` with the 5x5 pyramid kernel into `dst`.
fn convolve(src: &[f32], width: usize, height: usize, dst: &mut [f32]) {
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0f64;
            for (i, &kx) in PYRAMID_KERNEL.iter().enumerate() {
                let nx = reflect(x as isize + i as isize - 2, width);
                for (j, &ky) in PYRAMID_KERNEL.iter().enumerate() {
                    let ny = reflect(y as isize + j as isize - 2, height);
                    sum += kx * ky * f64::from(src[ny * width + nx]);
                }
            }
            dst[y * width + x] = sum as f32;
        }
    }
}
