//! Main perceptual comparison.
//!
//! This module ties the colour conversion, the pyramids and the
//! psychophysical models together into per-pixel pass/fail decisions.

use log::{debug, info};

use crate::colorspace::{convert_pair, PerceptualChannels};
use crate::consts::{
    CONTRAST_LEVELS, CSF_PEAK_CPD, CSF_REFERENCE_LUMINANCE, FACTOR_MAX, FACTOR_MIN,
    MAX_PYR_LEVELS, MIN_LUMINANCE, SCOTOPIC_LUMINANCE,
};
use crate::image::{difference_color, RgbaImage};
use crate::psycho::{adaptation_level, csf, mask, one_degree_pixels, tvi};
use crate::pyramid::LaplacianPyramid;
use crate::PdiffParams;

/// Internal result of the perceptual test.
pub(crate) struct InternalResult {
    pub pixels_failed: usize,
    pub error_sum: f64,
    pub difference: Option<RgbaImage>,
}

/// Viewing-geometry quantities shared by every pixel.
#[derive(Debug, Clone)]
pub(crate) struct FrequencyModel {
    /// Pyramid level used for the adaptation luminance.
    pub adaptation_level: usize,
    /// Cycles per degree represented by each pyramid level.
    pub cpd: [f64; MAX_PYR_LEVELS],
    /// Sensitivity of each contrast level relative to the CSF peak.
    pub f_freq: [f64; CONTRAST_LEVELS],
}

impl FrequencyModel {
    pub fn new(width: usize, field_of_view: f64) -> Self {
        let num_one_degree_pixels = one_degree_pixels(field_of_view);
        let pixels_per_degree = width as f64 / num_one_degree_pixels;

        let mut cpd = [0.0; MAX_PYR_LEVELS];
        cpd[0] = 0.5 * pixels_per_degree;
        for i in 1..MAX_PYR_LEVELS {
            cpd[i] = 0.5 * cpd[i - 1];
        }

        let csf_max = csf(CSF_PEAK_CPD, CSF_REFERENCE_LUMINANCE);
        let f_freq = std::array::from_fn(|i| csf_max / csf(cpd[i], CSF_REFERENCE_LUMINANCE));

        Self {
            adaptation_level: adaptation_level(num_one_degree_pixels),
            cpd,
            f_freq,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct RowStats {
    failed: usize,
    error_sum: f64,
}

/// Read-only state for evaluating rows.
struct RowContext<'a> {
    width: usize,
    height: usize,
    pyr_a: &'a LaplacianPyramid<'a>,
    pyr_b: &'a LaplacianPyramid<'a>,
    ch_a: &'a PerceptualChannels,
    ch_b: &'a PerceptualChannels,
    model: &'a FrequencyModel,
    params: &'a PdiffParams,
}

impl RowContext<'_> {
    fn compare_row(&self, y: usize, mut out: Option<&mut [u32]>) -> RowStats {
        let mut stats = RowStats::default();

        for x in 0..self.width {
            let failed = self.compare_pixel(x, y, &mut stats.error_sum);
            if failed {
                stats.failed += 1;
            }
            if let Some(row) = out.as_deref_mut() {
                row[x] = difference_color(failed);
            }
        }

        stats
    }

    /// Returns `true` if the pixel fails; adds its errors to `error_sum`.
    fn compare_pixel(&self, x: usize, y: usize, error_sum: &mut f64) -> bool {
        let la = self.pyr_a;
        let lb = self.pyr_b;
        let index = x + y * self.width;
        let level = self.model.adaptation_level;

        let adapt = ((la.value(x, y, level) + lb.value(x, y, level)) * 0.5).max(MIN_LUMINANCE);

        let mut sum_contrast = 0.0;
        let mut factor = 0.0;

        for i in 0..CONTRAST_LEVELS {
            let n1 = (la.value(x, y, i) - la.value(x, y, i + 1)).abs();
            let n2 = (lb.value(x, y, i) - lb.value(x, y, i + 1)).abs();
            let numerator = n1.max(n2);

            let d1 = la.value(x, y, i + 2).abs();
            let d2 = lb.value(x, y, i + 2).abs();
            let denominator = d1.max(d2).max(MIN_LUMINANCE);

            let contrast = numerator / denominator;
            let f_mask = mask(contrast * csf(self.model.cpd[i], adapt));

            factor += contrast * self.model.f_freq[i] * f_mask;
            sum_contrast += contrast;
        }

        let sum_contrast = f64::max(sum_contrast, MIN_LUMINANCE);
        let factor = (factor / sum_contrast).clamp(FACTOR_MIN, FACTOR_MAX);

        let delta = (la.value(x, y, 0) - lb.value(x, y, 0)).abs();
        *error_sum += delta;

        // Pure luminance test
        let mut failed = delta > factor * tvi(adapt);

        if !self.params.luminance_only() {
            // Colour discrimination is absent in scotopic conditions
            let color_scale = if adapt < SCOTOPIC_LUMINANCE {
                0.0
            } else {
                self.params.color_factor()
            };

            // Chroma differences are taken in single precision
            let da = f64::from(self.ch_a.a[index] - self.ch_b.a[index]);
            let db = f64::from(self.ch_a.b[index] - self.ch_b.b[index]);
            let delta_e = (da * da + db * db) * color_scale;
            *error_sum += delta_e;

            if delta_e > factor {
                failed = true;
            }
        }

        failed
    }
}

#[cfg(feature = "parallel")]
fn evaluate_rows(ctx: &RowContext<'_>, difference: Option<&mut [u32]>) -> Vec<RowStats> {
    use rayon::prelude::*;

    match difference {
        Some(pixels) => pixels
            .par_chunks_mut(ctx.width)
            .enumerate()
            .map(|(y, row)| ctx.compare_row(y, Some(row)))
            .collect(),
        None => (0..ctx.height)
            .into_par_iter()
            .map(|y| ctx.compare_row(y, None))
            .collect(),
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_rows(ctx: &RowContext<'_>, difference: Option<&mut [u32]>) -> Vec<RowStats> {
    match difference {
        Some(pixels) => pixels
            .chunks_mut(ctx.width)
            .enumerate()
            .map(|(y, row)| ctx.compare_row(y, Some(row)))
            .collect(),
        None => (0..ctx.height).map(|y| ctx.compare_row(y, None)).collect(),
    }
}

#[cfg(feature = "parallel")]
fn build_pyramids<'a>(
    lum_a: &'a [f32],
    lum_b: &'a [f32],
    width: usize,
    height: usize,
) -> (LaplacianPyramid<'a>, LaplacianPyramid<'a>) {
    rayon::join(
        || LaplacianPyramid::new(lum_a, width, height),
        || LaplacianPyramid::new(lum_b, width, height),
    )
}

#[cfg(not(feature = "parallel"))]
fn build_pyramids<'a>(
    lum_a: &'a [f32],
    lum_b: &'a [f32],
    width: usize,
    height: usize,
) -> (LaplacianPyramid<'a>, LaplacianPyramid<'a>) {
    (
        LaplacianPyramid::new(lum_a, width, height),
        LaplacianPyramid::new(lum_b, width, height),
    )
}

/// Runs the perceptual test on two non-empty images of equal size.
pub(crate) fn compare_perceptual(
    img_a: &RgbaImage,
    img_b: &RgbaImage,
    params: &PdiffParams,
) -> InternalResult {
    let width = img_a.width();
    let height = img_a.height();
    debug_assert_eq!((width, height), (img_b.width(), img_b.height()));
    debug_assert!(width * height > 0);

    info!("Converting RGB to XYZ");
    let (ch_a, ch_b) = convert_pair(img_a, img_b, params.gamma(), params.luminance());

    info!("Constructing Laplacian pyramids");
    let (pyr_a, pyr_b) = build_pyramids(&ch_a.lum, &ch_b.lum, width, height);
    pyr_a.trace_dump("a");
    pyr_b.trace_dump("b");

    info!("Performing test");
    let start = std::time::Instant::now();

    let model = FrequencyModel::new(width, params.field_of_view());
    debug!(
        "adaptation level {}, cpd {:?}",
        model.adaptation_level, model.cpd
    );

    let ctx = RowContext {
        width,
        height,
        pyr_a: &pyr_a,
        pyr_b: &pyr_b,
        ch_a: &ch_a,
        ch_b: &ch_b,
        model: &model,
        params,
    };

    let mut difference = params
        .compute_difference()
        .then(|| RgbaImage::new(width, height));

    let rows = evaluate_rows(&ctx, difference.as_mut().map(RgbaImage::pixels_mut));

    let mut pixels_failed = 0;
    let mut error_sum = 0.0;
    for row in &rows {
        pixels_failed += row.failed;
        error_sum += row.error_sum;
    }

    debug!("perceptual test took {:?}", start.elapsed());

    InternalResult {
        pixels_failed,
        error_sum,
        difference,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: usize, height: usize, v: u8) -> RgbaImage {
        let bytes: Vec<u8> = (0..width * height).flat_map(|_| [v, v, v, 255]).collect();
        RgbaImage::from_rgba8(&bytes, width, height).unwrap()
    }

    #[test]
    fn test_frequency_model_defaults() {
        let model = FrequencyModel::new(100, 45.0);
        assert_eq!(model.adaptation_level, 6);

        let ppd = 100.0 / one_degree_pixels(45.0);
        assert!((model.cpd[0] - 0.5 * ppd).abs() < 1e-12);
        for i in 1..MAX_PYR_LEVELS {
            assert!((model.cpd[i] * 2.0 - model.cpd[i - 1]).abs() < 1e-12);
        }
        for i in 0..CONTRAST_LEVELS {
            let expected = csf(CSF_PEAK_CPD, 100.0) / csf(model.cpd[i], 100.0);
            assert_eq!(model.f_freq[i], expected);
        }
    }

    #[test]
    fn test_uniform_shift_fails_everywhere() {
        let a = gray(16, 16, 40);
        let b = gray(16, 16, 200);
        let params = PdiffParams::default().with_compute_difference(true);

        let result = compare_perceptual(&a, &b, &params);
        assert_eq!(result.pixels_failed, 256);
        assert!(result.error_sum > 0.0);

        let diff = result.difference.unwrap();
        assert!(diff.pixels().iter().all(|&p| p == difference_color(true)));
    }

    #[test]
    fn test_single_gray_level_step_is_invisible() {
        let a = gray(16, 16, 128);
        let b = gray(16, 16, 129);

        let result = compare_perceptual(&a, &b, &PdiffParams::default());
        assert_eq!(result.pixels_failed, 0);
        assert!(result.error_sum > 0.0);
        assert!(result.difference.is_none());
    }

    #[test]
    fn test_dark_chroma_change_is_ignored() {
        // Adaptation luminance stays below the scotopic limit
        let a = RgbaImage::from_rgba8(&[0u8, 0, 20, 255].repeat(64), 8, 8).unwrap();
        let b = RgbaImage::from_rgba8(&[20u8, 0, 0, 255].repeat(64), 8, 8).unwrap();

        let lum_only = PdiffParams::default().with_luminance_only(true);
        let full = PdiffParams::default();

        let r_lum = compare_perceptual(&a, &b, &lum_only);
        let r_full = compare_perceptual(&a, &b, &full);
        assert_eq!(r_lum.pixels_failed, r_full.pixels_failed);
        assert_eq!(r_lum.error_sum, r_full.error_sum);
    }

    #[test]
    fn test_bright_chroma_change_fails_colour_test() {
        // Equal luminance, different chroma: only the colour test can fail
        let a = RgbaImage::from_rgba8(&[180u8, 180, 180, 255].repeat(64), 8, 8).unwrap();
        let mut bytes = [180u8, 180, 180, 255].repeat(64);
        bytes[4 * 27] = 200;
        bytes[4 * 27 + 2] = 150;
        let b = RgbaImage::from_rgba8(&bytes, 8, 8).unwrap();

        let lum_only = compare_perceptual(&a, &b, &PdiffParams::default().with_luminance_only(true));
        let full = compare_perceptual(&a, &b, &PdiffParams::default());
        assert!(full.pixels_failed >= lum_only.pixels_failed);
        assert!(full.pixels_failed >= 1);
        assert!(full.error_sum > lum_only.error_sum);
    }

    #[test]
    fn test_colour_test_switches_on_at_scotopic_limit() {
        // Nearly equal luminance, very different chroma. The display
        // luminance puts the adaptation level either side of 10 cd/m^2.
        let a = RgbaImage::from_rgba8(&[200u8, 120, 60, 255].repeat(64), 8, 8).unwrap();
        let b = RgbaImage::from_rgba8(&[60u8, 0, 200, 255].repeat(64), 8, 8).unwrap();

        let adapt = |luminance: f64| {
            let (ch_a, ch_b) = convert_pair(&a, &b, 2.2, luminance);
            (f64::from(ch_a.lum[0]) + f64::from(ch_b.lum[0])) * 0.5
        };
        assert!(adapt(56.5) < SCOTOPIC_LUMINANCE);
        assert!(adapt(56.7) > SCOTOPIC_LUMINANCE);
        assert!(adapt(56.7) < SCOTOPIC_LUMINANCE + 0.05);

        let below = compare_perceptual(&a, &b, &PdiffParams::new().with_luminance(56.5));
        assert_eq!(below.pixels_failed, 0);

        let above = compare_perceptual(&a, &b, &PdiffParams::new().with_luminance(56.7));
        assert_eq!(above.pixels_failed, 64);

        // The luminance test alone passes on both sides
        let lum_only = PdiffParams::new()
            .with_luminance(56.7)
            .with_luminance_only(true);
        assert_eq!(compare_perceptual(&a, &b, &lum_only).pixels_failed, 0);
    }
}
