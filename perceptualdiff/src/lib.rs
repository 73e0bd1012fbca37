//! # perceptualdiff
//!
//! An implementation of the perceptual image metric from
//! "A Perceptual Metric for Production Testing", Hector Yee,
//! Journal of Graphics Tools 9(4), 2004.
//!
//! Two images of the same size are compared the way a human observer would
//! see them on a display:
//! - Colour: premultiplied, gamma-corrected Adobe RGB (1998) to XYZ and LAB
//! - Spatial frequency: an 8-level Laplacian pyramid per luminance channel
//! - Thresholds: contrast sensitivity (Barten), visual masking (Daly) and
//!   threshold-versus-intensity (Ward Larson)
//!
//! A pixel fails if its luminance change exceeds the local visibility
//! threshold, or (in photopic conditions) if its chroma change does. The
//! images pass when fewer than `threshold_pixels` pixels fail.
//!
//! ## Example
//!
//! ```rust
//! use perceptualdiff::{compare, PdiffParams, RgbaImage};
//!
//! let gray = [128u8, 128, 128, 255].repeat(16 * 16);
//! let img_a = RgbaImage::from_rgba8(&gray, 16, 16)?;
//! let img_b = img_a.clone();
//!
//! let result = compare(&img_a, &img_b, &PdiffParams::default())?;
//! assert!(result.passed);
//! assert_eq!(result.reason, "Images are binary identical");
//! # Ok::<(), perceptualdiff::PdiffError>(())
//! ```
//!
//! ## Features
//!
//! - **`parallel`** (default): evaluate rows and build pyramids with rayon
//!
//! ## Logging
//!
//! Progress is reported through the [`log`] facade: stage names at `info`,
//! timings at `debug`, and complete channel and pyramid dumps at `trace`.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
// Constants are kept exactly as published
#![allow(clippy::unreadable_literal)]
#![allow(clippy::excessive_precision)]
// Operation order matters for fixture parity
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]

pub mod colorspace;

pub(crate) mod consts;

mod diff;
mod image;
pub mod psycho;
pub mod pyramid;

// Upstream results for synthetic pairs, used by the regression tests
#[doc(hidden)]
pub mod reference_data;

use std::fmt::Write as _;

pub use crate::consts::MAX_PYR_LEVELS;
pub use crate::image::RgbaImage;
pub use imgref::{Img, ImgRef, ImgVec};
pub use rgb::RGBA8;

/// Reason reported when the two images differ in size.
pub const REASON_DIMENSION_MISMATCH: &str = "Image dimensions do not match";

/// Reason reported when the two images have identical pixels.
pub const REASON_BINARY_IDENTICAL: &str = "Images are binary identical";

/// Error type for perceptualdiff operations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PdiffError {
    /// Image has no pixels.
    EmptyImage {
        /// Image width.
        width: usize,
        /// Image height.
        height: usize,
    },
    /// Buffer size doesn't match the declared dimensions.
    InvalidBufferSize {
        /// Expected buffer size in bytes.
        expected: usize,
        /// Actual buffer size in bytes.
        actual: usize,
    },
    /// Pixel or byte count of the image overflows `usize`.
    ImageTooLarge {
        /// Image width.
        width: usize,
        /// Image height.
        height: usize,
    },
}

impl std::fmt::Display for PdiffError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyImage { width, height } => {
                write!(f, "image has no pixels: {width}x{height}")
            }
            Self::InvalidBufferSize { expected, actual } => {
                write!(
                    f,
                    "buffer size {actual} doesn't match expected size {expected}"
                )
            }
            Self::ImageTooLarge { width, height } => {
                write!(f, "image dimensions overflow: {width}x{height}")
            }
        }
    }
}

impl std::error::Error for PdiffError {}

/// Comparison parameters.
///
/// Use the builder pattern to construct:
/// ```rust
/// use perceptualdiff::PdiffParams;
///
/// let params = PdiffParams::new()
///     .with_field_of_view(60.0)      // wider view, fewer pixels per degree
///     .with_threshold_pixels(10)     // stricter pass criterion
///     .with_compute_difference(true); // paint failing pixels red
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PdiffParams {
    luminance_only: bool,
    field_of_view: f64,
    gamma: f64,
    luminance: f64,
    threshold_pixels: usize,
    color_factor: f64,
    compute_difference: bool,
}

impl Default for PdiffParams {
    fn default() -> Self {
        Self {
            luminance_only: false,
            field_of_view: consts::DEFAULT_FIELD_OF_VIEW,
            gamma: consts::DEFAULT_GAMMA,
            luminance: consts::DEFAULT_LUMINANCE,
            threshold_pixels: consts::DEFAULT_THRESHOLD_PIXELS,
            color_factor: consts::DEFAULT_COLOR_FACTOR,
            compute_difference: false,
        }
    }
}

impl PdiffParams {
    /// Creates a new `PdiffParams` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only compare luminance; skip the chroma test.
    #[must_use]
    pub fn with_luminance_only(mut self, luminance_only: bool) -> Self {
        self.luminance_only = luminance_only;
        self
    }

    /// Sets the horizontal field of view of the viewer, in degrees.
    #[must_use]
    pub fn with_field_of_view(mut self, field_of_view: f64) -> Self {
        self.field_of_view = field_of_view;
        self
    }

    /// Sets the display gamma used to linearise pixel values.
    #[must_use]
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Sets the display white luminance in cd/m^2.
    #[must_use]
    pub fn with_luminance(mut self, luminance: f64) -> Self {
        self.luminance = luminance;
        self
    }

    /// Sets how many failing pixels are tolerated.
    /// The images pass when strictly fewer pixels fail.
    #[must_use]
    pub fn with_threshold_pixels(mut self, threshold_pixels: usize) -> Self {
        self.threshold_pixels = threshold_pixels;
        self
    }

    /// Sets the weight of the chroma test.
    /// 0.0 behaves like `luminance_only`; 1.0 is full strength.
    #[must_use]
    pub fn with_color_factor(mut self, color_factor: f64) -> Self {
        self.color_factor = color_factor;
        self
    }

    /// Sets whether to paint a difference image.
    ///
    /// When `true`, the result carries an image with failing pixels in
    /// opaque red and passing pixels in opaque black.
    #[must_use]
    pub fn with_compute_difference(mut self, compute_difference: bool) -> Self {
        self.compute_difference = compute_difference;
        self
    }

    /// Returns whether only luminance is compared.
    #[must_use]
    pub fn luminance_only(&self) -> bool {
        self.luminance_only
    }

    /// Returns the field of view in degrees.
    #[must_use]
    pub fn field_of_view(&self) -> f64 {
        self.field_of_view
    }

    /// Returns the display gamma.
    #[must_use]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Returns the display white luminance in cd/m^2.
    #[must_use]
    pub fn luminance(&self) -> f64 {
        self.luminance
    }

    /// Returns the failing-pixel count at which the images fail.
    #[must_use]
    pub fn threshold_pixels(&self) -> usize {
        self.threshold_pixels
    }

    /// Returns the weight of the chroma test.
    #[must_use]
    pub fn color_factor(&self) -> f64 {
        self.color_factor
    }

    /// Returns whether a difference image is produced.
    #[must_use]
    pub fn compute_difference(&self) -> bool {
        self.compute_difference
    }
}

/// Result of a comparison.
#[derive(Debug, Clone)]
pub struct PdiffResult {
    /// Whether the images are perceptually indistinguishable.
    pub passed: bool,
    /// Number of failing pixels; `None` if the perceptual test did not run
    /// (size mismatch or identical images).
    pub pixels_failed: Option<usize>,
    /// Sum of per-pixel luminance and weighted chroma differences.
    pub error_sum: f64,
    /// Human-readable verdict.
    pub reason: String,
    /// Difference image, if requested and the images were compared.
    pub difference: Option<RgbaImage>,
}

impl PdiffResult {
    fn without_test(passed: bool, reason: &str, difference: Option<RgbaImage>) -> Self {
        Self {
            passed,
            pixels_failed: None,
            error_sum: 0.0,
            reason: reason.to_owned(),
            difference,
        }
    }
}

/// Compares two images with Yee's perceptual metric.
///
/// Images of different sizes are not an error: the result fails with
/// [`REASON_DIMENSION_MISMATCH`]. Images whose packed pixels are all equal
/// pass immediately with [`REASON_BINARY_IDENTICAL`].
///
/// # Errors
/// Returns [`PdiffError::EmptyImage`] if the images have no pixels.
pub fn compare(
    img_a: &RgbaImage,
    img_b: &RgbaImage,
    params: &PdiffParams,
) -> Result<PdiffResult, PdiffError> {
    if img_a.width() != img_b.width() || img_a.height() != img_b.height() {
        return Ok(PdiffResult::without_test(
            false,
            REASON_DIMENSION_MISMATCH,
            None,
        ));
    }

    let (width, height) = (img_a.width(), img_a.height());
    if img_a.is_empty() {
        return Err(PdiffError::EmptyImage { width, height });
    }

    if img_a.pixels() == img_b.pixels() {
        let difference = params.compute_difference().then(|| {
            let mut img = RgbaImage::new(width, height);
            for i in 0..img.len() {
                img.set(0, 0, 0, 255, i);
            }
            img
        });
        return Ok(PdiffResult::without_test(
            true,
            REASON_BINARY_IDENTICAL,
            difference,
        ));
    }

    let result = diff::compare_perceptual(img_a, img_b, params);

    let passed = result.pixels_failed < params.threshold_pixels();
    let verdict = if passed {
        "Images are perceptually indistinguishable"
    } else {
        "Images are visibly different"
    };

    Ok(PdiffResult {
        passed,
        pixels_failed: Some(result.pixels_failed),
        error_sum: result.error_sum,
        reason: format!("{verdict}\n{} pixels are different", result.pixels_failed),
        difference: result.difference,
    })
}

/// Compares two `imgref` views; see [`compare`].
///
/// # Errors
/// Returns [`PdiffError::EmptyImage`] if the images have no pixels.
pub fn compare_imgref(
    img_a: ImgRef<'_, RGBA8>,
    img_b: ImgRef<'_, RGBA8>,
    params: &PdiffParams,
) -> Result<PdiffResult, PdiffError> {
    compare(
        &RgbaImage::from_imgref(img_a),
        &RgbaImage::from_imgref(img_b),
        params,
    )
}

/// Logs `values` at trace level, ten per line.
pub(crate) fn trace_array(label: &str, values: &[f32]) {
    let mut out = String::with_capacity(values.len() * 11);
    for (i, v) in values.iter().enumerate() {
        let _ = write!(out, "{v:11.6}");
        if (i + 1) % 10 == 0 {
            out.push('\n');
        }
    }
    log::trace!("{label}:\n{out}");
}
